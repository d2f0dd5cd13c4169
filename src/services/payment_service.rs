use crate::utils::AppError;
use uuid::Uuid;

/// Cliente do gateway de pagamento (Stripe). Construído uma vez no main e
/// injetado via web::Data.
#[derive(Clone)]
pub struct StripeClient {
    secret_key: String,
    api_base_url: String,
    http: reqwest::Client,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: "https://api.stripe.com".to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| "STRIPE_SECRET_KEY must be set".to_string())?;
        Ok(Self::new(secret_key))
    }

    /// Base URL customizada (para testes)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Cria um payment intent e devolve o client_secret para o cliente
    /// concluir o pagamento. Cada chamada leva uma Idempotency-Key própria,
    /// então retries do request não geram cobranças duplicadas no gateway.
    pub async fn create_payment_intent(&self, amount_cents: i64) -> Result<String, AppError> {
        let idempotency_key = Uuid::new_v4().to_string();

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .header("Idempotency-Key", idempotency_key)
            .form(&[
                ("amount", amount_cents.to_string()),
                ("currency", "usd".to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::GatewayError(format!("Payment intent creation failed: {}", e)))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::GatewayError(format!("Invalid gateway response: {}", e)))?;

        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("unknown error");
            log::error!("Stripe returned {}: {}", status, message);
            return Err(AppError::GatewayError(
                "Payment intent creation failed".to_string(),
            ));
        }

        body["client_secret"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AppError::GatewayError("No client_secret in response".to_string()))
    }
}

/// Valida o amount do body (número ou string numérica, finito, > 0)
/// e converte para a unidade menor inteira (cents).
pub fn amount_to_cents(amount: &Option<serde_json::Value>) -> Result<i64, AppError> {
    let value = amount
        .as_ref()
        .ok_or_else(|| AppError::InvalidRequest("Invalid amount".to_string()))?;

    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::InvalidRequest("Invalid amount".to_string()))?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::InvalidRequest("Invalid amount".to_string()));
    }

    Ok((amount * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_amounts_convert_to_cents() {
        assert_eq!(amount_to_cents(&Some(serde_json::json!(10))).unwrap(), 1000);
        assert_eq!(amount_to_cents(&Some(serde_json::json!(25.5))).unwrap(), 2550);
        // string numérica também vale, como no isNaN original
        assert_eq!(amount_to_cents(&Some(serde_json::json!("10"))).unwrap(), 1000);
    }

    #[test]
    fn bad_amounts_are_invalid_request() {
        assert!(amount_to_cents(&None).is_err());
        assert!(amount_to_cents(&Some(serde_json::json!("abc"))).is_err());
        assert!(amount_to_cents(&Some(serde_json::json!(null))).is_err());
        assert!(amount_to_cents(&Some(serde_json::json!(0))).is_err());
        assert!(amount_to_cents(&Some(serde_json::json!(-5))).is_err());
        assert!(amount_to_cents(&Some(serde_json::json!({"x": 1}))).is_err());
    }

    #[test]
    fn fractional_cents_round() {
        assert_eq!(amount_to_cents(&Some(serde_json::json!(10.555))).unwrap(), 1056);
    }
}
