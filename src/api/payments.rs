use crate::models::{CreatePaymentIntentRequest, PaymentIntentResponse};
use crate::services::payment_service::{self, StripeClient};
use crate::utils::AppError;
use actix_web::{web, HttpResponse};

/// POST /create-payment-intent - valida o amount, converte para cents e
/// cria o intent no gateway. A persistência do fundo é um passo separado
/// (POST /funds), invocado pelo cliente após o pagamento.
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret to complete the payment client-side", body = PaymentIntentResponse),
        (status = 400, description = "Missing or non-numeric amount"),
        (status = 500, description = "Payment gateway failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment_intent(
    body: web::Json<CreatePaymentIntentRequest>,
    stripe: web::Data<StripeClient>,
) -> Result<HttpResponse, AppError> {
    let amount_cents = payment_service::amount_to_cents(&body.amount)?;

    let client_secret = stripe.create_payment_intent(amount_cents).await?;

    Ok(HttpResponse::Ok().json(PaymentIntentResponse { client_secret }))
}
