use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Registro de doação financeira (coleção `Funds`). Imutável após o insert.
///
/// `fundAmount` chega do cliente como número ou string; o valor é guardado
/// como veio e a coerção numérica acontece só na agregação (`$toDouble`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fund {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "donorEmail")]
    pub donor_email: String,

    #[serde(rename = "donorName")]
    pub donor_name: String,

    #[serde(rename = "fundAmount")]
    pub fund_amount: serde_json::Value,

    #[serde(rename = "transactionId")]
    pub transaction_id: String,

    /// RFC 3339, carimbado pelo servidor
    #[serde(rename = "fundDate")]
    pub fund_date: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateFundRequest {
    #[serde(rename = "donorEmail")]
    pub donor_email: Option<String>,
    #[serde(rename = "donorName")]
    pub donor_name: Option<String>,
    #[serde(rename = "fundAmount")]
    #[schema(value_type = Object)]
    pub fund_amount: Option<serde_json::Value>,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
}

/// Body de POST /create-payment-intent
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePaymentIntentRequest {
    #[schema(value_type = Object)]
    pub amount: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaymentIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}
