use crate::{
    database::MongoDB,
    models::{CreateFundRequest, Fund},
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

const COLLECTION: &str = "Funds";

/// Lista de fundos, mais recentes primeiro
pub async fn list(db: &MongoDB, skip: u64, limit: i64) -> Result<Vec<Fund>, AppError> {
    let collection = db.collection::<Fund>(COLLECTION);

    let funds = collection
        .find(doc! {})
        .sort(doc! { "fundDate": -1 })
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(funds)
}

/// Persiste o registro do fundo após o pagamento concluído no cliente.
/// Os dois passos (intent + registro) não são transacionais; ver DESIGN.md.
pub async fn insert(db: &MongoDB, request: &CreateFundRequest) -> Result<ObjectId, AppError> {
    let donor_email = required_string(&request.donor_email, "donorEmail")?;
    let donor_name = required_string(&request.donor_name, "donorName")?;
    let transaction_id = required_string(&request.transaction_id, "transactionId")?;
    let fund_amount = request
        .fund_amount
        .clone()
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::InvalidRequest("Missing required fields".to_string()))?;

    let fund = Fund {
        id: None,
        donor_email,
        donor_name,
        fund_amount,
        transaction_id,
        fund_date: chrono::Utc::now().to_rfc3339(),
    };

    let collection = db.collection::<Fund>(COLLECTION);
    let result = collection.insert_one(&fund).await?;

    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("Insert returned no ObjectId".to_string()))
}

/// Contador de exibição da coleção inteira. Único ponto onde contagem
/// estimada é aceitável - todos os outros contadores são exatos.
pub async fn estimated_count(db: &MongoDB) -> Result<u64, AppError> {
    let collection = db.collection::<Fund>(COLLECTION);
    let count = collection.estimated_document_count().await?;
    Ok(count)
}

/// Soma de todos os fundAmount com coerção numérica ($toDouble cobre os
/// valores gravados como string). Coleção vazia soma 0.
pub async fn total_funding(db: &MongoDB) -> Result<f64, AppError> {
    let collection = db.collection::<Document>(COLLECTION);

    let pipeline = vec![doc! {
        "$group": {
            "_id": null,
            "total": { "$sum": { "$toDouble": "$fundAmount" } },
        }
    }];

    let mut cursor = collection.aggregate(pipeline).await?;

    let total = match cursor.try_next().await? {
        Some(group) => group.get_f64("total").unwrap_or(0.0),
        None => 0.0,
    };

    Ok(total)
}

fn required_string(value: &Option<String>, field: &str) -> Result<String, AppError> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidRequest(format!("Missing required field: {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_string_rejects_missing_and_empty() {
        assert!(required_string(&None, "donorEmail").is_err());
        assert!(required_string(&Some(String::new()), "donorEmail").is_err());
        assert_eq!(
            required_string(&Some("a@x.com".to_string()), "donorEmail").unwrap(),
            "a@x.com"
        );
    }

    #[test]
    fn fund_amount_keeps_client_typing() {
        // o valor entra como número ou string e é gravado como veio
        let fund: Fund = serde_json::from_str(
            r#"{ "donorEmail": "a@x.com", "donorName": "A", "fundAmount": "25.50",
                 "transactionId": "pi_1", "fundDate": "2026-01-01T00:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(fund.fund_amount, serde_json::json!("25.50"));

        let fund: Fund = serde_json::from_str(
            r#"{ "donorEmail": "a@x.com", "donorName": "A", "fundAmount": 25.5,
                 "transactionId": "pi_1", "fundDate": "2026-01-01T00:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(fund.fund_amount, serde_json::json!(25.5));
    }
}
