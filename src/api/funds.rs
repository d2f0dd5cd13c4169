use crate::database::MongoDB;
use crate::models::CreateFundRequest;
use crate::services::fund_service;
use crate::utils::AppError;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct FundListQuery {
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

/// GET /funds - lista paginada, mais recentes primeiro
#[utoipa::path(
    get,
    path = "/funds",
    tag = "Funds",
    responses(
        (status = 200, description = "Funds sorted by date descending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    query: web::Query<FundListQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let funds = fund_service::list(&db, query.skip.unwrap_or(0), query.limit.unwrap_or(0)).await?;
    Ok(HttpResponse::Ok().json(funds))
}

/// POST /funds - registra o fundo após o pagamento concluído no cliente
pub async fn create(
    body: web::Json<CreateFundRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = fund_service::insert(&db, &body).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "insertedId": id.to_hex(),
    })))
}

/// GET /funds-count - contador estimado de exibição
pub async fn count(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let count = fund_service::estimated_count(&db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// GET /admin/funding/total - soma agregada de todos os fundos
#[utoipa::path(
    get,
    path = "/admin/funding/total",
    tag = "Funds",
    responses(
        (status = 200, description = "Numeric total of all fund amounts, 0 when empty")
    )
)]
pub async fn total(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let total = fund_service::total_funding(&db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "total": total })))
}
