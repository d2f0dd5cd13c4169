use crate::database::MongoDB;
use crate::models::{
    CreateDonationRequest, DonationStatus, PatchDonationRequest, UpdateDonationStatusRequest,
};
use crate::services::donation_service;
use crate::utils::AppError;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MyDonationCountQuery {
    pub email: String,
    pub status: Option<DonationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct MyDonationListQuery {
    pub filter: Option<DonationStatus>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub email: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DonationListQuery {
    #[serde(rename = "donationStatus")]
    pub donation_status: Option<DonationStatus>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AllDonationListQuery {
    pub filter: Option<DonationStatus>,
    pub sort: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DonationCountQuery {
    pub status: Option<DonationStatus>,
}

/// POST /create-donate-request - sempre nasce pending
#[utoipa::path(
    post,
    path = "/create-donate-request",
    tag = "Donations",
    request_body = CreateDonationRequest,
    responses(
        (status = 200, description = "Donation request created with pending status")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    body: web::Json<CreateDonationRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = donation_service::create(&db, &body).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "insertedId": id.to_hex(),
    })))
}

/// GET /all-my-donation-count
pub async fn my_count(
    query: web::Query<MyDonationCountQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let count = donation_service::count_mine(&db, &query.email, query.status).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// GET /my-all-donation-request/{email}
pub async fn my_requests(
    path: web::Path<String>,
    query: web::Query<MyDonationListQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    let requests = donation_service::list_mine(
        &db,
        &email,
        query.filter,
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(0),
    )
    .await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// GET /donation-request - os 3 pedidos mais recentes do solicitante
pub async fn recent(
    query: web::Query<RecentQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let requests = donation_service::recent_for_requester(&db, &query.email).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// GET /donation-requests - lista pública filtrável/ordenável
#[utoipa::path(
    get,
    path = "/donation-requests",
    tag = "Donations",
    responses(
        (status = 200, description = "Donation requests, optionally filtered by status and sorted by date")
    )
)]
pub async fn list(
    query: web::Query<DonationListQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let requests =
        donation_service::list_all(&db, query.donation_status, query.sort.as_deref(), 0, 0).await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// GET /all-blood-donation-request - lista pública com paginação
pub async fn list_paginated(
    query: web::Query<AllDonationListQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let requests = donation_service::list_all(
        &db,
        query.filter,
        query.sort.as_deref(),
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(0),
    )
    .await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// GET /all-donation-count
pub async fn count(
    query: web::Query<DonationCountQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let count = donation_service::count_all(&db, query.status).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// GET /admin/blood-requests/count
pub async fn admin_count(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let count = donation_service::count_all(&db, None).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// GET /donation-request/{id}
pub async fn get_by_id(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let request = donation_service::get_by_id(&db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Donation request not found".to_string()))?;

    Ok(HttpResponse::Ok().json(request))
}

/// PATCH /donation-requests/{id} - edição de campos não críticos
pub async fn patch(
    path: web::Path<String>,
    body: web::Json<PatchDonationRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (matched, modified) = donation_service::patch_fields(&db, &id, &body).await?;

    if matched == 0 {
        return Err(AppError::NotFound("Donation request not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "matchedCount": matched,
        "modifiedCount": modified,
    })))
}

/// PUT /donation-request/{id} - avanço de status validado pela máquina
/// de estados + atribuição de doador
pub async fn update_status(
    path: web::Path<String>,
    body: web::Json<UpdateDonationStatusRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (matched, modified) = donation_service::set_status(&db, &id, &body).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "matchedCount": matched,
        "modifiedCount": modified,
    })))
}

/// DELETE /donation-request/{id}
pub async fn delete(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let deleted = donation_service::delete_by_id(&db, &id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Donation request not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "deletedCount": deleted,
    })))
}
