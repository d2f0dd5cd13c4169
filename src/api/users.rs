use crate::database::MongoDB;
use crate::middleware::auth::TokenEmail;
use crate::models::{
    AddUserRequest, UpdateProfileRequest, UpdateRoleRequest, UpdateStatusRequest, UserStatus,
};
use crate::services::user_service::{self, LoginUpsert};
use crate::utils::AppError;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub status: Option<UserStatus>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UserCountQuery {
    pub status: Option<UserStatus>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DonorSearchQuery {
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// POST /add-user - login-ou-registro idempotente
#[utoipa::path(
    post,
    path = "/add-user",
    tag = "Users",
    request_body = AddUserRequest,
    responses(
        (status = 200, description = "User created or login timestamp refreshed")
    )
)]
pub async fn add_user(
    body: web::Json<AddUserRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    match user_service::upsert_login(&db, &body).await? {
        LoginUpsert::Created(id) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "insertedId": id.to_hex(),
        }))),
        LoginUpsert::Touched { matched, modified } => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "matchedCount": matched,
            "modifiedCount": modified,
        }))),
    }
}

/// GET /user/{email}
#[utoipa::path(
    get,
    path = "/user/{email}",
    tag = "Users",
    responses(
        (status = 200, description = "User found"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    let user = user_service::get_by_email(&db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// PUT /user/{email} - atualização de perfil, só pelo próprio dono.
/// Email do token diferente do email do path é sempre 403, sem escrita.
pub async fn update_profile(
    token_email: web::ReqData<TokenEmail>,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    if token_email.0 != email {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }

    let matched = user_service::update_profile(&db, &email, &body).await?;
    if matched == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "User updated successfully",
    })))
}

/// GET /all-users - lista com filtro opcional de status e paginação
pub async fn all_users(
    query: web::Query<UserListQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let users = user_service::list_users(
        &db,
        query.status,
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(0),
    )
    .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// GET /all-users-count
pub async fn all_users_count(
    query: web::Query<UserCountQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let count = user_service::count_users(&db, query.status).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// GET /donors/search - busca pública de doadores
#[utoipa::path(
    get,
    path = "/donors/search",
    tag = "Users",
    responses(
        (status = 200, description = "Matching donors; empty list when no criteria given")
    )
)]
pub async fn search_donors(
    query: web::Query<DonorSearchQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let donors = user_service::search_donors(
        &db,
        query.blood_group.as_deref(),
        query.district.as_deref(),
        query.upazila.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(donors))
}

/// GET /admin/users/count - contador de doadores do painel
pub async fn admin_users_count(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let count = user_service::count_donors(&db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// PATCH /user/{id}/role - só admin
pub async fn set_role(
    path: web::Path<String>,
    body: web::Json<UpdateRoleRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (matched, modified) = user_service::set_role(&db, &id, body.role).await?;

    if matched == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "matchedCount": matched,
        "modifiedCount": modified,
    })))
}

/// PATCH /user/{id}/status - só admin
pub async fn set_status(
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (matched, modified) = user_service::set_status(&db, &id, body.status).await?;

    if matched == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "matchedCount": matched,
        "modifiedCount": modified,
    })))
}
