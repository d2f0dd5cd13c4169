use crate::database::MongoDB;
use crate::models::{BlogStatus, CreateBlogRequest, UpdateBlogStatusRequest};
use crate::services::blog_service;
use crate::utils::AppError;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BlogStatusQuery {
    pub status: Option<BlogStatus>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BlogListQuery {
    pub status: Option<BlogStatus>,
    pub sort: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

/// POST /blogs - todo blog novo nasce draft
pub async fn create(
    body: web::Json<CreateBlogRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = blog_service::create(&db, &body).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "insertedId": id.to_hex(),
    })))
}

/// GET /blogs - painel interno (volunteer/admin)
pub async fn list(
    query: web::Query<BlogStatusQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let blogs = blog_service::list(&db, query.status).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /all-blogs - lista pública com ordenação e paginação
#[utoipa::path(
    get,
    path = "/all-blogs",
    tag = "Blogs",
    responses(
        (status = 200, description = "Blogs, optionally filtered by status and sorted by creation date")
    )
)]
pub async fn list_all(
    query: web::Query<BlogListQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let blogs = blog_service::list_all(
        &db,
        query.status,
        query.sort.as_deref(),
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(0),
    )
    .await?;

    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /all-blogs-count
pub async fn count(
    query: web::Query<BlogStatusQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let count = blog_service::count(&db, query.status).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// GET /blogs-published - vitrine pública
pub async fn published(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let blogs = blog_service::published(&db).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /blogs/{id}
pub async fn get_by_id(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let blog = blog_service::get_by_id(&db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

    Ok(HttpResponse::Ok().json(blog))
}

/// PATCH /blogs/{id} - transição draft ⇄ published (volunteer/admin)
pub async fn set_status(
    path: web::Path<String>,
    body: web::Json<UpdateBlogStatusRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (matched, modified) = blog_service::set_status(&db, &id, body.status).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "matchedCount": matched,
        "modifiedCount": modified,
    })))
}

/// DELETE /blog/{id} - só admin
pub async fn delete(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let deleted = blog_service::delete_by_id(&db, &id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Blog not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "deletedCount": deleted,
    })))
}
