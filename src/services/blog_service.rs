use crate::{
    database::MongoDB,
    models::{Blog, BlogStatus, CreateBlogRequest},
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

const COLLECTION: &str = "Blogs";

/// Cria um blog. Todo blog novo nasce `draft`, independente do cliente.
pub async fn create(db: &MongoDB, request: &CreateBlogRequest) -> Result<ObjectId, AppError> {
    let blog = Blog {
        id: None,
        title: request.title.clone(),
        thumbnail: request.thumbnail.clone(),
        content: request.content.clone(),
        status: BlogStatus::Draft,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let collection = db.collection::<Blog>(COLLECTION);
    let result = collection.insert_one(&blog).await?;

    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("Insert returned no ObjectId".to_string()))
}

/// Lista interna (painel volunteer/admin), filtro opcional de status
pub async fn list(db: &MongoDB, status: Option<BlogStatus>) -> Result<Vec<Blog>, AppError> {
    let collection = db.collection::<Blog>(COLLECTION);
    let blogs = collection
        .find(status_filter(status))
        .await?
        .try_collect()
        .await?;
    Ok(blogs)
}

/// Lista pública com ordenação por createdAt e paginação
pub async fn list_all(
    db: &MongoDB,
    status: Option<BlogStatus>,
    sort: Option<&str>,
    skip: u64,
    limit: i64,
) -> Result<Vec<Blog>, AppError> {
    let collection = db.collection::<Blog>(COLLECTION);

    let blogs = collection
        .find(status_filter(status))
        .sort(created_sort(sort))
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(blogs)
}

pub async fn count(db: &MongoDB, status: Option<BlogStatus>) -> Result<u64, AppError> {
    let collection = db.collection::<Blog>(COLLECTION);
    let count = collection.count_documents(status_filter(status)).await?;
    Ok(count)
}

pub async fn published(db: &MongoDB) -> Result<Vec<Blog>, AppError> {
    list(db, Some(BlogStatus::Published)).await
}

pub async fn get_by_id(db: &MongoDB, id: &str) -> Result<Option<Blog>, AppError> {
    let collection = db.collection::<Blog>(COLLECTION);
    let blog = collection.find_one(doc! { "_id": parse_id(id)? }).await?;
    Ok(blog)
}

/// Transição draft ⇄ published validada pela máquina de estados
pub async fn set_status(db: &MongoDB, id: &str, next: BlogStatus) -> Result<(u64, u64), AppError> {
    let object_id = parse_id(id)?;
    let collection = db.collection::<Blog>(COLLECTION);

    let current = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

    if !current.status.can_transition_to(next) {
        return Err(AppError::InvalidRequest(format!(
            "Illegal status transition: {} -> {}",
            current.status, next
        )));
    }

    let result = collection
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": { "status": next.to_string() } },
        )
        .await?;

    Ok((result.matched_count, result.modified_count))
}

pub async fn delete_by_id(db: &MongoDB, id: &str) -> Result<u64, AppError> {
    let collection = db.collection::<Blog>(COLLECTION);
    let result = collection.delete_one(doc! { "_id": parse_id(id)? }).await?;
    Ok(result.deleted_count)
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest("Invalid blog ID".to_string()))
}

fn status_filter(status: Option<BlogStatus>) -> Document {
    match status {
        Some(status) => doc! { "status": status.to_string() },
        None => doc! {},
    }
}

fn created_sort(sort: Option<&str>) -> Document {
    match sort {
        Some("asc") => doc! { "createdAt": 1 },
        Some("desc") => doc! { "createdAt": -1 },
        _ => doc! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_uses_wire_value() {
        assert_eq!(
            status_filter(Some(BlogStatus::Published)).get_str("status").unwrap(),
            "published"
        );
        assert!(status_filter(None).is_empty());
    }

    #[test]
    fn created_sort_falls_back_to_natural_order() {
        assert!(created_sort(Some("newest")).is_empty());
        assert_eq!(created_sort(Some("desc")).get_i32("createdAt").unwrap(), -1);
    }
}
