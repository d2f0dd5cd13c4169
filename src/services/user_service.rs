use crate::{
    database::MongoDB,
    models::{AddUserRequest, UpdateProfileRequest, User, UserRole, UserStatus},
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

const COLLECTION: &str = "users";

/// Resultado do login-ou-registro
#[derive(Debug)]
pub enum LoginUpsert {
    /// Primeiro login: usuário inserido com role/status forçados
    Created(ObjectId),
    /// Login repetido: só o last_loggedIn foi tocado
    Touched { matched: u64, modified: u64 },
}

/// Login-ou-registro idempotente (POST /add-user).
///
/// Primeira chamada insere o usuário com `role=donor`, `status=active` e os
/// dois timestamps carimbados pelo servidor. Chamadas seguintes para o mesmo
/// email atualizam apenas `last_loggedIn` - nunca role, status ou created_at.
pub async fn upsert_login(db: &MongoDB, request: &AddUserRequest) -> Result<LoginUpsert, AppError> {
    let collection = db.collection::<User>(COLLECTION);
    let now = chrono::Utc::now().to_rfc3339();

    let query = doc! { "email": &request.email };

    let already_exists = collection.find_one(query.clone()).await?;

    if already_exists.is_some() {
        let result = collection
            .update_one(query, doc! { "$set": { "last_loggedIn": &now } })
            .await?;
        return Ok(LoginUpsert::Touched {
            matched: result.matched_count,
            modified: result.modified_count,
        });
    }

    let new_user = User {
        id: None,
        email: request.email.clone(),
        name: request.name.clone(),
        avatar: request.avatar.clone(),
        blood_group: request.blood_group.clone(),
        district: request.district.clone(),
        upazila: request.upazila.clone(),
        role: UserRole::Donor,
        status: UserStatus::Active,
        created_at: Some(now.clone()),
        last_logged_in: Some(now),
    };

    let result = collection.insert_one(&new_user).await?;

    let inserted_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("Insert returned no ObjectId".to_string()))?;

    log::info!("✅ User registered: {}", request.email);

    Ok(LoginUpsert::Created(inserted_id))
}

pub async fn get_by_email(db: &MongoDB, email: &str) -> Result<Option<User>, AppError> {
    let collection = db.collection::<User>(COLLECTION);
    let user = collection.find_one(doc! { "email": email }).await?;
    Ok(user)
}

/// Atualização de perfil self-service. O DTO não carrega email/role/status,
/// então esses campos nunca chegam ao $set. Retorna matched_count.
pub async fn update_profile(
    db: &MongoDB,
    email: &str,
    request: &UpdateProfileRequest,
) -> Result<u64, AppError> {
    let collection = db.collection::<User>(COLLECTION);

    let update = profile_update_doc(request);
    if update.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    let result = collection
        .update_one(doc! { "email": email }, doc! { "$set": update })
        .await?;

    Ok(result.matched_count)
}

pub async fn list_users(
    db: &MongoDB,
    status: Option<UserStatus>,
    skip: u64,
    limit: i64,
) -> Result<Vec<User>, AppError> {
    let collection = db.collection::<User>(COLLECTION);

    let filter = status_filter(status);
    let users = collection
        .find(filter)
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(users)
}

pub async fn count_users(db: &MongoDB, status: Option<UserStatus>) -> Result<u64, AppError> {
    let collection = db.collection::<User>(COLLECTION);
    let count = collection.count_documents(status_filter(status)).await?;
    Ok(count)
}

/// Contador de doadores do painel de admin
pub async fn count_donors(db: &MongoDB) -> Result<u64, AppError> {
    let collection = db.collection::<User>(COLLECTION);
    let count = collection.count_documents(doc! { "role": "donor" }).await?;
    Ok(count)
}

/// Busca pública de doadores. Sem nenhum critério a busca devolve lista
/// vazia em vez da coleção inteira.
pub async fn search_donors(
    db: &MongoDB,
    blood_group: Option<&str>,
    district: Option<&str>,
    upazila: Option<&str>,
) -> Result<Vec<User>, AppError> {
    let filter = match donor_search_filter(blood_group, district, upazila) {
        Some(filter) => filter,
        None => return Ok(vec![]),
    };

    let collection = db.collection::<User>(COLLECTION);
    let donors = collection.find(filter).await?.try_collect().await?;

    Ok(donors)
}

/// Troca de role por admin (PATCH /user/{id}/role)
pub async fn set_role(db: &MongoDB, id: &str, role: UserRole) -> Result<(u64, u64), AppError> {
    set_field(db, id, doc! { "role": role.to_string() }).await
}

/// Troca de status por admin (PATCH /user/{id}/status)
pub async fn set_status(db: &MongoDB, id: &str, status: UserStatus) -> Result<(u64, u64), AppError> {
    set_field(db, id, doc! { "status": status.to_string() }).await
}

async fn set_field(db: &MongoDB, id: &str, set: Document) -> Result<(u64, u64), AppError> {
    let object_id = ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest("Invalid user ID".to_string()))?;

    let collection = db.collection::<User>(COLLECTION);
    let result = collection
        .update_one(doc! { "_id": object_id }, doc! { "$set": set })
        .await?;

    Ok((result.matched_count, result.modified_count))
}

fn status_filter(status: Option<UserStatus>) -> Document {
    match status {
        Some(status) => doc! { "status": status.to_string() },
        None => doc! {},
    }
}

/// Filtro só com os parâmetros presentes e não vazios; None quando não
/// sobra critério nenhum.
fn donor_search_filter(
    blood_group: Option<&str>,
    district: Option<&str>,
    upazila: Option<&str>,
) -> Option<Document> {
    let mut filter = doc! {};
    if let Some(blood_group) = blood_group.filter(|s| !s.is_empty()) {
        filter.insert("bloodGroup", blood_group);
    }
    if let Some(district) = district.filter(|s| !s.is_empty()) {
        filter.insert("district", district);
    }
    if let Some(upazila) = upazila.filter(|s| !s.is_empty()) {
        filter.insert("upazila", upazila);
    }

    if filter.is_empty() {
        None
    } else {
        Some(filter)
    }
}

fn profile_update_doc(request: &UpdateProfileRequest) -> Document {
    let mut update = doc! {};
    if let Some(name) = &request.name {
        update.insert("name", name);
    }
    if let Some(avatar) = &request.avatar {
        update.insert("avatar", avatar);
    }
    if let Some(blood_group) = &request.blood_group {
        update.insert("bloodGroup", blood_group);
    }
    if let Some(district) = &request.district {
        update.insert("district", district);
    }
    if let Some(upazila) = &request.upazila {
        update.insert("upazila", upazila);
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_donor_search_builds_no_filter() {
        assert!(donor_search_filter(None, None, None).is_none());
        assert!(donor_search_filter(Some(""), Some(""), None).is_none());
    }

    #[test]
    fn donor_search_includes_only_present_params() {
        let filter = donor_search_filter(Some("A+"), None, Some("Savar")).unwrap();
        assert_eq!(filter.get_str("bloodGroup").unwrap(), "A+");
        assert_eq!(filter.get_str("upazila").unwrap(), "Savar");
        assert!(filter.get("district").is_none());
    }

    #[test]
    fn status_filter_is_empty_without_status() {
        assert!(status_filter(None).is_empty());
        assert_eq!(
            status_filter(Some(UserStatus::Blocked)).get_str("status").unwrap(),
            "blocked"
        );
    }

    #[test]
    fn profile_update_never_touches_privileged_fields() {
        let request = UpdateProfileRequest {
            name: Some("Rahim".to_string()),
            avatar: None,
            blood_group: Some("O-".to_string()),
            district: None,
            upazila: None,
        };
        let update = profile_update_doc(&request);
        assert_eq!(update.get_str("name").unwrap(), "Rahim");
        assert!(update.get("email").is_none());
        assert!(update.get("role").is_none());
        assert!(update.get("status").is_none());
    }
}
