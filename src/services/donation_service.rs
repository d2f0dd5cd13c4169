use crate::{
    database::MongoDB,
    models::{
        CreateDonationRequest, DonationRequest, DonationStatus, PatchDonationRequest,
        UpdateDonationStatusRequest,
    },
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

const COLLECTION: &str = "Donation";

/// Cria um pedido de doação. O status do cliente é irrelevante: todo
/// pedido novo nasce `pending`.
pub async fn create(db: &MongoDB, request: &CreateDonationRequest) -> Result<ObjectId, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);

    let donation = DonationRequest {
        id: None,
        requester_email: request.requester_email.clone(),
        requester_name: request.requester_name.clone(),
        recipient_name: request.recipient_name.clone(),
        recipient_district: request.recipient_district.clone(),
        recipient_upazila: request.recipient_upazila.clone(),
        hospital_name: request.hospital_name.clone(),
        full_address: request.full_address.clone(),
        blood_group: request.blood_group.clone(),
        donation_date: request.donation_date.clone(),
        donation_time: request.donation_time.clone(),
        request_message: request.request_message.clone(),
        donation_status: DonationStatus::Pending,
        donor_email: None,
        donor_name: None,
    };

    let result = collection.insert_one(&donation).await?;

    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("Insert returned no ObjectId".to_string()))
}

/// Pedidos do próprio solicitante, com filtro opcional de status e paginação
pub async fn list_mine(
    db: &MongoDB,
    requester_email: &str,
    status: Option<DonationStatus>,
    skip: u64,
    limit: i64,
) -> Result<Vec<DonationRequest>, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);

    let requests = collection
        .find(requester_filter(requester_email, status))
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(requests)
}

pub async fn count_mine(
    db: &MongoDB,
    requester_email: &str,
    status: Option<DonationStatus>,
) -> Result<u64, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);
    let count = collection
        .count_documents(requester_filter(requester_email, status))
        .await?;
    Ok(count)
}

/// Os três pedidos mais recentes de um solicitante (dashboard)
pub async fn recent_for_requester(
    db: &MongoDB,
    requester_email: &str,
) -> Result<Vec<DonationRequest>, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);

    let requests = collection
        .find(doc! { "requesterEmail": requester_email })
        .sort(doc! { "donationDate": -1 })
        .limit(3)
        .await?
        .try_collect()
        .await?;

    Ok(requests)
}

/// Lista pública: filtro opcional de status, ordenação por donationDate
/// (asc/desc) e paginação. skip/limit em 0 significam sem limite.
pub async fn list_all(
    db: &MongoDB,
    status: Option<DonationStatus>,
    sort: Option<&str>,
    skip: u64,
    limit: i64,
) -> Result<Vec<DonationRequest>, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);

    let requests = collection
        .find(status_filter(status))
        .sort(date_sort(sort))
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(requests)
}

pub async fn count_all(db: &MongoDB, status: Option<DonationStatus>) -> Result<u64, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);
    let count = collection.count_documents(status_filter(status)).await?;
    Ok(count)
}

pub async fn get_by_id(db: &MongoDB, id: &str) -> Result<Option<DonationRequest>, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);
    let request = collection.find_one(doc! { "_id": parse_id(id)? }).await?;
    Ok(request)
}

/// Edição pública de campos não críticos. O DTO já exclui _id, dono e
/// status; aqui só montamos o $set com o que veio. Retorna (matched, modified).
pub async fn patch_fields(
    db: &MongoDB,
    id: &str,
    request: &PatchDonationRequest,
) -> Result<(u64, u64), AppError> {
    let update = patch_update_doc(request);
    if update.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    let collection = db.collection::<DonationRequest>(COLLECTION);
    let result = collection
        .update_one(doc! { "_id": parse_id(id)? }, doc! { "$set": update })
        .await?;

    Ok((result.matched_count, result.modified_count))
}

/// Avanço de status com máquina de estados + atribuição de doador.
/// Transições ilegais são rejeitadas antes de qualquer escrita.
pub async fn set_status(
    db: &MongoDB,
    id: &str,
    request: &UpdateDonationStatusRequest,
) -> Result<(u64, u64), AppError> {
    let object_id = parse_id(id)?;
    let collection = db.collection::<DonationRequest>(COLLECTION);

    let current = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Donation request not found".to_string()))?;

    let next = request.donation_status;
    if !current.donation_status.can_transition_to(next) {
        return Err(AppError::InvalidRequest(format!(
            "Illegal status transition: {} -> {}",
            current.donation_status, next
        )));
    }

    let mut update = doc! { "donationStatus": next.to_string() };
    if let Some(donor_email) = &request.donor_email {
        update.insert("donorEmail", donor_email);
    }
    if let Some(donor_name) = &request.donor_name {
        update.insert("donorName", donor_name);
    }

    let result = collection
        .update_one(doc! { "_id": object_id }, doc! { "$set": update })
        .await?;

    Ok((result.matched_count, result.modified_count))
}

pub async fn delete_by_id(db: &MongoDB, id: &str) -> Result<u64, AppError> {
    let collection = db.collection::<DonationRequest>(COLLECTION);
    let result = collection.delete_one(doc! { "_id": parse_id(id)? }).await?;
    Ok(result.deleted_count)
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest("Invalid donation request ID".to_string()))
}

fn requester_filter(requester_email: &str, status: Option<DonationStatus>) -> Document {
    let mut filter = doc! { "requesterEmail": requester_email };
    if let Some(status) = status {
        filter.insert("donationStatus", status.to_string());
    }
    filter
}

fn status_filter(status: Option<DonationStatus>) -> Document {
    match status {
        Some(status) => doc! { "donationStatus": status.to_string() },
        None => doc! {},
    }
}

/// Ordenação por donationDate: só "asc"/"desc" contam, o resto mantém
/// a ordem natural da coleção.
fn date_sort(sort: Option<&str>) -> Document {
    match sort {
        Some("asc") => doc! { "donationDate": 1 },
        Some("desc") => doc! { "donationDate": -1 },
        _ => doc! {},
    }
}

fn patch_update_doc(request: &PatchDonationRequest) -> Document {
    let mut update = doc! {};
    if let Some(recipient_name) = &request.recipient_name {
        update.insert("recipientName", recipient_name);
    }
    if let Some(recipient_district) = &request.recipient_district {
        update.insert("recipientDistrict", recipient_district);
    }
    if let Some(recipient_upazila) = &request.recipient_upazila {
        update.insert("recipientUpazila", recipient_upazila);
    }
    if let Some(hospital_name) = &request.hospital_name {
        update.insert("hospitalName", hospital_name);
    }
    if let Some(full_address) = &request.full_address {
        update.insert("fullAddress", full_address);
    }
    if let Some(blood_group) = &request.blood_group {
        update.insert("bloodGroup", blood_group);
    }
    if let Some(donation_date) = &request.donation_date {
        update.insert("donationDate", donation_date);
    }
    if let Some(donation_time) = &request.donation_time {
        update.insert("donationTime", donation_time);
    }
    if let Some(request_message) = &request.request_message {
        update.insert("requestMessage", request_message);
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requester_filter_includes_status_only_when_given() {
        let plain = requester_filter("a@x.com", None);
        assert_eq!(plain.get_str("requesterEmail").unwrap(), "a@x.com");
        assert!(plain.get("donationStatus").is_none());

        let filtered = requester_filter("a@x.com", Some(DonationStatus::Done));
        assert_eq!(filtered.get_str("donationStatus").unwrap(), "done");
    }

    #[test]
    fn date_sort_only_accepts_asc_desc() {
        assert_eq!(date_sort(Some("asc")).get_i32("donationDate").unwrap(), 1);
        assert_eq!(date_sort(Some("desc")).get_i32("donationDate").unwrap(), -1);
        assert!(date_sort(Some("upwards")).is_empty());
        assert!(date_sort(None).is_empty());
    }

    #[test]
    fn patch_doc_never_carries_protected_fields() {
        let request = PatchDonationRequest {
            recipient_name: Some("Karim".to_string()),
            recipient_district: None,
            recipient_upazila: None,
            hospital_name: Some("DMCH".to_string()),
            full_address: None,
            blood_group: None,
            donation_date: None,
            donation_time: None,
            request_message: None,
        };
        let update = patch_update_doc(&request);
        assert_eq!(update.get_str("recipientName").unwrap(), "Karim");
        assert!(update.get("donationStatus").is_none());
        assert!(update.get("requesterEmail").is_none());
        assert!(update.get("_id").is_none());
    }

    #[test]
    fn invalid_object_id_is_invalid_request() {
        assert!(matches!(parse_id("nope"), Err(AppError::InvalidRequest(_))));
        assert!(parse_id("507f1f77bcf86cd799439011").is_ok());
    }
}
