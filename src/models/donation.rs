use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ciclo de vida de um pedido de doação de sangue.
///
/// Transições legais:
/// pending → inprogress | canceled
/// inprogress → done | canceled
/// done / canceled são terminais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Inprogress,
    Done,
    Canceled,
}

impl DonationStatus {
    pub fn can_transition_to(self, next: DonationStatus) -> bool {
        matches!(
            (self, next),
            (DonationStatus::Pending, DonationStatus::Inprogress)
                | (DonationStatus::Pending, DonationStatus::Canceled)
                | (DonationStatus::Inprogress, DonationStatus::Done)
                | (DonationStatus::Inprogress, DonationStatus::Canceled)
        )
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DonationStatus::Pending => write!(f, "pending"),
            DonationStatus::Inprogress => write!(f, "inprogress"),
            DonationStatus::Done => write!(f, "done"),
            DonationStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// Pedido de doação (coleção `Donation`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "requesterEmail")]
    pub requester_email: String,

    #[serde(rename = "requesterName")]
    pub requester_name: Option<String>,

    #[serde(rename = "recipientName")]
    pub recipient_name: Option<String>,

    #[serde(rename = "recipientDistrict")]
    pub recipient_district: Option<String>,

    #[serde(rename = "recipientUpazila")]
    pub recipient_upazila: Option<String>,

    #[serde(rename = "hospitalName")]
    pub hospital_name: Option<String>,

    #[serde(rename = "fullAddress")]
    pub full_address: Option<String>,

    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,

    #[serde(rename = "donationDate")]
    pub donation_date: Option<String>,

    #[serde(rename = "donationTime")]
    pub donation_time: Option<String>,

    #[serde(rename = "requestMessage")]
    pub request_message: Option<String>,

    #[serde(rename = "donationStatus")]
    pub donation_status: DonationStatus,

    #[serde(rename = "donorEmail", skip_serializing_if = "Option::is_none")]
    pub donor_email: Option<String>,

    #[serde(rename = "donorName", skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
}

/// Request de criação (POST /create-donate-request).
/// Não há campo de status: todo pedido novo nasce `pending`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateDonationRequest {
    #[serde(rename = "requesterEmail")]
    pub requester_email: String,
    #[serde(rename = "requesterName")]
    pub requester_name: Option<String>,
    #[serde(rename = "recipientName")]
    pub recipient_name: Option<String>,
    #[serde(rename = "recipientDistrict")]
    pub recipient_district: Option<String>,
    #[serde(rename = "recipientUpazila")]
    pub recipient_upazila: Option<String>,
    #[serde(rename = "hospitalName")]
    pub hospital_name: Option<String>,
    #[serde(rename = "fullAddress")]
    pub full_address: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    #[serde(rename = "donationDate")]
    pub donation_date: Option<String>,
    #[serde(rename = "donationTime")]
    pub donation_time: Option<String>,
    #[serde(rename = "requestMessage")]
    pub request_message: Option<String>,
}

/// Edição pública de campos do pedido (PATCH /donation-requests/{id}).
/// Identidade, dono e status ficam de fora do DTO: só mudam pelos
/// endpoints dedicados.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PatchDonationRequest {
    #[serde(rename = "recipientName")]
    pub recipient_name: Option<String>,
    #[serde(rename = "recipientDistrict")]
    pub recipient_district: Option<String>,
    #[serde(rename = "recipientUpazila")]
    pub recipient_upazila: Option<String>,
    #[serde(rename = "hospitalName")]
    pub hospital_name: Option<String>,
    #[serde(rename = "fullAddress")]
    pub full_address: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    #[serde(rename = "donationDate")]
    pub donation_date: Option<String>,
    #[serde(rename = "donationTime")]
    pub donation_time: Option<String>,
    #[serde(rename = "requestMessage")]
    pub request_message: Option<String>,
}

/// Avanço de status + atribuição de doador (PUT /donation-request/{id})
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateDonationStatusRequest {
    #[serde(rename = "donationStatus")]
    pub donation_status: DonationStatus,
    #[serde(rename = "donorEmail")]
    pub donor_email: Option<String>,
    #[serde(rename = "donorName")]
    pub donor_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_values() {
        assert_eq!(
            serde_json::to_string(&DonationStatus::Inprogress).unwrap(),
            "\"inprogress\""
        );
        assert_eq!(
            serde_json::from_str::<DonationStatus>("\"canceled\"").unwrap(),
            DonationStatus::Canceled
        );
    }

    #[test]
    fn legal_transitions() {
        assert!(DonationStatus::Pending.can_transition_to(DonationStatus::Inprogress));
        assert!(DonationStatus::Pending.can_transition_to(DonationStatus::Canceled));
        assert!(DonationStatus::Inprogress.can_transition_to(DonationStatus::Done));
        assert!(DonationStatus::Inprogress.can_transition_to(DonationStatus::Canceled));
    }

    #[test]
    fn illegal_transitions_rejected() {
        assert!(!DonationStatus::Pending.can_transition_to(DonationStatus::Done));
        assert!(!DonationStatus::Done.can_transition_to(DonationStatus::Pending));
        assert!(!DonationStatus::Canceled.can_transition_to(DonationStatus::Inprogress));
        // auto-transição não é permitida
        assert!(!DonationStatus::Pending.can_transition_to(DonationStatus::Pending));
    }

    #[test]
    fn patch_request_cannot_carry_status_or_owner() {
        let req: PatchDonationRequest = serde_json::from_str(
            r#"{ "hospitalName": "DMC", "donationStatus": "done", "requesterEmail": "x@y.z" }"#,
        )
        .unwrap();
        assert_eq!(req.hospital_name.as_deref(), Some("DMC"));
    }
}
