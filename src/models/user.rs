use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Papel do usuário na plataforma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Volunteer,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Donor => write!(f, "donor"),
            UserRole::Volunteer => write!(f, "volunteer"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Usuário (coleção `users`). Email é a chave natural única.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub email: String,

    pub name: Option<String>,

    pub avatar: Option<String>,

    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,

    pub district: Option<String>,

    pub upazila: Option<String>,

    #[serde(default = "default_role")]
    pub role: UserRole,

    #[serde(default = "default_status")]
    pub status: UserStatus,

    /// RFC 3339, carimbado no primeiro login
    pub created_at: Option<String>,

    /// RFC 3339, atualizado a cada login
    #[serde(rename = "last_loggedIn")]
    pub last_logged_in: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Donor
}

fn default_status() -> UserStatus {
    UserStatus::Active
}

/// Request de login-ou-registro (POST /add-user).
/// `role`/`status`/timestamps vindos do cliente são descartados: o servidor
/// sempre carimba donor/active na criação.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// Atualização de perfil self-service (PUT /user/{email}).
/// Não carrega email/role/status: esses campos só mudam pelos
/// endpoints dedicados com gate de admin.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Donor).unwrap(), "\"donor\"");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"volunteer\"").unwrap(),
            UserRole::Volunteer
        );
    }

    #[test]
    fn user_defaults_to_active_donor() {
        let user: User = serde_json::from_str(r#"{ "email": "a@x.com" }"#).unwrap();
        assert_eq!(user.role, UserRole::Donor);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn add_user_request_ignores_privileged_fields() {
        // role enviado pelo cliente não existe no DTO, logo não chega ao insert
        let req: AddUserRequest =
            serde_json::from_str(r#"{ "email": "a@x.com", "role": "admin" }"#).unwrap();
        assert_eq!(req.email, "a@x.com");
    }
}
