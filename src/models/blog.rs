use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de publicação de um blog. draft ⇄ published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

impl BlogStatus {
    pub fn can_transition_to(self, next: BlogStatus) -> bool {
        self != next
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogStatus::Draft => write!(f, "draft"),
            BlogStatus::Published => write!(f, "published"),
        }
    }
}

/// Blog (coleção `Blogs`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,

    pub thumbnail: Option<String>,

    pub content: Option<String>,

    pub status: BlogStatus,

    /// RFC 3339, carimbado pelo servidor
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Request de criação (POST /blogs). Todo blog novo nasce `draft`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateBlogRequest {
    pub title: String,
    pub thumbnail: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateBlogStatusRequest {
    pub status: BlogStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_and_published_flip() {
        assert!(BlogStatus::Draft.can_transition_to(BlogStatus::Published));
        assert!(BlogStatus::Published.can_transition_to(BlogStatus::Draft));
        assert!(!BlogStatus::Draft.can_transition_to(BlogStatus::Draft));
    }

    #[test]
    fn status_wire_values() {
        assert_eq!(serde_json::to_string(&BlogStatus::Draft).unwrap(), "\"draft\"");
        assert_eq!(
            serde_json::from_str::<BlogStatus>("\"published\"").unwrap(),
            BlogStatus::Published
        );
    }
}
