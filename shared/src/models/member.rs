//! Member Model

use serde::{Deserialize, Serialize};

/// Member entity
///
/// Looked up through the member directory collaborator; the reservation
/// server references members but never owns or mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
