//! Bread Model

use serde::{Deserialize, Serialize};

/// Bread catalog item
///
/// Catalog data is owned by the bread catalog collaborator; `price` is the
/// unit price used when a reservation snapshot is taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bread {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
}

/// One requested bread line in a create/update payload.
///
/// Selection order is significant: the i-th selection pairs with the i-th
/// bread resolved by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadSelection {
    pub name: String,
    pub count: i32,
}
