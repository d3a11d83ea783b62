//! Login user models.

use serde::{Deserialize, Serialize};

/// A login account. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: String,
}
