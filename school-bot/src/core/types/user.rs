//! Platform user identity.

use serde::{Deserialize, Serialize};
use storage::UserProfile;

/// Sender of an update as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

impl User {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            telegram_id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            language_code: self.language_code.clone(),
        }
    }
}
