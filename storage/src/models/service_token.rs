use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential for an external service, keyed by service name (e.g. `gdrive`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceToken {
    pub service: String,
    pub token: String,
    pub updated_at: DateTime<Utc>,
}
