use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A host string bound to a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Domain {
    pub id: i64,
    pub domain: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
}
