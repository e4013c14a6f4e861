use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Village model representing Indonesian villages (kelurahan/desa)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Village {
    pub id: Uuid,
    pub name: String,
    pub district_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Village {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
