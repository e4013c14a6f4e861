use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// District model representing Indonesian districts (kecamatan)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct District {
    pub id: Uuid,
    pub name: String,
    pub regency_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
