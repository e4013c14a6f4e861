use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Province model representing Indonesian provinces (provinsi), the root of the hierarchy
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Province {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
