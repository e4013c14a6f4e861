use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Regency model representing Indonesian regencies/cities (kabupaten/kota)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Regency {
    pub id: Uuid,
    pub name: String,
    pub province_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Regency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
