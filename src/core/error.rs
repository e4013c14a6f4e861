use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Referential integrity error: {0}")]
    ReferentialIntegrity(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Convert a write failure into a domain error.
///
/// Foreign key violations (PostgreSQL error code 23503) mean the referenced
/// parent region does not exist.
pub fn handle_write_error(e: sqlx::Error, parent: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::ReferentialIntegrity(format!("Referenced {} does not exist", parent));
        }
    }

    tracing::error!("Database write failed: {:?}", e);
    AppError::Database(e)
}

pub type Result<T> = std::result::Result<T, AppError>;
