use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

// Postgres SQLSTATE codes the store maps onto user-facing errors.
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Turns a constraint violation raised by an insert or update into a
    /// validation error; anything else stays a store failure.
    pub fn on_write(err: sqlx::Error, parent: &str) -> Self {
        match constraint_code(&err).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => AppError::Validation(format!("{} must exist", parent)),
            Some(NOT_NULL_VIOLATION) => AppError::Validation(err.to_string()),
            _ => AppError::Db(err),
        }
    }

    /// Turns a foreign key violation raised by a delete into a conflict.
    pub fn on_delete(err: sqlx::Error, what: &str) -> Self {
        match constraint_code(&err).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => {
                AppError::Conflict(format!("{} still has dependent price records", what))
            }
            _ => AppError::Db(err),
        }
    }
}

fn constraint_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}
