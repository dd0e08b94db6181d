use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application error taxonomy. Expected domain conditions (full event,
/// reserve on an open event) are variants here so callers can match on them;
/// only storage failures are opaque.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    InvalidEvent(String),
    Validation(String),
    AtCapacity,
    NotReservable,
    EventCancelled(String),
    Unauthenticated,
    Forbidden(String),
    Conflict(String),
    DatabaseError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidEvent(msg) => write!(f, "Invalid event: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::AtCapacity => write!(f, "Event is at capacity"),
            AppError::NotReservable => write!(f, "Event does not take reservations"),
            AppError::EventCancelled(msg) => write!(f, "Event cancelled: {}", msg),
            AppError::Unauthenticated => write!(f, "Authentication required"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidEvent(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AtCapacity => (StatusCode::CONFLICT, "Event is at capacity".to_string()),
            AppError::NotReservable => (
                StatusCode::CONFLICT,
                "Event does not take reservations".to_string(),
            ),
            AppError::EventCancelled(msg) => (StatusCode::GONE, msg.clone()),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Unique constraint violated: {}", db.message()))
            }
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
