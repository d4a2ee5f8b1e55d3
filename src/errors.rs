use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::fmt;

/// Errors raised by an [`InfluencerStore`](crate::store::InfluencerStore).
#[derive(Debug)]
pub enum StoreError {
    /// Error reported by the database driver.
    DatabaseError(sqlx::Error),
    /// A unique constraint rejected the write. Carries the constraint name.
    Duplicate(String),
}

impl StoreError {
    /// Whether the error text carries the duplicate-key signature.
    pub fn is_duplicate(&self) -> bool {
        self.to_string().contains("duplicate")
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(e) => write!(f, "Database error: {}", e),
            StoreError::Duplicate(constraint) => write!(
                f,
                "duplicate key value violates unique constraint \"{}\"",
                constraint
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::DatabaseError(e) => Some(e),
            StoreError::Duplicate(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    /// Unique violations become [`StoreError::Duplicate`]; everything else is kept as is.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                );
            }
        }
        StoreError::DatabaseError(err)
    }
}

/// Errors surfaced at the HTTP boundary.
///
/// Every variant renders the `{status, message, data}` envelope; the
/// underlying cause is logged and never sent to the caller.
#[derive(Debug)]
pub enum ApiError {
    /// Request body of the demo endpoint is not JSON.
    InvalidJson,
    /// Missing or empty required input.
    Validation(String),
    /// The store refused an insert.
    CreateFailed(StoreError),
    /// The store failed to run a list query.
    FetchFailed(StoreError),
    /// Anything unexpected.
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidJson => write!(f, "Invalid JSON data"),
            ApiError::Validation(msg) => write!(f, "Bad request: {}", msg),
            ApiError::CreateFailed(e) => write!(f, "Create failed: {}", e),
            ApiError::FetchFailed(e) => write!(f, "Fetch failed: {}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidJson => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": "Invalid JSON data",
                    "status": "error",
                }),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, envelope(msg, Value::Null)),
            ApiError::CreateFailed(e) => {
                tracing::error!("Store error: {}", e);
                let message = if e.is_duplicate() {
                    "Email or affiliate code already exists"
                } else {
                    "Failed to create influencer"
                };
                (StatusCode::BAD_REQUEST, envelope(message, Value::Null))
            }
            ApiError::FetchFailed(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    envelope("Failed to fetch influencers", json!([])),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("API error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    envelope("Internal server error", Value::Null),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn envelope(message: &str, data: Value) -> Value {
    json!({
        "status": "error",
        "message": message,
        "data": data,
    })
}
