//! Error taxonomy for the leave and shift engine.
//!
//! Three failure kinds cross the service boundary: a referenced entity is
//! missing, the input itself is malformed, or a business rule rejected the
//! operation. Storage failures from the collaborator layer are carried
//! separately so handlers can map them to 500s.

use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Result alias used across the service layer.
pub type HrmResult<T> = Result<T, HrmError>;

#[derive(Debug, Error)]
pub enum HrmError {
    /// Referenced employee/shift/leave type/company does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Malformed input: reversed dates, mismatched break duration, interval
    /// outside shift bounds.
    #[error("{0}")]
    InvalidArgument(String),

    /// Business-rule violation: overlapping range, insufficient balance,
    /// double booking, terminal-state re-entry.
    #[error("{0}")]
    Conflict(String),

    /// Collaborator (persistence) failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl HrmError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl actix_web::ResponseError for HrmError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrmError::NotFound(_) => StatusCode::NOT_FOUND,
            HrmError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            HrmError::Conflict(_) => StatusCode::CONFLICT,
            HrmError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let HrmError::Store(e) = self {
            tracing::error!(error = %e, "Storage failure");
            // Never leak driver details to the client
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
