//! Error types for the boundary API.
//!
//! [`ObserverError`] converts into an Axum response with a JSON body of
//! the form `{"error": "...", "status": 404}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use citysim_core::RequestError;

/// Errors that can occur in the boundary API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// No bot, moment or location by that name.
    #[error("unknown {0}")]
    NotFound(String),

    /// A response body could not be encoded.
    #[error("could not encode response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Saving or another server-side step failed.
    #[error("{0}")]
    Internal(String),
}

impl From<RequestError> for ObserverError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::UnknownBot(id) => Self::NotFound(format!("bot {id}")),
            RequestError::UnknownMoment(index) => Self::NotFound(format!("moment {index}")),
            RequestError::Persistence(e) => Self::Internal(e.to_string()),
        }
    }
}

impl ObserverError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}
