//! Error responses of the gateway

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::{ArtworkError, SessionError};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to fetch artwork {artwork_id}: {source}")]
    Artwork {
        artwork_id: String,
        #[source]
        source: ArtworkError,
    },
}

impl GatewayError {
    pub fn artwork(artwork_id: &str, source: ArtworkError) -> Self {
        GatewayError::Artwork {
            artwork_id: artwork_id.to_string(),
            source,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Session(err) => session_response(err),
            GatewayError::Artwork { artwork_id, source } => artwork_response(&artwork_id, source),
        }
    }
}

fn session_response(err: SessionError) -> Response {
    let (status, message) = match &err {
        SessionError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "User not logged in"),
        SessionError::DataMissing => (StatusCode::NOT_FOUND, "User data not found"),
        SessionError::Unreadable { raw, reason } => {
            error!("Failed to deserialize user session data: {}", reason);
            debug!("Unreadable session blob: {:?}", raw);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to deserialize user session data",
            )
        }
    };

    (status, Json(json!({ "error": message }))).into_response()
}

fn artwork_response(artwork_id: &str, err: ArtworkError) -> Response {
    let (status, body) = match err {
        ArtworkError::NotFound { .. } | ArtworkError::InvalidId { .. } => (
            StatusCode::NOT_FOUND,
            json!({ "status": format!("Artwork {} not found", artwork_id) }),
        ),
        ArtworkError::Upstream { status, body } => {
            error!(
                "Upstream returned {} for artwork {}: {}",
                status, artwork_id, body
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "status": format!("Error {} fetching artwork {}", status, artwork_id) }),
            )
        }
        ArtworkError::SchemaViolation(violations) => {
            error!("Artwork {} failed validation: {}", artwork_id, violations);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": violations }),
            )
        }
        ArtworkError::MalformedResponse(reason) | ArtworkError::Transport(reason) => {
            error!("Error fetching artwork {}: {}", artwork_id, reason);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "status": format!("Error fetching artwork {}", artwork_id) }),
            )
        }
    };

    (status, Json(body)).into_response()
}

/// Type alias for gateway handler results
pub type GatewayResult<T> = Result<T, GatewayError>;
