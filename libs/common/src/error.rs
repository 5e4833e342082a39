//! Shared error vocabulary for the gateway
//!
//! Every failure produced by the session decoder or the artwork adapter is one
//! of the variants below. Callers are expected to match on them exhaustively
//! and decide on logging and transport status themselves.

use thiserror::Error;

use crate::validation::Violations;

/// Errors produced while resolving the legacy session of a request
#[derive(Error, Debug)]
pub enum SessionError {
    /// No session cookie was sent with the request
    #[error("User is not logged in")]
    NotAuthenticated,

    /// The cache holds no data for the session cookie
    #[error("Session data not found in cache")]
    DataMissing,

    /// The cached blob could not be decoded into a session record
    #[error("Failed to unserialize session data: {reason}")]
    Unreadable {
        /// The offending blob, kept for diagnostics
        raw: String,
        /// What went wrong while decoding or validating it
        reason: String,
    },
}

impl SessionError {
    /// Whether this is ordinary "nothing there" traffic rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NotAuthenticated | SessionError::DataMissing)
    }
}

/// Errors produced while fetching and validating an artwork
#[derive(Error, Debug)]
pub enum ArtworkError {
    /// The upstream answered 404 for this artwork
    #[error("Artwork {artwork_id} not found")]
    NotFound { artwork_id: String },

    /// The id cannot name an artwork (empty, `.` or `..`); no request was sent
    #[error("Invalid artwork id {artwork_id:?}")]
    InvalidId { artwork_id: String },

    /// The upstream answered with a status other than 200 or 404
    #[error("Upstream returned status {status}")]
    Upstream { status: u16, body: String },

    /// The upstream answered 200 but the body is not the expected JSON document
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The request never produced a response
    #[error("Upstream transport error: {0}")]
    Transport(String),

    /// The payload is JSON but does not satisfy the artwork schema
    #[error("Artwork schema violation: {0}")]
    SchemaViolation(Violations),
}

impl ArtworkError {
    /// Whether this is ordinary "does not exist" traffic rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ArtworkError::NotFound { .. } | ArtworkError::InvalidId { .. }
        )
    }
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Type alias for Result with ArtworkError
pub type ArtworkResult<T> = Result<T, ArtworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(SessionError::NotAuthenticated.is_not_found());
        assert!(SessionError::DataMissing.is_not_found());
        assert!(
            !SessionError::Unreadable {
                raw: "garbage".to_string(),
                reason: "truncated".to_string(),
            }
            .is_not_found()
        );

        assert!(
            ArtworkError::NotFound {
                artwork_id: "1".to_string()
            }
            .is_not_found()
        );
        assert!(
            ArtworkError::InvalidId {
                artwork_id: "..".to_string()
            }
            .is_not_found()
        );
        assert!(
            !ArtworkError::Upstream {
                status: 404,
                body: String::new()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ArtworkError::NotFound {
            artwork_id: "999999".to_string(),
        };
        assert_eq!(err.to_string(), "Artwork 999999 not found");

        let err = ArtworkError::Upstream {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned status 503");
    }
}
