//! Error types for Agora
//!
//! Every concept action raises a typed [`AgoraError`]; the route dispatcher
//! is the sole recovery point and converts the variant into an HTTP status
//! code plus a JSON body. `NotFound` and `NotAllowed` carry the offending
//! filter and, when one is implicated, a subject user id so the response
//! formatter can substitute a display name before rendering.

use bson::Document;
use hyper::StatusCode;

/// Main error type for Agora operations
#[derive(Debug, thiserror::Error)]
pub enum AgoraError {
    #[error("bad values: {0}")]
    BadValues(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("{entity} not allowed: {detail}")]
    NotAllowed {
        entity: &'static str,
        detail: String,
        subject: Option<String>,
    },

    #[error("{entity} not found: {detail}")]
    NotFound {
        entity: &'static str,
        detail: String,
        subject: Option<String>,
    },

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("database error: {0}")]
    Database(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AgoraError {
    /// `NotFound` for an entity missing under the given filter
    pub fn not_found(entity: &'static str, filter: &Document) -> Self {
        Self::NotFound {
            entity,
            detail: filter.to_string(),
            subject: None,
        }
    }

    /// `NotAllowed` for an entity that already exists under the given filter
    pub fn already_exists(entity: &'static str, filter: &Document) -> Self {
        Self::NotAllowed {
            entity,
            detail: format!("already exists: {}", filter),
            subject: None,
        }
    }

    /// `NotAllowed` with a free-form precondition/ownership message
    pub fn not_allowed(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::NotAllowed {
            entity,
            detail: detail.into(),
            subject: None,
        }
    }

    /// Attach the user id implicated in a `NotFound`/`NotAllowed`, for later
    /// display-name enrichment. No-op on other variants.
    pub fn with_subject(mut self, id: impl Into<String>) -> Self {
        match &mut self {
            Self::NotAllowed { subject, .. } | Self::NotFound { subject, .. } => {
                *subject = Some(id.into());
            }
            _ => {}
        }
        self
    }

    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadValues(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NotAllowed { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Symbolic code included in the JSON error body
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadValues(_) => "BAD_VALUES",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::NotAllowed { .. } => "NOT_ALLOWED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Database(_) => "DB_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for AgoraError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AgoraError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadValues(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for AgoraError {
    fn from(err: hyper::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<mongodb::error::Error> for AgoraError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AgoraError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Unauthenticated(format!("JWT error: {}", err))
    }
}

/// Result type alias for Agora operations
pub type Result<T> = std::result::Result<T, AgoraError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AgoraError::BadValues("empty username".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AgoraError::Unauthenticated("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AgoraError::already_exists("user", &doc! { "username": "ada" }).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AgoraError::not_found("label", &doc! { "name": "work" }).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AgoraError::NotImplemented("feed ranking").status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            AgoraError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_carries_the_filter() {
        let err = AgoraError::not_found("user", &doc! { "username": "ghost" });
        assert!(err.to_string().contains("user not found"));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn with_subject_sets_enrichment_target() {
        let err = AgoraError::not_found("friendship", &doc! {}).with_subject("abc123");
        match err {
            AgoraError::NotFound { subject, .. } => assert_eq!(subject.as_deref(), Some("abc123")),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn with_subject_ignores_other_variants() {
        let err = AgoraError::BadValues("x".into()).with_subject("abc123");
        assert!(matches!(err, AgoraError::BadValues(_)));
    }
}
