//! Protocol error taxonomy.
//!
//! Every failure that can surface on the wire is represented here so that
//! handlers can translate an error into an RFC 6749 error body with a single
//! call. Variants carry enough context for the log line to say what actually
//! went wrong, while the wire body stays within the standard vocabulary.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the protocol layer.
pub type ProtocolResult<T> = Result<T, IssuerError>;

/// Errors raised while serving the authorization, token, and credential
/// endpoints.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// A required parameter is missing or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The client asked for a response type other than `code`.
    #[error("unsupported response type: {0}")]
    UnsupportedResponseType(String),

    /// The client asked for a grant type other than `authorization_code`.
    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// No registration exists for the presented client identifier.
    #[error("unknown client: {0}")]
    UnknownClient(String),

    /// The client assertion is structurally unusable.
    #[error("invalid client: {0}")]
    InvalidClient(String),

    /// The client assertion signature did not verify against the registered
    /// public key.
    #[error("client assertion signature verification failed")]
    SignatureInvalid,

    /// A client assertion claim did not carry the expected value.
    #[error("client assertion claim '{claim}' mismatch: expected '{expected}', received '{received}'")]
    ClaimMismatch {
        /// Name of the offending claim.
        claim: &'static str,
        /// Value the issuer expected.
        expected: String,
        /// Value the assertion actually carried.
        received: String,
    },

    /// The client assertion expiry lies in the past.
    #[error("client assertion expired at {expired_at}")]
    AssertionExpired {
        /// Unix timestamp the assertion expired at.
        expired_at: i64,
    },

    /// The authorization code is unknown, already used, or bound to a
    /// different request.
    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    /// The bearer token is missing, unknown, or already used.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// An error planted through the injection registry fired.
    #[error("injected error '{code}': {description}")]
    Injected {
        /// RFC 6749 error code to put on the wire.
        code: String,
        /// Human-readable description registered alongside the code.
        description: String,
    },

    /// Signing the credential failed.
    #[error("credential signing failed: {0}")]
    Signing(String),

    /// The client registration source could not be read.
    #[error("client registry unavailable: {0}")]
    Registry(String),
}

impl IssuerError {
    /// RFC 6749 error code for the wire.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::UnknownClient(_)
            | Self::InvalidClient(_)
            | Self::SignatureInvalid
            | Self::ClaimMismatch { .. }
            | Self::AssertionExpired { .. } => "invalid_client",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::InvalidToken(_) => "invalid_token",
            Self::Injected { code, .. } => code,
            Self::Signing(_) | Self::Registry(_) => "server_error",
        }
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Injected { code, .. } => status_for_code(code),
            _ => status_for_code(self.error_code()),
        }
    }

    /// Wire body for the error channel of the token and credential endpoints.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
        }
    }
}

/// Maps an RFC 6749 error code to its conventional HTTP status. Injected
/// errors route through here as well, so a planted `invalid_token` answers
/// 401 just like the organic one would.
fn status_for_code(code: &str) -> StatusCode {
    match code {
        "invalid_client" | "invalid_token" => StatusCode::UNAUTHORIZED,
        "access_denied" | "unauthorized_client" | "insufficient_scope" => StatusCode::FORBIDDEN,
        "server_error" => StatusCode::INTERNAL_SERVER_ERROR,
        "temporarily_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// JSON error body per RFC 6749 §5.2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// RFC 6749 error code.
    pub error: String,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_auth_failures_collapse_to_invalid_client() {
        let errors = [
            IssuerError::UnknownClient("c".into()),
            IssuerError::SignatureInvalid,
            IssuerError::ClaimMismatch {
                claim: "iss",
                expected: "a".into(),
                received: "b".into(),
            },
            IssuerError::AssertionExpired { expired_at: 0 },
        ];
        for err in &errors {
            assert_eq!(err.error_code(), "invalid_client");
            assert_eq!(err.http_status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn injected_code_drives_both_code_and_status() {
        let err = IssuerError::Injected {
            code: "temporarily_unavailable".into(),
            description: "maintenance window".into(),
        };
        assert_eq!(err.error_code(), "temporarily_unavailable");
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn claim_mismatch_description_names_both_values() {
        let err = IssuerError::ClaimMismatch {
            claim: "aud",
            expected: "https://issuer/token".into(),
            received: "https://other/token".into(),
        };
        let body = err.to_error_response();
        let description = body.error_description.unwrap();
        assert!(description.contains("https://issuer/token"));
        assert!(description.contains("https://other/token"));
    }

    #[test]
    fn unknown_code_defaults_to_bad_request() {
        let err = IssuerError::Injected {
            code: "made_up_code".into(),
            description: "test".into(),
        };
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }
}
