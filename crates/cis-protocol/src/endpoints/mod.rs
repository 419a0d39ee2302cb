//! Axum handlers and the router for the three protocol endpoints.

mod authorization;
mod credential;
mod router;
mod state;
mod token;

pub use authorization::authorize;
pub use credential::{credential, UserInfoCredentialResponse};
pub use router::stub_router;
pub use state::StubState;
pub use token::{token, TokenResponse};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::error::IssuerError;

/// Renders an error as the standard JSON body on the direct-response
/// channel used by the token and credential endpoints.
fn error_response(err: &IssuerError) -> Response {
    let status = err.http_status();
    tracing::debug!(error = %err, status = status.as_u16(), "request failed");
    if status == StatusCode::UNAUTHORIZED {
        return (
            status,
            [(
                axum::http::header::WWW_AUTHENTICATE,
                format!(
                    "Bearer error=\"{}\", error_description=\"{}\"",
                    err.error_code(),
                    err
                ),
            )],
            Json(err.to_error_response()),
        )
            .into_response();
    }
    (status, Json(err.to_error_response())).into_response()
}
