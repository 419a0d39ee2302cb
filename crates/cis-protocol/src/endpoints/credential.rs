//! Credential endpoint.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use cis_store::InjectionStage;

use crate::error::{IssuerError, ProtocolResult};
use crate::registration::{RegistrationProvider, ResponseShape};

use super::{error_response, StubState};

/// JSON body for the `UserInfoEnvelope` response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoCredentialResponse {
    /// Credential subject identifier.
    pub sub: String,
    /// Issued credentials, as compact JWTs.
    #[serde(rename = "credentialJWT")]
    pub credential_jwt: Vec<String>,
}

/// Handles `GET /credential`.
pub async fn credential<P: RegistrationProvider>(
    State(state): State<StubState<P>>,
    headers: HeaderMap,
) -> Response {
    match issue(&state, &headers).await {
        Ok(response) => response,
        Err(err) => error_response(&err),
    }
}

async fn issue<P: RegistrationProvider>(
    state: &StubState<P>,
    headers: &HeaderMap,
) -> ProtocolResult<Response> {
    let token = extract_bearer_token(headers)?;

    if let Some(injected) = state.injections.consult(token, InjectionStage::Credential) {
        return Err(IssuerError::Injected {
            code: injected.code,
            description: injected.description,
        });
    }

    // Single-use: the redeem removes the token whatever happens afterwards.
    let payload = state
        .tokens
        .redeem(token)
        .ok_or_else(|| IssuerError::InvalidToken("unknown, expired, or already used token".into()))?;

    let registration = state
        .registry
        .resolve(&payload.client_id)
        .await?
        .ok_or_else(|| IssuerError::UnknownClient(payload.client_id.clone()))?;

    match registration.response_shape {
        ResponseShape::Resource => Ok((StatusCode::OK, Json(payload)).into_response()),
        ResponseShape::Jwt => {
            let jwt = state.assembler.assemble(&payload)?;
            tracing::info!(client_id = %payload.client_id, "credential issued");
            Ok((
                StatusCode::CREATED,
                [(header::CONTENT_TYPE, "application/jwt")],
                jwt,
            )
                .into_response())
        }
        ResponseShape::UserInfoEnvelope => {
            let jwt = state.assembler.assemble(&payload)?;
            tracing::info!(client_id = %payload.client_id, "credential issued");
            let body = UserInfoCredentialResponse {
                sub: payload.subject,
                credential_jwt: vec![jwt],
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> ProtocolResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| IssuerError::InvalidToken("missing Authorization header".into()))?
        .to_str()
        .map_err(|_| IssuerError::InvalidToken("Authorization header is not valid UTF-8".into()))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| IssuerError::InvalidToken("Authorization header is not a Bearer token".into()))?
        .trim();
    if token.is_empty() {
        return Err(IssuerError::InvalidToken("empty bearer token".into()));
    }
    Ok(token)
}
