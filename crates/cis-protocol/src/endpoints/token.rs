//! Token endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Form;
use serde::{Deserialize, Serialize};

use cis_crypto::generate_refresh_token;
use cis_model::ResourcePayload;
use cis_store::InjectionStage;

use crate::client_auth::{ClientAuthenticator, CLIENT_ASSERTION_TYPE_JWT};
use crate::error::{IssuerError, ProtocolResult};
use crate::registration::{ClientAuthMethod, RegistrationProvider};
use crate::request::TokenRequest;

use super::{error_response, StubState};

/// Successful token endpoint body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Refresh token; issued for shape compatibility, never redeemable.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Handles `POST /token`.
pub async fn token<P: RegistrationProvider>(
    State(state): State<StubState<P>>,
    Form(request): Form<TokenRequest>,
) -> Response {
    match exchange(&state, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn exchange<P: RegistrationProvider>(
    state: &StubState<P>,
    request: TokenRequest,
) -> ProtocolResult<TokenResponse> {
    let code = request
        .code
        .as_deref()
        .ok_or_else(|| IssuerError::InvalidRequest("code is required".into()))?;

    // Planted token-stage errors fire before any store mutation, so the code
    // survives for a later organic exchange.
    if let Some(injected) = state.injections.consult(code, InjectionStage::Token) {
        return Err(IssuerError::Injected {
            code: injected.code,
            description: injected.description,
        });
    }

    match request.grant_type.as_deref() {
        Some("authorization_code") => {}
        Some(other) => return Err(IssuerError::UnsupportedGrantType(other.to_string())),
        None => return Err(IssuerError::InvalidRequest("grant_type is required".into())),
    }

    let payload = authenticate_and_consume(state, &request, code).await?;

    let access_token = state.tokens.issue(payload);
    state.injections.promote_credential_override(code, &access_token);
    tracing::info!("access token issued");

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        refresh_token: generate_refresh_token(),
        expires_in: state.tokens.ttl_seconds(),
    })
}

async fn authenticate_and_consume<P: RegistrationProvider>(
    state: &StubState<P>,
    request: &TokenRequest,
    code: &str,
) -> ProtocolResult<ResourcePayload> {
    let client_id = match request.client_assertion.as_deref() {
        Some(assertion) => {
            if request.client_assertion_type.as_deref() != Some(CLIENT_ASSERTION_TYPE_JWT) {
                return Err(IssuerError::InvalidRequest(format!(
                    "client_assertion_type must be {CLIENT_ASSERTION_TYPE_JWT}"
                )));
            }
            ClientAuthenticator::peek_subject(assertion)?
        }
        None => request
            .client_id
            .clone()
            .ok_or_else(|| {
                IssuerError::InvalidRequest("client_id or client_assertion is required".into())
            })?,
    };

    let registration = state
        .registry
        .resolve(&client_id)
        .await?
        .ok_or_else(|| IssuerError::UnknownClient(client_id.clone()))?;

    if registration.auth_method == ClientAuthMethod::PrivateKeyJwt {
        let assertion = request.client_assertion.as_deref().ok_or_else(|| {
            IssuerError::InvalidClient("client_assertion is required for this client".into())
        })?;
        state.authenticator.verify(&registration, assertion)?;
    }

    let presented = request
        .redirect_uri
        .as_deref()
        .ok_or_else(|| IssuerError::InvalidRequest("redirect_uri is required".into()))?;
    let bound = state.codes.redirect_uri_for(code).ok_or_else(|| {
        IssuerError::InvalidGrant("unknown, expired, or already used authorization code".into())
    })?;
    if bound != presented {
        // A mismatched binding burns the code; retrying with the right URI
        // must not succeed either.
        state.codes.revoke(code);
        tracing::warn!(%client_id, "redirect_uri mismatch, code revoked");
        return Err(IssuerError::InvalidRequest(
            "redirect_uri does not match the authorization request".into(),
        ));
    }

    state.codes.exchange(code).ok_or_else(|| {
        IssuerError::InvalidGrant("unknown, expired, or already used authorization code".into())
    })
}
