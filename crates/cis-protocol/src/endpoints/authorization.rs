//! Authorization endpoint.
//!
//! The one hard rule here: once a usable `redirect_uri` is in hand, every
//! failure travels back as an error redirect, never as a direct error body.
//! Only a missing or relative `redirect_uri` falls back to an HTML error
//! page, since there is nowhere to send the browser.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use cis_model::ResourcePayload;
use cis_store::{InjectionStage, NONE_SENTINEL};

use crate::registration::RegistrationProvider;
use crate::request::AuthorizeRequest;

use super::StubState;

/// Handles `GET /authorize`.
pub async fn authorize<P: RegistrationProvider>(
    State(state): State<StubState<P>>,
    Query(request): Query<AuthorizeRequest>,
) -> Response {
    let Some(redirect_uri) = usable_redirect_uri(request.redirect_uri.as_deref()) else {
        tracing::warn!("authorization request without a usable redirect_uri");
        return error_page("missing or relative redirect_uri");
    };
    let redirect_state = request.state.as_deref();

    if request.response_type.as_deref() != Some("code") {
        return error_redirect(
            redirect_uri,
            "unsupported_response_type",
            "only response_type=code is supported",
            redirect_state,
        );
    }

    let Some(client_id) = request.client_id.as_deref() else {
        return error_redirect(
            redirect_uri,
            "invalid_request",
            "client_id is required",
            redirect_state,
        );
    };
    match state.registry.resolve(client_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error_redirect(
                redirect_uri,
                "unauthorized_client",
                "client is not registered",
                redirect_state,
            );
        }
        Err(err) => {
            tracing::error!(error = %err, "client registry lookup failed");
            return error_redirect(
                redirect_uri,
                "server_error",
                "client registry unavailable",
                redirect_state,
            );
        }
    }

    // Test-only error-injection directives ride in on the query string.
    let directive = match parse_directive(&request) {
        Ok(directive) => directive,
        Err(reason) => {
            return error_redirect(redirect_uri, "invalid_request", &reason, redirect_state);
        }
    };
    if let Some((InjectionStage::Authorize, code, description)) = &directive {
        return error_redirect(redirect_uri, code, description, redirect_state);
    }

    let payload = match parse_payload(&request, client_id) {
        Ok(payload) => payload,
        Err(reason) => {
            return error_redirect(redirect_uri, "invalid_request", &reason, redirect_state);
        }
    };

    let code = state.codes.issue(payload, redirect_uri);
    if let Some((stage @ (InjectionStage::Token | InjectionStage::Credential), error, description)) =
        directive
    {
        state.injections.register(&code, stage, error, description);
    }

    tracing::info!(client_id, "authorization code issued");
    success_redirect(redirect_uri, &code, redirect_state)
}

/// A redirect target must be an absolute http(s) URI.
fn usable_redirect_uri(redirect_uri: Option<&str>) -> Option<&str> {
    redirect_uri
        .filter(|uri| uri.starts_with("http://") || uri.starts_with("https://"))
}

type Directive = (InjectionStage, String, String);

fn parse_directive(request: &AuthorizeRequest) -> Result<Option<Directive>, String> {
    let Some(stage) = request.error_stage.as_deref() else {
        return Ok(None);
    };
    let stage: InjectionStage = stage.parse()?;
    let Some(code) = request.error_code.as_deref() else {
        return Err("error_stage requires an error_code".into());
    };
    if code == NONE_SENTINEL {
        return Ok(None);
    }
    let description = request
        .error_description
        .clone()
        .unwrap_or_else(|| "injected error".to_string());
    Ok(Some((stage, code.to_string(), description)))
}

fn parse_payload(request: &AuthorizeRequest, client_id: &str) -> Result<ResourcePayload, String> {
    let mut payload = match request.payload.as_deref() {
        Some(json) => serde_json::from_str::<ResourcePayload>(json)
            .map_err(|err| format!("payload is not a valid resource payload: {err}"))?,
        None => ResourcePayload::empty(client_id),
    };
    // The code is bound to the authenticated request, not whatever client id
    // the payload happened to carry.
    payload.client_id = client_id.to_string();
    Ok(payload)
}

fn success_redirect(redirect_uri: &str, code: &str, state: Option<&str>) -> Response {
    let mut location = format!("{redirect_uri}?code={}", urlencoding::encode(code));
    if let Some(state) = state {
        location.push_str(&format!("&state={}", urlencoding::encode(state)));
    }
    redirect(location)
}

fn error_redirect(redirect_uri: &str, error: &str, description: &str, state: Option<&str>) -> Response {
    let mut location = format!(
        "{redirect_uri}?error={}&error_description={}",
        urlencoding::encode(error),
        urlencoding::encode(description)
    );
    if let Some(state) = state {
        location.push_str(&format!("&state={}", urlencoding::encode(state)));
    }
    redirect(location)
}

fn redirect(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn error_page(reason: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html><html><head><title>Authorization error</title></head>\
         <body><h1>Authorization error</h1><p>{reason}</p></body></html>"
    );
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_redirect_uris_are_unusable() {
        assert!(usable_redirect_uri(Some("/callback")).is_none());
        assert!(usable_redirect_uri(None).is_none());
        assert_eq!(
            usable_redirect_uri(Some("https://client.example/cb")),
            Some("https://client.example/cb")
        );
    }

    #[test]
    fn directive_with_none_sentinel_reads_as_absent() {
        let request = AuthorizeRequest {
            error_stage: Some("token".into()),
            error_code: Some(NONE_SENTINEL.into()),
            ..AuthorizeRequest::default()
        };
        assert!(parse_directive(&request).unwrap().is_none());
    }

    #[test]
    fn directive_with_unknown_stage_is_rejected() {
        let request = AuthorizeRequest {
            error_stage: Some("userinfo".into()),
            error_code: Some("server_error".into()),
            ..AuthorizeRequest::default()
        };
        assert!(parse_directive(&request).is_err());
    }

    #[test]
    fn payload_client_id_is_pinned_to_the_request() {
        let request = AuthorizeRequest {
            payload: Some(r#"{"client_id":"spoofed","attributes":{"name":"Ada"}}"#.into()),
            ..AuthorizeRequest::default()
        };
        let payload = parse_payload(&request, "client-a").unwrap();
        assert_eq!(payload.client_id, "client-a");
        assert!(payload.attributes.contains_key("name"));
    }

    #[test]
    fn redirect_parameters_are_percent_encoded() {
        let response = error_redirect(
            "https://client.example/cb",
            "invalid_request",
            "a description with spaces",
            Some("st&ate"),
        );
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(location.contains("error_description=a%20description%20with%20spaces"));
        assert!(location.contains("state=st%26ate"));
    }
}
