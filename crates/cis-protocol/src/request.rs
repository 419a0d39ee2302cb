//! Request parameter structs for the three endpoints.
//!
//! Every field is optional at the deserialization boundary. The authorization
//! endpoint in particular must never reject a request with a body of its own
//! while a usable `redirect_uri` is present, so presence validation happens
//! in the handlers where the failure can be shaped into the right channel.

use serde::Deserialize;

/// Query parameters accepted by the authorization endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeRequest {
    /// Requesting client identifier.
    pub client_id: Option<String>,
    /// Absolute URI the outcome is redirected to.
    pub redirect_uri: Option<String>,
    /// Must be `code`; anything else is rejected via redirect.
    pub response_type: Option<String>,
    /// Opaque state echoed back on the redirect.
    pub state: Option<String>,
    /// JSON-encoded resource payload to associate with the issued code.
    pub payload: Option<String>,
    /// Stage a planted error should fire at (`authorize`, `token`,
    /// `credential`).
    pub error_stage: Option<String>,
    /// Error code to plant; the literal `none` disables the directive.
    pub error_code: Option<String>,
    /// Optional description to plant alongside the error code.
    pub error_description: Option<String>,
}

/// Form parameters accepted by the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// Must be `authorization_code`.
    pub grant_type: Option<String>,
    /// Authorization code being exchanged.
    pub code: Option<String>,
    /// Redirect URI presented for binding verification.
    pub redirect_uri: Option<String>,
    /// Client identifier, for clients registered without an assertion.
    pub client_id: Option<String>,
    /// Signed client assertion JWT.
    pub client_assertion: Option<String>,
    /// Assertion type; must be the JWT bearer URN when an assertion is sent.
    pub client_assertion_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_request_tolerates_missing_parameters() {
        let request: AuthorizeRequest = serde_urlencoded::from_str("client_id=abc").unwrap();
        assert_eq!(request.client_id.as_deref(), Some("abc"));
        assert!(request.redirect_uri.is_none());
        assert!(request.error_stage.is_none());
    }

    #[test]
    fn token_request_decodes_assertion_fields() {
        let body = "grant_type=authorization_code&code=xyz\
                    &client_assertion_type=urn%3Aietf%3Aparams%3Aoauth%3Aclient-assertion-type%3Ajwt-bearer\
                    &client_assertion=a.b.c";
        let request: TokenRequest = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(request.grant_type.as_deref(), Some("authorization_code"));
        assert_eq!(request.client_assertion.as_deref(), Some("a.b.c"));
        assert_eq!(
            request.client_assertion_type.as_deref(),
            Some("urn:ietf:params:oauth:client-assertion-type:jwt-bearer")
        );
    }
}
