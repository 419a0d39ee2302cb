//! JWT claim structures for client assertions and issued credentials.

use cis_model::{AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};

/// The `aud` claim may be a single string or an array of strings; both are
/// valid JWT encodings and clients in the wild produce either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience value.
    Single(String),
    /// Multiple audience values.
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether the audience claim names the given value.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(aud) => aud == value,
            Self::Multiple(auds) => auds.iter().any(|aud| aud == value),
        }
    }

    /// Renders the audience for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Single(aud) => aud.clone(),
            Self::Multiple(auds) => auds.join(", "),
        }
    }
}

/// Claims carried by a signed client assertion (private_key_jwt).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientAssertionClaims {
    /// Issuer; must equal `sub` for self-issued assertions.
    pub iss: String,
    /// Subject; must equal the registered client identifier.
    pub sub: String,
    /// Audience; must name this issuer's token endpoint.
    pub aud: Audience,
    /// Expiry as a Unix timestamp; must lie in the future.
    pub exp: i64,
    /// Issued-at, unchecked but accepted.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Unique assertion identifier, unchecked but accepted.
    #[serde(default)]
    pub jti: Option<String>,
}

/// W3C verifiable-credential context URI stamped into every issued credential.
pub const CREDENTIAL_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Type markers stamped into every issued credential.
pub const CREDENTIAL_TYPES: [&str; 2] = ["VerifiableCredential", "IdentityCheckCredential"];

/// The `vc` envelope inside an issued credential JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialEnvelope {
    /// JSON-LD context markers.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// Credential type markers.
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Subject attributes, well-known keys first.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: AttributeMap,
    /// Evidence entries carried through from the resource payload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<AttributeValue>,
}

/// Full claim set of an issued credential JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Issuer identifier of this stub.
    pub iss: String,
    /// Credential subject identifier from the resource payload.
    pub sub: String,
    /// Not-before as a Unix timestamp.
    pub nbf: i64,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    /// Verifiable-credential envelope.
    pub vc: CredentialEnvelope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_accepts_single_and_array_forms() {
        let single: ClientAssertionClaims = serde_json::from_value(serde_json::json!({
            "iss": "c", "sub": "c", "aud": "https://issuer/token", "exp": 1
        }))
        .unwrap();
        assert!(single.aud.contains("https://issuer/token"));

        let multiple: ClientAssertionClaims = serde_json::from_value(serde_json::json!({
            "iss": "c", "sub": "c", "aud": ["https://other", "https://issuer/token"], "exp": 1
        }))
        .unwrap();
        assert!(multiple.aud.contains("https://issuer/token"));
        assert!(!multiple.aud.contains("https://elsewhere"));
    }

    #[test]
    fn envelope_serializes_jsonld_field_names() {
        let envelope = CredentialEnvelope {
            context: vec![CREDENTIAL_CONTEXT.to_string()],
            types: CREDENTIAL_TYPES.iter().map(|t| t.to_string()).collect(),
            credential_subject: AttributeMap::new(),
            evidence: Vec::new(),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("@context").is_some());
        assert!(value.get("type").is_some());
        assert!(value.get("credentialSubject").is_some());
        assert!(value.get("evidence").is_none(), "empty evidence is omitted");
    }
}
