//! The resource payload bound to authorization codes and access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attribute::{AttributeMap, AttributeValue};

/// Resource payload minted at the authorization endpoint.
///
/// The payload travels through the flow: bound to the authorization code at
/// Authorize, recovered and re-bound to the access token at Token, and
/// finally consumed at Credential where it becomes the credential subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePayload {
    /// OAuth client the payload was issued for.
    pub client_id: String,

    /// Credential subject identifier.
    #[serde(default = "generated_subject")]
    pub subject: String,

    /// Caller-supplied subject attributes.
    #[serde(default)]
    pub attributes: AttributeMap,

    /// Evidence items to include in the issued credential.
    #[serde(default)]
    pub evidence: Vec<AttributeValue>,
}

impl ResourcePayload {
    /// Creates a payload with a generated subject and no attributes.
    ///
    /// Used when an authorization request carries no explicit payload.
    #[must_use]
    pub fn empty(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            subject: generated_subject(),
            attributes: AttributeMap::new(),
            evidence: Vec::new(),
        }
    }
}

/// Generates a unique subject identifier.
fn generated_subject() -> String {
    format!("urn:uuid:{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_gets_unique_subject() {
        let a = ResourcePayload::empty("client-a");
        let b = ResourcePayload::empty("client-a");

        assert!(a.subject.starts_with("urn:uuid:"));
        assert_ne!(a.subject, b.subject);
        assert!(a.attributes.is_empty());
    }

    #[test]
    fn payload_deserializes_with_defaults() {
        let payload: ResourcePayload = serde_json::from_str(r#"{"client_id":"c1"}"#).unwrap();

        assert_eq!(payload.client_id, "c1");
        assert!(payload.subject.starts_with("urn:uuid:"));
        assert!(payload.evidence.is_empty());
    }

    #[test]
    fn payload_round_trips_attributes() {
        let json = r#"{"client_id":"c1","subject":"urn:fdc:test:1","attributes":{"birthDate":[{"value":"1970-01-01"}]},"evidence":[{"type":"IdentityCheck"}]}"#;
        let payload: ResourcePayload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.subject, "urn:fdc:test:1");
        assert_eq!(payload.evidence.len(), 1);
        assert!(payload.attributes.contains_key("birthDate"));
    }
}
