//! Client registrations and the TTL-cached registry that serves them.
//!
//! Registrations come from a pluggable provider (a JSON file in the server
//! binary, an in-memory map in tests). The registry snapshots the full set
//! and re-reads it once its cache TTL has elapsed, so edits to the source
//! show up without a restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ProtocolResult;

/// How a client proves its identity at the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// No authentication; any token request for this client succeeds.
    None,
    /// Signed client assertion verified against the registered public key.
    PrivateKeyJwt,
}

/// Shape of the credential endpoint response for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Bare signed credential JWT, `application/jwt`, 201.
    Jwt,
    /// JSON envelope with `sub` and a `credentialJWT` array, 201.
    UserInfoEnvelope,
    /// The raw resource payload as JSON, 200.
    Resource,
}

impl Default for ResponseShape {
    fn default() -> Self {
        Self::Jwt
    }
}

/// A single registered client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistration {
    /// Client identifier.
    pub client_id: String,
    /// Token-endpoint authentication method.
    pub auth_method: ClientAuthMethod,
    /// PEM-encoded public key for assertion verification. Required when the
    /// method is `private_key_jwt`.
    #[serde(default)]
    pub public_key_pem: Option<String>,
    /// Expected `iss` claim of client assertions. Defaults to the client id.
    #[serde(default)]
    pub expected_issuer: Option<String>,
    /// Expected `sub` claim of client assertions. Defaults to the client id.
    #[serde(default)]
    pub expected_subject: Option<String>,
    /// Shape of the credential endpoint response.
    #[serde(default)]
    pub response_shape: ResponseShape,
}

impl ClientRegistration {
    /// `iss` value assertions from this client must carry.
    #[must_use]
    pub fn expected_issuer(&self) -> &str {
        self.expected_issuer.as_deref().unwrap_or(&self.client_id)
    }

    /// `sub` value assertions from this client must carry.
    #[must_use]
    pub fn expected_subject(&self) -> &str {
        self.expected_subject.as_deref().unwrap_or(&self.client_id)
    }
}

/// Source of client registrations.
#[async_trait]
pub trait RegistrationProvider: Send + Sync {
    /// Loads the complete registration set from the backing source.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or parsed. Registry
    /// refresh treats this as fatal for the request that triggered it.
    async fn load_all(&self) -> ProtocolResult<Vec<ClientRegistration>>;
}

/// In-memory provider for tests and canned setups.
pub struct StaticRegistrationProvider {
    registrations: Vec<ClientRegistration>,
}

impl StaticRegistrationProvider {
    /// Creates a provider serving a fixed registration set.
    #[must_use]
    pub fn new(registrations: Vec<ClientRegistration>) -> Self {
        Self { registrations }
    }
}

#[async_trait]
impl RegistrationProvider for StaticRegistrationProvider {
    async fn load_all(&self) -> ProtocolResult<Vec<ClientRegistration>> {
        Ok(self.registrations.clone())
    }
}

struct Snapshot {
    refreshed_at: Option<Instant>,
    clients: HashMap<String, ClientRegistration>,
}

/// TTL-cached view over a registration provider.
pub struct ClientRegistry<P: RegistrationProvider> {
    provider: Arc<P>,
    cache_ttl: Duration,
    snapshot: RwLock<Snapshot>,
}

impl<P: RegistrationProvider> ClientRegistry<P> {
    /// Creates a registry over the given provider. The first lookup always
    /// hits the provider.
    pub fn new(provider: Arc<P>, cache_ttl: Duration) -> Self {
        Self {
            provider,
            cache_ttl,
            snapshot: RwLock::new(Snapshot {
                refreshed_at: None,
                clients: HashMap::new(),
            }),
        }
    }

    /// Looks up a client registration, refreshing the snapshot from the
    /// provider once the cache TTL has elapsed.
    ///
    /// # Errors
    ///
    /// Propagates provider failures when a refresh was due; a stale-but-valid
    /// snapshot is never served past its TTL.
    pub async fn resolve(&self, client_id: &str) -> ProtocolResult<Option<ClientRegistration>> {
        {
            let snapshot = self.snapshot.read().await;
            if let Some(refreshed_at) = snapshot.refreshed_at {
                if refreshed_at.elapsed() < self.cache_ttl {
                    return Ok(snapshot.clients.get(client_id).cloned());
                }
            }
        }

        // Concurrent expiry races may refresh more than once; the provider
        // read is idempotent so the last snapshot simply wins.
        let registrations = self.provider.load_all().await?;
        let mut snapshot = self.snapshot.write().await;
        snapshot.clients = registrations
            .into_iter()
            .map(|registration| (registration.client_id.clone(), registration))
            .collect();
        snapshot.refreshed_at = Some(Instant::now());
        tracing::debug!(clients = snapshot.clients.len(), "client registry refreshed");
        Ok(snapshot.clients.get(client_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::IssuerError;

    fn registration(client_id: &str) -> ClientRegistration {
        ClientRegistration {
            client_id: client_id.to_string(),
            auth_method: ClientAuthMethod::None,
            public_key_pem: None,
            expected_issuer: None,
            expected_subject: None,
            response_shape: ResponseShape::default(),
        }
    }

    struct CountingProvider {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl RegistrationProvider for CountingProvider {
        async fn load_all(&self) -> ProtocolResult<Vec<ClientRegistration>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![registration("client-a")])
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl RegistrationProvider for FailingProvider {
        async fn load_all(&self) -> ProtocolResult<Vec<ClientRegistration>> {
            Err(IssuerError::Registry("source unreadable".into()))
        }
    }

    #[tokio::test]
    async fn lookups_within_ttl_reuse_the_snapshot() {
        let provider = Arc::new(CountingProvider {
            loads: AtomicUsize::new(0),
        });
        let registry = ClientRegistry::new(Arc::clone(&provider), Duration::from_secs(300));

        assert!(registry.resolve("client-a").await.unwrap().is_some());
        assert!(registry.resolve("client-a").await.unwrap().is_some());
        assert!(registry.resolve("missing").await.unwrap().is_none());
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_ttl_refreshes_on_every_lookup() {
        let provider = Arc::new(CountingProvider {
            loads: AtomicUsize::new(0),
        });
        let registry = ClientRegistry::new(Arc::clone(&provider), Duration::ZERO);

        registry.resolve("client-a").await.unwrap();
        registry.resolve("client-a").await.unwrap();
        assert_eq!(provider.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_failure_propagates() {
        let registry = ClientRegistry::new(Arc::new(FailingProvider), Duration::from_secs(300));
        let err = registry.resolve("client-a").await.unwrap_err();
        assert!(matches!(err, IssuerError::Registry(_)));
    }

    #[test]
    fn registration_json_uses_snake_case_discriminants() {
        let json = serde_json::json!({
            "client_id": "client-a",
            "auth_method": "private_key_jwt",
            "public_key_pem": "-----BEGIN PUBLIC KEY-----",
            "response_shape": "user_info_envelope"
        });
        let parsed: ClientRegistration = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.auth_method, ClientAuthMethod::PrivateKeyJwt);
        assert_eq!(parsed.response_shape, ResponseShape::UserInfoEnvelope);
    }

    #[test]
    fn response_shape_defaults_to_jwt() {
        let json = serde_json::json!({
            "client_id": "client-a",
            "auth_method": "none"
        });
        let parsed: ClientRegistration = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.response_shape, ResponseShape::Jwt);
    }
}
