//! Shared handler state.

use std::sync::Arc;

use cis_store::{AccessTokenStore, AuthorizationCodeStore, ErrorInjectionRegistry};

use crate::client_auth::ClientAuthenticator;
use crate::credential::CredentialAssembler;
use crate::registration::{ClientRegistry, RegistrationProvider};

/// Everything the three endpoint handlers need, behind `Arc`s so the state
/// clones cheaply per request.
pub struct StubState<P: RegistrationProvider> {
    /// Authorization code store.
    pub codes: Arc<AuthorizationCodeStore>,
    /// Access token store.
    pub tokens: Arc<AccessTokenStore>,
    /// Planted error overrides.
    pub injections: Arc<ErrorInjectionRegistry>,
    /// TTL-cached client registrations.
    pub registry: Arc<ClientRegistry<P>>,
    /// Client-assertion verifier.
    pub authenticator: Arc<ClientAuthenticator>,
    /// Credential builder and signer.
    pub assembler: Arc<CredentialAssembler>,
}

// Manual impl: deriving Clone would demand P: Clone even though only Arcs
// are cloned.
impl<P: RegistrationProvider> Clone for StubState<P> {
    fn clone(&self) -> Self {
        Self {
            codes: Arc::clone(&self.codes),
            tokens: Arc::clone(&self.tokens),
            injections: Arc::clone(&self.injections),
            registry: Arc::clone(&self.registry),
            authenticator: Arc::clone(&self.authenticator),
            assembler: Arc::clone(&self.assembler),
        }
    }
}
