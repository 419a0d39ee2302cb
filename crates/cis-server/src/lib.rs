//! # cis-server
//!
//! Wires the protocol layer into a runnable credential issuer stub:
//! configuration, the file-backed client registration source, and router
//! assembly.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod providers;

use std::sync::Arc;

use axum::Router;

use cis_crypto::IssuerSigningKey;
use cis_protocol::{
    stub_router, ClientAuthenticator, ClientRegistry, CredentialAssembler, StubState,
};
use cis_store::{AccessTokenStore, AuthorizationCodeStore, ErrorInjectionRegistry};

use crate::config::StubConfig;
use crate::providers::FileRegistrationProvider;

/// Builds the shared handler state from the configuration.
///
/// # Errors
///
/// Fails when the configured signing key PEM is not a usable EC private key.
pub fn build_state(config: &StubConfig) -> anyhow::Result<StubState<FileRegistrationProvider>> {
    let signing_key =
        IssuerSigningKey::from_pem(&config.signing_key_id, config.signing_key_pem.as_bytes())?;
    let provider = Arc::new(FileRegistrationProvider::new(&config.clients_file));

    Ok(StubState {
        codes: Arc::new(AuthorizationCodeStore::new(config.auth_code_lifespan)),
        tokens: Arc::new(AccessTokenStore::new(config.access_token_lifespan)),
        injections: Arc::new(ErrorInjectionRegistry::new()),
        registry: Arc::new(ClientRegistry::new(
            provider,
            config.registry_cache_duration(),
        )),
        authenticator: Arc::new(ClientAuthenticator::new(&config.token_endpoint_url)),
        assembler: Arc::new(CredentialAssembler::new(
            &config.issuer,
            config.credential_lifespan,
            signing_key,
        )),
    })
}

/// Builds the complete application router.
///
/// # Errors
///
/// Propagates state construction failures.
pub fn app(config: &StubConfig) -> anyhow::Result<Router> {
    Ok(stub_router().with_state(build_state(config)?))
}
