//! # cis-protocol
//!
//! OAuth2/OIDC-style protocol layer of the credential issuer stub:
//!
//! - [`error`] - the wire-facing error taxonomy
//! - [`request`] - endpoint parameter structs
//! - [`claims`] - client-assertion and credential JWT claims
//! - [`registration`] - client registrations and the TTL-cached registry
//! - [`client_auth`] - signed client-assertion verification
//! - [`credential`] - credential assembly and signing
//! - [`endpoints`] - axum handlers and the router

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claims;
pub mod client_auth;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod registration;
pub mod request;

pub use client_auth::{ClientAuthenticator, CLIENT_ASSERTION_TYPE_JWT};
pub use credential::CredentialAssembler;
pub use endpoints::{stub_router, StubState, TokenResponse, UserInfoCredentialResponse};
pub use error::{ErrorResponse, IssuerError, ProtocolResult};
pub use registration::{
    ClientAuthMethod, ClientRegistration, ClientRegistry, RegistrationProvider, ResponseShape,
    StaticRegistrationProvider,
};
