//! # cis-store
//!
//! In-memory state for the credential issuer stub:
//!
//! - [`code_store`] - one-time authorization codes
//! - [`token_store`] - one-time bearer access tokens
//! - [`error_injection`] - test-only error overrides per protocol stage
//!
//! All stores are plain owned objects intended to be wrapped in an `Arc`
//! and injected into the endpoint layer. Each is internally guarded by a
//! mutex around its map; consuming lookups are a single locked `remove`,
//! so concurrent consumption of the same key resolves to exactly one
//! winner with no caller-side locking.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod code_store;
pub mod error_injection;
pub mod token_store;

pub use code_store::AuthorizationCodeStore;
pub use error_injection::{ErrorInjectionRegistry, InjectedError, InjectionStage, NONE_SENTINEL};
pub use token_store::AccessTokenStore;
