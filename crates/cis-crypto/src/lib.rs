//! # cis-crypto
//!
//! Cryptographic support for the credential issuer stub:
//!
//! - [`random`] - secure random authorization codes and bearer tokens
//! - [`ecdsa`] - ECDSA signature encoding transcoding (DER <-> concatenated)
//! - [`signing`] - the issuer's ES256 compact-JWT signing key

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod ecdsa;
pub mod random;
pub mod signing;

pub use ecdsa::{concat_to_der, der_to_concat, normalize_signature, EcdsaError};
pub use random::{generate_access_token, generate_auth_code, generate_refresh_token};
pub use signing::{IssuerSigningKey, SigningError};
