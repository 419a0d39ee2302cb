//! # cis-model
//!
//! Domain models for the credential issuer stub.
//!
//! This crate defines the data carried through the authorization flow:
//! the tagged attribute values that make up a credential subject, and the
//! resource payload bound to authorization codes and access tokens.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod attribute;
pub mod payload;

pub use attribute::{AttributeMap, AttributeValue};
pub use payload::ResourcePayload;
