//! Cryptographically secure random generation.
//!
//! Generators for the opaque strings the stub hands out:
//! - Authorization codes (OAuth 2.0 authorization code flow)
//! - Bearer access tokens
//! - Refresh tokens (issued for shape, never redeemable)
//!
//! All functions use the thread-local random number generator, which is
//! cryptographically secure by default.

use rand::distr::{Alphanumeric, SampleString};

/// Generates a cryptographically secure random alphanumeric string.
///
/// The string contains characters a-z, A-Z, 0-9 and is suitable for
/// authorization codes and other opaque tokens.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a random authorization code.
///
/// A 32-character alphanumeric code has roughly 190 bits of entropy
/// (log2(62^32)), well above the 128-bit minimum of RFC 6749.
#[must_use]
pub fn generate_auth_code() -> String {
    random_alphanumeric(32)
}

/// Generates a random bearer access token.
#[must_use]
pub fn generate_access_token() -> String {
    random_alphanumeric(30)
}

/// Generates a random refresh token.
#[must_use]
pub fn generate_refresh_token() -> String {
    random_alphanumeric(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_expected_length_and_charset() {
        let code = generate_auth_code();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        let token = generate_access_token();
        assert_eq!(token.len(), 30);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn codes_are_unique() {
        let a = generate_auth_code();
        let b = generate_auth_code();
        assert_ne!(a, b);
    }
}
