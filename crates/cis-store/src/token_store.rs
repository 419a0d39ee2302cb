//! One-time bearer access token store.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use cis_model::ResourcePayload;

/// Entry bound to an issued access token.
#[derive(Debug, Clone)]
struct TokenEntry {
    payload: ResourcePayload,
    expires_at: DateTime<Utc>,
}

/// Issues and consumes one-time bearer access tokens.
///
/// Same single-use contract as the authorization code store: redemption
/// removes the binding under the lock, so exactly one concurrent
/// redemption of the same token succeeds. Expiry is advisory.
#[derive(Debug)]
pub struct AccessTokenStore {
    ttl_seconds: i64,
    entries: Mutex<HashMap<String, TokenEntry>>,
}

impl AccessTokenStore {
    /// Creates a store whose tokens carry the given nominal TTL.
    #[must_use]
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Mints a random bearer token bound to the payload.
    pub fn issue(&self, payload: ResourcePayload) -> String {
        let token = cis_crypto::random::generate_access_token();
        let entry = TokenEntry {
            payload,
            expires_at: Utc::now() + Duration::seconds(self.ttl_seconds),
        };
        self.entries.lock().insert(token.clone(), entry);
        token
    }

    /// Consumes the token, returning its payload.
    ///
    /// Returns `None` for an unknown, already-redeemed, or revoked token.
    #[must_use]
    pub fn redeem(&self, token: &str) -> Option<ResourcePayload> {
        self.entries.lock().remove(token).map(|entry| entry.payload)
    }

    /// Unconditional, idempotent delete.
    pub fn revoke(&self, token: &str) {
        self.entries.lock().remove(token);
    }

    /// Returns the nominal expiry of a live token.
    #[must_use]
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.entries.lock().get(token).map(|entry| entry.expires_at)
    }

    /// Returns the nominal token lifetime in seconds, as advertised in
    /// token responses.
    #[must_use]
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn payload() -> ResourcePayload {
        serde_json::from_str(r#"{"client_id":"c1","subject":"urn:uuid:s1"}"#).unwrap()
    }

    #[test]
    fn redeem_consumes_exactly_once() {
        let store = AccessTokenStore::new(3600);
        let token = store.issue(payload());

        assert_eq!(store.redeem(&token).unwrap().client_id, "c1");
        assert!(store.redeem(&token).is_none());
    }

    #[test]
    fn revoked_token_does_not_redeem() {
        let store = AccessTokenStore::new(3600);
        let token = store.issue(payload());

        store.revoke(&token);
        assert!(store.redeem(&token).is_none());
    }

    #[test]
    fn concurrent_redeem_has_one_winner() {
        let store = Arc::new(AccessTokenStore::new(3600));
        let token = store.issue(payload());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let token = token.clone();
                std::thread::spawn(move || store.redeem(&token).is_some())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
    }
}
