//! One-time authorization code store.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use cis_model::ResourcePayload;

/// Entry bound to an issued authorization code.
#[derive(Debug, Clone)]
struct CodeEntry {
    payload: ResourcePayload,
    redirect_uri: String,
    expires_at: DateTime<Utc>,
}

/// Issues and consumes one-time authorization codes.
///
/// A code is bound to a resource payload and the redirect URI presented at
/// issuance. Exchange removes the binding under the lock, so exactly one
/// concurrent exchange of the same code succeeds; all others observe
/// absent.
///
/// Expiry is advisory: `expires_at` is recorded but nothing sweeps the map
/// and consumption does not check it.
#[derive(Debug)]
pub struct AuthorizationCodeStore {
    ttl_seconds: i64,
    entries: Mutex<HashMap<String, CodeEntry>>,
}

impl AuthorizationCodeStore {
    /// Creates a store whose codes carry the given nominal TTL.
    #[must_use]
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Mints a random code bound to `{payload, redirect_uri}`.
    pub fn issue(&self, payload: ResourcePayload, redirect_uri: impl Into<String>) -> String {
        let code = cis_crypto::random::generate_auth_code();
        let entry = CodeEntry {
            payload,
            redirect_uri: redirect_uri.into(),
            expires_at: Utc::now() + Duration::seconds(self.ttl_seconds),
        };
        self.entries.lock().insert(code.clone(), entry);
        code
    }

    /// Non-consuming lookup of the redirect URI bound at issuance.
    ///
    /// Used to pre-validate the redirect URI presented at token exchange
    /// without consuming the code.
    #[must_use]
    pub fn redirect_uri_for(&self, code: &str) -> Option<String> {
        self.entries
            .lock()
            .get(code)
            .map(|entry| entry.redirect_uri.clone())
    }

    /// Consumes the code, returning its payload.
    ///
    /// Returns `None` for an unknown, already-consumed, or revoked code.
    #[must_use]
    pub fn exchange(&self, code: &str) -> Option<ResourcePayload> {
        self.entries.lock().remove(code).map(|entry| entry.payload)
    }

    /// Unconditional, idempotent delete.
    pub fn revoke(&self, code: &str) {
        self.entries.lock().remove(code);
    }

    /// Returns the nominal expiry of a live code.
    #[must_use]
    pub fn expires_at(&self, code: &str) -> Option<DateTime<Utc>> {
        self.entries.lock().get(code).map(|entry| entry.expires_at)
    }
}
