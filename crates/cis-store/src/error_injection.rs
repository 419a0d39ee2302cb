//! Test-only error injection registry.
//!
//! Tests drive the stub into specific failure modes by registering an
//! error override against an authorization code or access token, targeted
//! at one of the three protocol stages. The endpoint layer consults the
//! registry before normal processing at each stage; a hit bypasses the
//! success path entirely and is rendered in that stage's natural error
//! shape, so injected failures are indistinguishable from organic ones.

use std::collections::HashMap;
use std::str::FromStr;

use parking_lot::Mutex;

/// Error code meaning "no override"; registering it disables a previous
/// entry and `consult` never returns it.
pub const NONE_SENTINEL: &str = "none";

/// Protocol stage an injected error targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionStage {
    /// The authorization endpoint.
    Authorize,

    /// The token endpoint.
    Token,

    /// The credential endpoint.
    Credential,
}

impl FromStr for InjectionStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorize" => Ok(Self::Authorize),
            "token" => Ok(Self::Token),
            "credential" => Ok(Self::Credential),
            other => Err(format!("unknown injection stage: {other}")),
        }
    }
}

/// A registered error override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedError {
    /// OAuth-style error code to render.
    pub code: String,

    /// Human-readable error description.
    pub description: String,
}

/// Registry of error overrides keyed by code/token and stage.
#[derive(Debug, Default)]
pub struct ErrorInjectionRegistry {
    entries: Mutex<HashMap<(String, InjectionStage), InjectedError>>,
}

impl ErrorInjectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an override; an existing entry for the same key and
    /// stage is overwritten.
    pub fn register(
        &self,
        key: impl Into<String>,
        stage: InjectionStage,
        code: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.entries.lock().insert(
            (key.into(), stage),
            InjectedError {
                code: code.into(),
                description: description.into(),
            },
        );
    }

    /// Looks up an override for the key at the given stage.
    ///
    /// The lookup is non-consuming. The `"none"` sentinel is filtered
    /// out, so a sentinel registration reads as absent.
    #[must_use]
    pub fn consult(&self, key: &str, stage: InjectionStage) -> Option<InjectedError> {
        self.entries
            .lock()
            .get(&(key.to_string(), stage))
            .filter(|entry| entry.code != NONE_SENTINEL)
            .cloned()
    }

    /// Copies a credential-stage override from one key to another.
    ///
    /// The credential endpoint is keyed by access token, but tests
    /// register credential overrides against the authorization code they
    /// hold. The token endpoint calls this after a successful exchange so
    /// the override follows the minted token.
    pub fn promote_credential_override(&self, from_key: &str, to_key: &str) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries
            .get(&(from_key.to_string(), InjectionStage::Credential))
            .cloned()
        {
            entries.insert((to_key.to_string(), InjectionStage::Credential), entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_consult() {
        let registry = ErrorInjectionRegistry::new();
        registry.register("code-1", InjectionStage::Token, "invalid_grant", "forced");

        let hit = registry.consult("code-1", InjectionStage::Token).unwrap();
        assert_eq!(hit.code, "invalid_grant");
        assert_eq!(hit.description, "forced");

        // Other stages and keys miss.
        assert!(registry.consult("code-1", InjectionStage::Credential).is_none());
        assert!(registry.consult("code-2", InjectionStage::Token).is_none());
    }

    #[test]
    fn register_overwrites() {
        let registry = ErrorInjectionRegistry::new();
        registry.register("k", InjectionStage::Token, "invalid_grant", "first");
        registry.register("k", InjectionStage::Token, "access_denied", "second");

        let hit = registry.consult("k", InjectionStage::Token).unwrap();
        assert_eq!(hit.code, "access_denied");
    }

    #[test]
    fn none_sentinel_reads_as_absent() {
        let registry = ErrorInjectionRegistry::new();
        registry.register("k", InjectionStage::Token, "invalid_grant", "forced");
        registry.register("k", InjectionStage::Token, NONE_SENTINEL, "");

        assert!(registry.consult("k", InjectionStage::Token).is_none());
    }

    #[test]
    fn promotion_copies_credential_overrides_only() {
        let registry = ErrorInjectionRegistry::new();
        registry.register("code-1", InjectionStage::Credential, "access_denied", "vc");
        registry.register("code-1", InjectionStage::Token, "invalid_grant", "token");

        registry.promote_credential_override("code-1", "token-1");

        let hit = registry
            .consult("token-1", InjectionStage::Credential)
            .unwrap();
        assert_eq!(hit.code, "access_denied");
        // The token-stage entry stays put.
        assert!(registry.consult("token-1", InjectionStage::Token).is_none());
    }

    #[test]
    fn stage_parses_from_request_parameter() {
        assert_eq!(
            "credential".parse::<InjectionStage>().unwrap(),
            InjectionStage::Credential
        );
        assert!("userinfo".parse::<InjectionStage>().is_err());
    }
}
