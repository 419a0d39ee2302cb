//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! Only the signing key is mandatory; everything else defaults to values
//! that make a local test run work out of the box.

use std::time::Duration;

/// Stub server configuration.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Base URL clients see (used in generated URLs).
    pub base_url: String,

    /// Token endpoint URL client assertions must name in `aud`.
    pub token_endpoint_url: String,

    /// Issuer identifier stamped into credentials.
    pub issuer: String,

    /// Authorization code lifespan in seconds.
    pub auth_code_lifespan: i64,

    /// Access token lifespan in seconds.
    pub access_token_lifespan: i64,

    /// Issued credential lifespan in seconds.
    pub credential_lifespan: i64,

    /// Client registry cache lifespan in seconds.
    pub registry_cache_lifespan: u64,

    /// PEM-encoded ES256 private signing key.
    pub signing_key_pem: String,

    /// Key identifier placed in credential JWT headers.
    pub signing_key_id: String,

    /// Path to the JSON client registration file.
    pub clients_file: String,

    /// Log level.
    pub log_level: String,
}

impl StubConfig {
    /// Loads configuration from environment variables.
    ///
    /// The signing key comes from `CIS_SIGNING_KEY_PEM` (inline PEM) or
    /// `CIS_SIGNING_KEY_FILE` (path); one of the two is required.
    ///
    /// # Errors
    ///
    /// Fails when no signing key is configured or the key file is
    /// unreadable.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("CIS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("CIS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let base_url =
            std::env::var("CIS_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let token_endpoint_url = std::env::var("CIS_TOKEN_ENDPOINT_URL")
            .unwrap_or_else(|_| format!("{base_url}/token"));
        let issuer = std::env::var("CIS_ISSUER").unwrap_or_else(|_| base_url.clone());

        let auth_code_lifespan = std::env::var("CIS_AUTH_CODE_LIFESPAN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600); // 10 minutes

        let access_token_lifespan = std::env::var("CIS_ACCESS_TOKEN_LIFESPAN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600); // 1 hour

        let credential_lifespan = std::env::var("CIS_CREDENTIAL_LIFESPAN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15_778_800); // ~6 months

        let registry_cache_lifespan = std::env::var("CIS_REGISTRY_CACHE_LIFESPAN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300); // 5 minutes

        let signing_key_pem = match std::env::var("CIS_SIGNING_KEY_PEM") {
            Ok(pem) => pem,
            Err(_) => {
                let path = std::env::var("CIS_SIGNING_KEY_FILE").map_err(|_| {
                    anyhow::anyhow!(
                        "CIS_SIGNING_KEY_PEM or CIS_SIGNING_KEY_FILE environment variable is required"
                    )
                })?;
                std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("cannot read signing key file {path}: {e}"))?
            }
        };
        let signing_key_id =
            std::env::var("CIS_SIGNING_KEY_ID").unwrap_or_else(|_| "issuer-key-1".to_string());

        let clients_file =
            std::env::var("CIS_CLIENTS_FILE").unwrap_or_else(|_| "clients.json".to_string());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            base_url,
            token_endpoint_url,
            issuer,
            auth_code_lifespan,
            access_token_lifespan,
            credential_lifespan,
            registry_cache_lifespan,
            signing_key_pem,
            signing_key_id,
            clients_file,
            log_level,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(signing_key_pem: &str, clients_file: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            base_url: "http://localhost:8080".to_string(),
            token_endpoint_url: "http://localhost:8080/token".to_string(),
            issuer: "http://localhost:8080".to_string(),
            auth_code_lifespan: 600,
            access_token_lifespan: 3600,
            credential_lifespan: 15_778_800,
            registry_cache_lifespan: 300,
            signing_key_pem: signing_key_pem.to_string(),
            signing_key_id: "issuer-key-1".to_string(),
            clients_file: clients_file.to_string(),
            log_level: "debug".to_string(),
        }
    }

    /// Returns the registry cache duration.
    #[must_use]
    pub fn registry_cache_duration(&self) -> Duration {
        Duration::from_secs(self.registry_cache_lifespan)
    }
}
