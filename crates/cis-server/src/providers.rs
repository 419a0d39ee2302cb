//! Client registration sources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cis_protocol::{ClientRegistration, IssuerError, ProtocolResult, RegistrationProvider};

/// Reads client registrations from a JSON file on each TTL-guarded refresh.
///
/// The file holds a JSON array of registrations. Edits show up once the
/// registry cache expires; a missing or undecodable file fails the lookup
/// that triggered the refresh.
pub struct FileRegistrationProvider {
    path: PathBuf,
}

impl FileRegistrationProvider {
    /// Creates a provider reading from the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RegistrationProvider for FileRegistrationProvider {
    async fn load_all(&self) -> ProtocolResult<Vec<ClientRegistration>> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            IssuerError::Registry(format!("cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            IssuerError::Registry(format!("cannot parse {}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use cis_protocol::ClientAuthMethod;
    use uuid::Uuid;

    use super::*;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cis-clients-{}.json", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_registrations_from_json() {
        let path = temp_file(
            r#"[{"client_id": "client-a", "auth_method": "none", "response_shape": "resource"}]"#,
        );
        let provider = FileRegistrationProvider::new(&path);

        let registrations = provider.load_all().await.unwrap();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].client_id, "client-a");
        assert_eq!(registrations[0].auth_method, ClientAuthMethod::None);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_file_is_a_registry_error() {
        let provider = FileRegistrationProvider::new("/nonexistent/clients.json");
        let err = provider.load_all().await.unwrap_err();
        assert!(matches!(err, IssuerError::Registry(_)));
    }

    #[tokio::test]
    async fn undecodable_file_is_a_registry_error() {
        let path = temp_file("not json");
        let provider = FileRegistrationProvider::new(&path);

        let err = provider.load_all().await.unwrap_err();
        assert!(matches!(err, IssuerError::Registry(_)));

        std::fs::remove_file(path).ok();
    }
}
