//! OS keyring integration for bearer token storage
//!
//! Stores the registry bearer token in the operating system's credential
//! store (e.g., macOS Keychain, Windows Credential Manager, Linux Secret
//! Service).

use async_trait::async_trait;
use keyring::Entry;

use super::CredentialStore;
use crate::error::{Error, Result};

/// Service name used for keyring storage
const KEYRING_SERVICE: &str = "mlah";

/// Default entry name for the bearer token
const KEYRING_ENTRY: &str = "api-bearer-token";

/// OS keyring-based credential store
///
/// Access to the keyring typically requires user authentication
/// (e.g., password, biometrics) depending on OS configuration.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
    entry: String,
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringCredentialStore {
    /// Create a new keyring store with the default service/entry
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            entry: KEYRING_ENTRY.to_string(),
        }
    }

    /// Create a keyring store with custom service/entry names
    ///
    /// This can be useful for testing or multi-tenant scenarios.
    pub fn with_names(service: &str, entry: &str) -> Self {
        Self {
            service: service.to_string(),
            entry: entry.to_string(),
        }
    }

    /// Get the keyring entry
    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.entry)
            .map_err(|e| Error::Credential(format!("Failed to create keyring entry: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn store(&self, token: &str) -> Result<()> {
        let entry = self.entry()?;
        let token = token.to_string();

        // keyring operations are blocking, so we spawn a blocking task
        tokio::task::spawn_blocking(move || {
            entry
                .set_password(&token)
                .map_err(|e| Error::Credential(format!("Failed to store token: {}", e)))
        })
        .await
        .map_err(|e| Error::Credential(format!("Task join error: {}", e)))?
    }

    async fn get(&self) -> Result<Option<String>> {
        let entry = self.entry()?;

        let result = tokio::task::spawn_blocking(move || entry.get_password())
            .await
            .map_err(|e| Error::Credential(format!("Task join error: {}", e)))?;

        match result {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::Credential(format!("Failed to retrieve token: {}", e))),
        }
    }

    async fn delete(&self) -> Result<()> {
        let entry = self.entry()?;

        tokio::task::spawn_blocking(move || match entry.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(Error::Credential(format!("Failed to delete token: {}", e))),
        })
        .await
        .map_err(|e| Error::Credential(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Keyring tests require a running secret service and are
    // typically run manually or in integration test environments
    #[tokio::test]
    #[ignore = "Requires OS keyring access"]
    async fn test_keyring_store_roundtrip() {
        let store = KeyringCredentialStore::with_names("mlah-test", "test-token");

        // Clean up any existing test token
        let _ = store.delete().await;

        assert!(store.get().await.unwrap().is_none());

        store.store("bearer-xyz").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("bearer-xyz"));

        store.delete().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }
}
