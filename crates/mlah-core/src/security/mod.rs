//! Credential custody for the registry bearer token
//!
//! The token received from a successful OTP verification is held in the
//! operating system's credential store and read back at call time whenever an
//! authenticated write goes out. Nothing in this crate persists the token
//! anywhere else.

mod keyring;

pub use keyring::KeyringCredentialStore;

use async_trait::async_trait;

use crate::error::Result;

/// Durable custody of the registry bearer token
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist the bearer token, replacing any previous one
    async fn store(&self, token: &str) -> Result<()>;

    /// Read the stored bearer token, if any
    async fn get(&self) -> Result<Option<String>>;

    /// Discard the stored bearer token. Absent tokens are fine.
    async fn delete(&self) -> Result<()>;
}

/// In-memory credential store for testing
///
/// This implementation holds the token in memory only.
/// It should NOT be used in production.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    token: std::sync::Mutex<Option<String>>,
}

impl InMemoryCredentialStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            token: std::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn store(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    async fn delete(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryCredentialStore::new();

        // Initially empty
        assert!(store.get().await.unwrap().is_none());

        // Store a token
        store.store("bearer-abc").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("bearer-abc"));

        // Replace it
        store.store("bearer-def").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("bearer-def"));

        // Delete
        store.delete().await.unwrap();
        assert!(store.get().await.unwrap().is_none());

        // Deleting again is fine
        store.delete().await.unwrap();
    }

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn CredentialStore) {}
}
