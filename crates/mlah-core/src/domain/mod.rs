//! Domain stores
//!
//! Three independent state containers compose the domain layer. The session
//! store owns the authentication handshake and is a leaf dependency; the
//! tourist and labour stores own one profile slice each. No entity is shared
//! across stores, and each store persists its own snapshot independently.

pub mod labour;
pub mod session;
pub mod tourist;

use std::sync::Arc;
use std::time::Duration;

use crate::api::RegistryApi;
use crate::config::{Config, MissingEntityPolicy};
use crate::security::CredentialStore;
use crate::storage::SnapshotStore;

/// Collaborators handed to every domain store by the composition root
#[derive(Clone)]
pub struct StoreContext {
    pub api: Arc<dyn RegistryApi>,
    pub credentials: Arc<dyn CredentialStore>,
    pub snapshots: SnapshotStore,
    /// Fixed delay applied to locally simulated operations
    pub latency: Duration,
    pub policy: MissingEntityPolicy,
}

impl StoreContext {
    /// Assemble a context from wired collaborators and the configuration
    pub fn new(
        api: Arc<dyn RegistryApi>,
        credentials: Arc<dyn CredentialStore>,
        snapshots: SnapshotStore,
        config: &Config,
    ) -> Self {
        Self {
            api,
            credentials,
            snapshots,
            latency: config.api.latency(),
            policy: config.policy.missing_entity,
        }
    }

    /// Wait out the configured simulated latency
    pub(crate) async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("latency", &self.latency)
            .field("policy", &self.policy)
            .finish()
    }
}
