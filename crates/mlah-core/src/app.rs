//! Composition root
//!
//! Owns the three domain stores and wires their collaborators from the
//! configuration: snapshot database, registry boundary, credential store.
//! There are no process-global stores; consumers receive the handles from
//! here and pass them down.

use std::sync::Arc;

use tracing::info;

use crate::api::{RegistryApi, RegistryClient, SimulatedRegistry};
use crate::config::Config;
use crate::domain::StoreContext;
use crate::domain::labour::LabourStore;
use crate::domain::session::SessionStore;
use crate::domain::tourist::TouristStore;
use crate::error::{Error, Result};
use crate::security::{CredentialStore, KeyringCredentialStore};
use crate::storage::{Database, DatabaseConfig, SnapshotStore};

/// The wired application core
pub struct App {
    session: SessionStore,
    tourist: TouristStore,
    labour: LabourStore,
}

impl App {
    /// Wire everything from the configuration
    ///
    /// Opens the snapshot database under the data directory, picks the real
    /// or simulated registry, and restores each store from its snapshot.
    pub async fn init(config: Config) -> Result<Self> {
        let path = config
            .database_path()
            .map_err(|e| Error::Config(e.to_string()))?;
        let db = Database::new(DatabaseConfig::with_path(path)).await?;

        let api: Arc<dyn RegistryApi> = if config.api.simulate {
            Arc::new(SimulatedRegistry::new(config.api.latency()))
        } else {
            Arc::new(RegistryClient::from_config(&config.api)?)
        };
        let credentials: Arc<dyn CredentialStore> = Arc::new(KeyringCredentialStore::new());

        Self::assemble(db, api, credentials, &config).await
    }

    /// Wire the stores over explicit collaborators
    ///
    /// Useful for tests and for callers supplying their own boundaries.
    pub async fn assemble(
        db: Database,
        api: Arc<dyn RegistryApi>,
        credentials: Arc<dyn CredentialStore>,
        config: &Config,
    ) -> Result<Self> {
        let snapshots = SnapshotStore::new(db.pool().clone());
        let ctx = StoreContext::new(api, credentials, snapshots, config);

        let session = SessionStore::load(ctx.clone()).await?;
        let tourist = TouristStore::load(ctx.clone()).await?;
        let labour = LabourStore::load(ctx).await?;

        info!("Domain stores loaded");
        Ok(Self {
            session,
            tourist,
            labour,
        })
    }

    /// The session store
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The tourist domain store
    pub fn tourist(&self) -> &TouristStore {
        &self.tourist
    }

    /// The labour domain store
    pub fn labour(&self) -> &LabourStore {
        &self.labour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::InMemoryCredentialStore;

    async fn app() -> App {
        let db = Database::in_memory().await.expect("in-memory db");
        let mut config = Config::default();
        config.api.simulated_latency_ms = 0;

        App::assemble(
            db,
            Arc::new(SimulatedRegistry::instant()),
            Arc::new(InMemoryCredentialStore::new()),
            &config,
        )
        .await
        .expect("assemble")
    }

    #[tokio::test]
    async fn test_assembled_stores_start_empty() {
        let app = app().await;

        assert!(!app.session().is_authenticated());
        assert!(app.tourist().profile().is_none());
        assert!(app.labour().profile().is_none());
    }

    #[tokio::test]
    async fn test_stores_share_the_credential_boundary() {
        let app = app().await;

        app.session().request_otp("9876543210").await.unwrap();
        app.session().verify_otp("9876543210", "1234").await.unwrap();

        // The token stored by the handshake authorizes the submission
        let draft = crate::domain::labour::LabourProfileDraft {
            name: "Mohan Lal".into(),
            phone: app.session().identity().unwrap().phone,
            address: None,
            id_proof: None,
            profile_image: None,
            id_proof_images: None,
            skills: None,
        };
        app.labour().create_profile(draft).await.expect("submission authorized");
    }
}
