//! Labour store operations
//!
//! Owns the labour profile and drives the card lifecycle: issue with the
//! profile, renew in place, reissue under a new number, export for download.
//! Mutations are queued through a per-store operation guard.

use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::LabourRecord;
use crate::domain::StoreContext;
use crate::error::{Error, Result};
use crate::storage::LABOUR_SNAPSHOT;

use super::card::{CardDocument, CardIssuer, CardStatus, expiry_one_year_from};
use super::profile::{LabourProfile, LabourProfileDraft, LabourProfileUpdate};

/// Full labour store state, persisted as one snapshot blob
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabourState {
    pub profile: Option<LabourProfile>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// State container for the labour registration flow
pub struct LabourStore {
    state: RwLock<LabourState>,
    op: tokio::sync::Mutex<()>,
    ctx: StoreContext,
    issuer: CardIssuer,
}

impl LabourStore {
    /// Load the store, restoring the persisted snapshot if one exists
    pub async fn load(ctx: StoreContext) -> Result<Self> {
        Self::load_with_issuer(ctx, CardIssuer::new()).await
    }

    /// Load the store with a specific card issuer (useful for testing)
    pub async fn load_with_issuer(ctx: StoreContext, issuer: CardIssuer) -> Result<Self> {
        let state: LabourState = ctx
            .snapshots
            .load(LABOUR_SNAPSHOT)
            .await?
            .unwrap_or_default();

        Ok(Self {
            state: RwLock::new(state),
            op: tokio::sync::Mutex::new(()),
            ctx,
            issuer,
        })
    }

    // ========== Reads ==========

    /// The registered profile, if one exists
    pub fn profile(&self) -> Option<LabourProfile> {
        self.state.read().unwrap().profile.clone()
    }

    /// True while a mutation is in flight
    pub fn is_loading(&self) -> bool {
        self.state.read().unwrap().is_loading
    }

    /// Message recorded by the most recent failed operation
    pub fn last_error(&self) -> Option<String> {
        self.state.read().unwrap().error.clone()
    }

    // ========== Mutation plumbing ==========

    fn begin(&self) {
        let mut state = self.state.write().unwrap();
        state.is_loading = true;
        state.error = None;
    }

    fn fail<T>(&self, err: Error) -> Result<T> {
        let mut state = self.state.write().unwrap();
        state.is_loading = false;
        state.error = Some(err.to_string());
        Err(err)
    }

    fn snapshot(&self) -> LabourState {
        self.state.read().unwrap().clone()
    }

    /// Persist the new state, then apply it atomically
    async fn finish(&self, mut next: LabourState) -> Result<()> {
        next.is_loading = false;
        next.error = None;
        if let Err(e) = self.ctx.snapshots.save(LABOUR_SNAPSHOT, &next).await {
            return self.fail(e);
        }
        *self.state.write().unwrap() = next;
        Ok(())
    }

    // ========== Operations ==========

    /// Register the labour profile and issue its card
    ///
    /// The card comes up active with a fresh number and a one-year expiry.
    /// Not idempotent: an existing profile is silently replaced.
    pub async fn create_profile(&self, draft: LabourProfileDraft) -> Result<LabourProfile> {
        let _guard = self.op.lock().await;
        self.begin();

        let token = match self.ctx.credentials.get().await {
            Ok(Some(token)) => token,
            Ok(None) => return self.fail(Error::MissingCredential),
            Err(e) => return self.fail(e),
        };

        let card_number = self.issuer.issue_number();
        let expiry = expiry_one_year_from(Utc::now().date_naive());
        let profile = LabourProfile::new(draft, card_number, expiry);

        let record = LabourRecord::from_profile(&profile);
        if let Err(e) = self.ctx.api.create_labour(&token, &record).await {
            warn!(error = %e, "Labour profile submission failed");
            return self.fail(e);
        }

        let mut next = self.snapshot();
        if next.profile.is_some() {
            warn!("Replacing existing labour profile");
        }
        next.profile = Some(profile.clone());
        self.finish(next).await?;

        info!(profile_id = %profile.id, card = ?profile.card_number, "Labour profile created");
        Ok(profile)
    }

    /// Merge a patch into the existing profile
    pub async fn update_profile(&self, patch: LabourProfileUpdate) -> Result<LabourProfile> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        let Some(profile) = next.profile.as_mut() else {
            return self.fail(Error::NoProfile("labour"));
        };

        self.ctx.pause().await;
        profile.apply(patch);
        let updated = profile.clone();
        self.finish(next).await?;

        Ok(updated)
    }

    /// Renew the card: same number, fresh one-year expiry, active again
    pub async fn renew_card(&self) -> Result<LabourProfile> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        let Some(profile) = next.profile.as_mut() else {
            return self.fail(Error::NoProfile("labour"));
        };

        self.ctx.pause().await;
        profile.card_status = CardStatus::Active;
        profile.card_expiry = Some(expiry_one_year_from(Utc::now().date_naive()));
        let renewed = profile.clone();
        self.finish(next).await?;

        info!(card = ?renewed.card_number, "Card renewed");
        Ok(renewed)
    }

    /// Apply for a replacement card: new number, fresh expiry, active
    pub async fn apply_new_card(&self) -> Result<LabourProfile> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        let Some(profile) = next.profile.as_mut() else {
            return self.fail(Error::NoProfile("labour"));
        };

        self.ctx.pause().await;
        profile.card_number = Some(self.issuer.issue_number());
        profile.card_status = CardStatus::Active;
        profile.card_expiry = Some(expiry_one_year_from(Utc::now().date_naive()));
        let reissued = profile.clone();
        self.finish(next).await?;

        info!(card = ?reissued.card_number, "New card issued");
        Ok(reissued)
    }

    /// Build the export artifact for the card download
    ///
    /// Mutates nothing beyond the loading flag; the document is handed to
    /// the external rendering boundary by the caller.
    pub async fn download_card(&self) -> Result<CardDocument> {
        let _guard = self.op.lock().await;
        self.begin();

        let Some(profile) = self.snapshot().profile else {
            return self.fail(Error::NoProfile("labour"));
        };

        self.ctx.pause().await;
        let document = CardDocument::from_profile(&profile);

        {
            let mut state = self.state.write().unwrap();
            state.is_loading = false;
            state.error = None;
        }

        info!(card = ?document.card_number, "Card export prepared");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SimulatedCall, SimulatedRegistry};
    use crate::config::MissingEntityPolicy;
    use crate::domain::session::PhoneNumber;
    use crate::error::ErrorKind;
    use crate::security::{CredentialStore, InMemoryCredentialStore};
    use crate::storage::{Database, SnapshotStore};
    use std::sync::Arc;
    use std::time::Duration;

    async fn context(with_token: bool) -> (StoreContext, Arc<SimulatedRegistry>) {
        let db = Database::in_memory().await.expect("in-memory db");
        let api = Arc::new(SimulatedRegistry::instant());
        let credentials = Arc::new(InMemoryCredentialStore::new());
        if with_token {
            credentials.store("mock-token").await.unwrap();
        }
        let ctx = StoreContext {
            api: api.clone(),
            credentials,
            snapshots: SnapshotStore::new(db.pool().clone()),
            latency: Duration::ZERO,
            policy: MissingEntityPolicy::Lenient,
        };
        (ctx, api)
    }

    async fn store() -> LabourStore {
        let (ctx, _api) = context(true).await;
        LabourStore::load(ctx).await.expect("load")
    }

    fn draft() -> LabourProfileDraft {
        LabourProfileDraft {
            name: "Mohan Lal".into(),
            phone: PhoneNumber::parse("9123456780").unwrap(),
            address: Some("Sector 9".into()),
            id_proof: None,
            profile_image: None,
            id_proof_images: None,
            skills: Some("mason".into()),
        }
    }

    #[tokio::test]
    async fn test_create_profile_issues_an_active_card() {
        let (ctx, api) = context(true).await;
        let store = LabourStore::load(ctx).await.unwrap();

        let before = Utc::now().date_naive();
        let profile = store.create_profile(draft()).await.unwrap();
        let after = Utc::now().date_naive();

        let number = profile.card_number.expect("card number assigned");
        assert!(number.starts_with("LC-"));
        assert_eq!(profile.card_status, CardStatus::Active);

        let expiry = profile.card_expiry.expect("expiry assigned");
        assert!(expiry >= expiry_one_year_from(before));
        assert!(expiry <= expiry_one_year_from(after));

        assert!(api.calls().contains(&SimulatedCall::CreateLabour));
    }

    #[tokio::test]
    async fn test_create_profile_requires_credential() {
        let (ctx, _api) = context(false).await;
        let store = LabourStore::load(ctx).await.unwrap();

        let err = store.create_profile(draft()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(store.profile().is_none());
    }

    #[tokio::test]
    async fn test_renew_preserves_number_and_resets_expiry() {
        let store = store().await;
        let created = store.create_profile(draft()).await.unwrap();

        let before = Utc::now().date_naive();
        let renewed = store.renew_card().await.unwrap();
        let after = Utc::now().date_naive();

        assert_eq!(renewed.card_number, created.card_number);
        assert_eq!(renewed.card_status, CardStatus::Active);
        let expiry = renewed.card_expiry.expect("expiry assigned");
        assert!(expiry >= expiry_one_year_from(before));
        assert!(expiry <= expiry_one_year_from(after));
    }

    #[tokio::test]
    async fn test_renew_reactivates_an_expired_card() {
        let (ctx, _api) = context(true).await;

        // Seed a snapshot holding an expired card, then load over it
        let mut expired = LabourProfile::new(
            draft(),
            "LC-654321".into(),
            Utc::now().date_naive() - chrono::Months::new(1),
        );
        expired.card_status = CardStatus::Expired;
        ctx.snapshots
            .save(
                LABOUR_SNAPSHOT,
                &LabourState {
                    profile: Some(expired),
                    is_loading: false,
                    error: None,
                },
            )
            .await
            .unwrap();

        let store = LabourStore::load(ctx).await.unwrap();
        assert_eq!(store.profile().unwrap().card_status, CardStatus::Expired);

        let renewed = store.renew_card().await.unwrap();
        assert_eq!(renewed.card_status, CardStatus::Active);
        assert_eq!(renewed.card_number.as_deref(), Some("LC-654321"));
    }

    #[tokio::test]
    async fn test_apply_new_card_changes_the_number() {
        let store = store().await;
        let created = store.create_profile(draft()).await.unwrap();

        let reissued = store.apply_new_card().await.unwrap();
        assert_ne!(reissued.card_number, created.card_number);
        assert_eq!(reissued.card_status, CardStatus::Active);
    }

    #[tokio::test]
    async fn test_card_operations_require_profile() {
        let store = store().await;

        assert_eq!(store.renew_card().await.unwrap_err().kind(), ErrorKind::Precondition);
        assert_eq!(
            store.apply_new_card().await.unwrap_err().kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            store.download_card().await.unwrap_err().kind(),
            ErrorKind::Precondition
        );
    }

    #[tokio::test]
    async fn test_download_builds_document_without_mutating() {
        let store = store().await;
        let profile = store.create_profile(draft()).await.unwrap();

        let document = store.download_card().await.unwrap();
        assert_eq!(document.card_number, profile.card_number);
        assert_eq!(document.holder_name, "Mohan Lal");
        assert_eq!(document.status, CardStatus::Active);

        // Nothing changed
        assert_eq!(store.profile().unwrap(), profile);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_update_profile_merges_patch() {
        let store = store().await;
        let created = store.create_profile(draft()).await.unwrap();

        let updated = store
            .update_profile(LabourProfileUpdate {
                skills: Some("carpenter".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.skills.as_deref(), Some("carpenter"));
        assert_eq!(updated.card_number, created.card_number);
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let (ctx, _api) = context(true).await;
        let store = LabourStore::load(ctx.clone()).await.unwrap();
        let created = store.create_profile(draft()).await.unwrap();

        let reloaded = LabourStore::load(ctx).await.unwrap();
        assert_eq!(reloaded.profile().unwrap().card_number, created.card_number);
    }
}
