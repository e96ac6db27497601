//! Session store operations
//!
//! Drives the handshake state machine against the registry boundary and
//! keeps the bearer credential in the credential store. Mutations are queued
//! through a per-store operation guard, so two concurrent calls cannot race
//! each other's writes; readers observe `is_loading` while a call is in
//! flight.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::DEFAULT_CUSTOMER_TYPE;
use crate::domain::StoreContext;
use crate::error::{Error, Result};
use crate::storage::SESSION_SNAPSHOT;

use super::identity::{Identity, PhoneNumber, SessionStage, UserType};

/// Full session store state, persisted as one snapshot blob
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub stage: SessionStage,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// State container for the authentication handshake
pub struct SessionStore {
    state: RwLock<SessionState>,
    op: tokio::sync::Mutex<()>,
    ctx: StoreContext,
}

impl SessionStore {
    /// Load the store, restoring the persisted snapshot if one exists
    pub async fn load(ctx: StoreContext) -> Result<Self> {
        let state: SessionState = ctx
            .snapshots
            .load(SESSION_SNAPSHOT)
            .await?
            .unwrap_or_default();

        Ok(Self {
            state: RwLock::new(state),
            op: tokio::sync::Mutex::new(()),
            ctx,
        })
    }

    // ========== Reads ==========

    /// Current handshake stage
    pub fn stage(&self) -> SessionStage {
        self.state.read().unwrap().stage.clone()
    }

    /// The authenticated identity, if verification has succeeded
    pub fn identity(&self) -> Option<Identity> {
        self.state.read().unwrap().stage.identity().cloned()
    }

    /// Check if verification has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().stage.is_authenticated()
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

    /// Persist the new stage, then apply it atomically
    async fn commit(&self, stage: SessionStage) -> Result<()> {
        let next = SessionState {
            stage,
            is_loading: false,
            error: None,
        };
        self.ctx.snapshots.save(SESSION_SNAPSHOT, &next).await?;
        *self.state.write().unwrap() = next;
        Ok(())
    }

    // ========== Operations ==========

    /// Ask the registry to dispatch an OTP to the given phone
    ///
    /// Allowed from `Anonymous` and from `OtpPending` (re-request). A remote
    /// failure leaves the stage unchanged, so the call is retryable.
    pub async fn request_otp(&self, phone: &str) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        let phone = match PhoneNumber::parse(phone) {
            Ok(phone) => phone,
            Err(e) => return self.fail(e),
        };

        if let SessionStage::Authenticated { .. } = self.stage() {
            return self.fail(Error::InvalidSessionState("request_otp", "authenticated"));
        }

        info!(phone = %phone, "Requesting OTP");
        if let Err(e) = self.ctx.api.send_otp(&phone).await {
            warn!(error = %e, "OTP dispatch failed");
            return self.fail(e);
        }

        match self.commit(SessionStage::OtpPending { phone }).await {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Verify the OTP for the phone that requested it
    ///
    /// Only valid while an OTP is pending, and only for the same phone. On
    /// success the bearer credential is persisted and the session becomes
    /// authenticated; on failure the stage stays `OtpPending` and the
    /// credential is discarded.
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<Identity> {
        let _guard = self.op.lock().await;
        self.begin();

        let phone = match PhoneNumber::parse(phone) {
            Ok(phone) => phone,
            Err(e) => return self.fail(e),
        };

        let pending = match self.stage() {
            SessionStage::OtpPending { phone } => phone,
            other => return self.fail(Error::InvalidSessionState("verify_otp", other.as_str())),
        };

        if phone != pending {
            return self.fail(Error::PhoneMismatch);
        }

        let grant = match self
            .ctx
            .api
            .authenticate(&phone, code, DEFAULT_CUSTOMER_TYPE)
            .await
        {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "OTP verification failed");
                return self.fail(e);
            }
        };

        if let Err(e) = self.ctx.credentials.store(&grant.token).await {
            return self.fail(e);
        }

        let identity = Identity::new(phone, Some(grant.username));
        match self
            .commit(SessionStage::Authenticated {
                identity: identity.clone(),
            })
            .await
        {
            Ok(()) => {
                info!(user = ?identity.name, "Session authenticated");
                Ok(identity)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Record which registration flow the subscriber chose
    pub async fn set_user_type(&self, user_type: UserType) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut identity = match self.stage() {
            SessionStage::Authenticated { identity } => identity,
            other => return self.fail(Error::InvalidSessionState("set_user_type", other.as_str())),
        };

        identity.user_type = Some(user_type);
        match self.commit(SessionStage::Authenticated { identity }).await {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Mark the subscriber as no longer new once a registration flow finishes
    pub async fn complete_registration(&self) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut identity = match self.stage() {
            SessionStage::Authenticated { identity } => identity,
            other => {
                return self.fail(Error::InvalidSessionState(
                    "complete_registration",
                    other.as_str(),
                ));
            }
        };

        identity.is_new_user = false;
        match self.commit(SessionStage::Authenticated { identity }).await {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Local-only sign-out: drop the identity and the stored credential
    ///
    /// Valid from any stage. The remote credential is never revoked.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        if let Err(e) = self.ctx.credentials.delete().await {
            return self.fail(e);
        }

        match self.commit(SessionStage::Anonymous).await {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }
}
