//! Tourist store operations
//!
//! Owns the tourist profile, its family members, and the two booking
//! collections. Mutations are queued through a per-store operation guard;
//! each one validates against the current snapshot, performs its effect, and
//! applies the new state atomically after the snapshot is written through.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::CustomerRecord;
use crate::config::MissingEntityPolicy;
use crate::domain::StoreContext;
use crate::error::{Error, Result};
use crate::storage::TOURIST_SNAPSHOT;

use super::booking::{CabBooking, CabBookingDraft, HotelBooking, HotelBookingDraft};
use super::profile::{TouristMember, TouristMemberDraft, TouristProfile, TouristProfileDraft, TouristProfileUpdate};

/// Full tourist store state, persisted as one snapshot blob
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TouristState {
    pub profile: Option<TouristProfile>,
    #[serde(default)]
    pub hotels: Vec<HotelBooking>,
    #[serde(default)]
    pub cabs: Vec<CabBooking>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// State container for the tourist registration flow
pub struct TouristStore {
    state: RwLock<TouristState>,
    op: tokio::sync::Mutex<()>,
    ctx: StoreContext,
}

impl TouristStore {
    /// Load the store, restoring the persisted snapshot if one exists
    pub async fn load(ctx: StoreContext) -> Result<Self> {
        let state: TouristState = ctx
            .snapshots
            .load(TOURIST_SNAPSHOT)
            .await?
            .unwrap_or_default();

        Ok(Self {
            state: RwLock::new(state),
            op: tokio::sync::Mutex::new(()),
            ctx,
        })
    }

    // ========== Reads ==========

    /// The registered profile, if one exists
    pub fn profile(&self) -> Option<TouristProfile> {
        self.state.read().unwrap().profile.clone()
    }

    /// Family members in display order (empty without a profile)
    pub fn members(&self) -> Vec<TouristMember> {
        self.state
            .read()
            .unwrap()
            .profile
            .as_ref()
            .map(|p| p.members.clone())
            .unwrap_or_default()
    }

    /// Hotel bookings in creation order
    pub fn hotels(&self) -> Vec<HotelBooking> {
        self.state.read().unwrap().hotels.clone()
    }

    /// Cab bookings in creation order
    pub fn cabs(&self) -> Vec<CabBooking> {
        self.state.read().unwrap().cabs.clone()
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

    fn snapshot(&self) -> TouristState {
        self.state.read().unwrap().clone()
    }

    /// Persist the new state, then apply it atomically
    async fn finish(&self, mut next: TouristState) -> Result<()> {
        next.is_loading = false;
        next.error = None;
        if let Err(e) = self.ctx.snapshots.save(TOURIST_SNAPSHOT, &next).await {
            return self.fail(e);
        }
        *self.state.write().unwrap() = next;
        Ok(())
    }

    /// Resolve an id that matched nothing, honoring the configured policy
    async fn settle_missing(&self, what: String, next: TouristState) -> Result<()> {
        match self.ctx.policy {
            MissingEntityPolicy::Strict => self.fail(Error::NotFound(what)),
            MissingEntityPolicy::Lenient => {
                warn!(entity = %what, "No matching entry; nothing changed");
                self.finish(next).await
            }
        }
    }

    // ========== Profile operations ==========

    /// Register the tourist profile, submitting it to the registry
    ///
    /// Not idempotent: an existing profile is silently replaced. Bookings
    /// are unaffected since they live beside the profile.
    pub async fn create_profile(&self, draft: TouristProfileDraft) -> Result<TouristProfile> {
        let _guard = self.op.lock().await;
        self.begin();

        let token = match self.ctx.credentials.get().await {
            Ok(Some(token)) => token,
            Ok(None) => return self.fail(Error::MissingCredential),
            Err(e) => return self.fail(e),
        };

        let profile = TouristProfile::new(draft);
        let record = CustomerRecord::from_profile(&profile);
        if let Err(e) = self
            .ctx
            .api
            .create_customer(&token, std::slice::from_ref(&record))
            .await
        {
            warn!(error = %e, "Tourist profile submission failed");
            return self.fail(e);
        }

        let mut next = self.snapshot();
        if next.profile.is_some() {
            warn!("Replacing existing tourist profile");
        }
        next.profile = Some(profile.clone());
        self.finish(next).await?;

        info!(profile_id = %profile.id, "Tourist profile created");
        Ok(profile)
    }

    /// Merge a patch into the existing profile
    pub async fn update_profile(&self, patch: TouristProfileUpdate) -> Result<TouristProfile> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        let Some(profile) = next.profile.as_mut() else {
            return self.fail(Error::NoProfile("tourist"));
        };

        self.ctx.pause().await;
        profile.apply(patch);
        let updated = profile.clone();
        self.finish(next).await?;

        Ok(updated)
    }

    // ========== Member operations ==========

    /// Append a family member to the profile
    pub async fn add_member(&self, draft: TouristMemberDraft) -> Result<TouristMember> {
        let _guard = self.op.lock().await;
        self.begin();

        if draft.age == 0 {
            return self.fail(Error::InvalidInput(
                "Member age must be greater than zero".to_string(),
            ));
        }

        let mut next = self.snapshot();
        let Some(profile) = next.profile.as_mut() else {
            return self.fail(Error::NoProfile("tourist"));
        };

        self.ctx.pause().await;
        let member = TouristMember::new(draft);
        profile.members.push(member.clone());
        self.finish(next).await?;

        info!(member_id = %member.id, "Member added");
        Ok(member)
    }

    /// Remove a family member by id
    pub async fn remove_member(&self, id: Uuid) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        let Some(profile) = next.profile.as_mut() else {
            return self.fail(Error::NoProfile("tourist"));
        };

        self.ctx.pause().await;
        let before = profile.members.len();
        profile.members.retain(|m| m.id != id);

        if profile.members.len() == before {
            return self.settle_missing(format!("Member {}", id), next).await;
        }

        info!(member_id = %id, "Member removed");
        self.finish(next).await
    }

    // ========== Booking operations ==========

    /// Book a hotel stay. The new booking starts out confirmed.
    pub async fn book_hotel(&self, draft: HotelBookingDraft) -> Result<HotelBooking> {
        let _guard = self.op.lock().await;
        self.begin();

        if draft.guests == 0 {
            return self.fail(Error::InvalidInput(
                "A hotel booking needs at least one guest".to_string(),
            ));
        }

        let mut next = self.snapshot();
        if next.profile.is_none() {
            return self.fail(Error::NoProfile("tourist"));
        }

        self.ctx.pause().await;
        let booking = HotelBooking::new(draft);
        next.hotels.push(booking.clone());
        self.finish(next).await?;

        info!(booking_id = %booking.id, hotel = %booking.hotel_name, "Hotel booked");
        Ok(booking)
    }

    /// Book a cab ride. The new booking starts out confirmed.
    pub async fn book_cab(&self, draft: CabBookingDraft) -> Result<CabBooking> {
        let _guard = self.op.lock().await;
        self.begin();

        if draft.passengers == 0 {
            return self.fail(Error::InvalidInput(
                "A cab booking needs at least one passenger".to_string(),
            ));
        }

        let mut next = self.snapshot();
        if next.profile.is_none() {
            return self.fail(Error::NoProfile("tourist"));
        }

        self.ctx.pause().await;
        let booking = CabBooking::new(draft);
        next.cabs.push(booking.clone());
        self.finish(next).await?;

        info!(booking_id = %booking.id, "Cab booked");
        Ok(booking)
    }

    /// Cancel a hotel booking. Cancelling twice is a no-op success.
    pub async fn cancel_hotel_booking(&self, id: Uuid) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        self.ctx.pause().await;

        match next.hotels.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.cancel();
                info!(booking_id = %id, "Hotel booking cancelled");
                self.finish(next).await
            }
            None => self.settle_missing(format!("Hotel booking {}", id), next).await,
        }
    }

    /// Cancel a cab booking. Cancelling twice is a no-op success.
    pub async fn cancel_cab_booking(&self, id: Uuid) -> Result<()> {
        let _guard = self.op.lock().await;
        self.begin();

        let mut next = self.snapshot();
        self.ctx.pause().await;

        match next.cabs.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.cancel();
                info!(booking_id = %id, "Cab booking cancelled");
                self.finish(next).await
            }
            None => self.settle_missing(format!("Cab booking {}", id), next).await,
        }
    }
}
