//! Remote registry boundary
//!
//! Everything the domain stores need from the backing service sits behind
//! the [`RegistryApi`] trait: OTP dispatch, phone verification, and profile
//! submission. Two implementations exist: the HTTP client used against the
//! real service and an in-process simulated twin for offline use and tests.

pub mod client;
pub mod simulated;
pub mod types;

pub use client::{MLAH_API_BASE_URL, RegistryClient, RegistryClientBuilder};
pub use simulated::{SimulatedCall, SimulatedRegistry};
pub use types::{AuthGrant, CustomerRecord, LabourRecord};

use async_trait::async_trait;

use crate::domain::session::PhoneNumber;
use crate::error::Result;

/// Customer type sent with the verification call. The service expects it at
/// authentication time, before the user has picked tourist or labour.
pub const DEFAULT_CUSTOMER_TYPE: i32 = 1;

/// Operations the registry exposes to this client
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Dispatch a one-time code to the given phone number
    async fn send_otp(&self, phone: &PhoneNumber) -> Result<()>;

    /// Exchange a phone number and code for a bearer grant
    async fn authenticate(
        &self,
        phone: &PhoneNumber,
        otp: &str,
        customer_type: i32,
    ) -> Result<AuthGrant>;

    /// Submit tourist profile records (the service takes a batch)
    async fn create_customer(&self, token: &str, records: &[CustomerRecord]) -> Result<()>;

    /// Submit a labour profile record
    async fn create_labour(&self, token: &str, record: &LabourRecord) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn RegistryApi) {}
}
