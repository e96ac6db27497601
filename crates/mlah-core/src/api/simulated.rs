//! Simulated registry for offline use and tests
//!
//! Behaves like the hosted registry with a fixed per-call delay and mock
//! identifiers. Verification accepts one configured code; everything else
//! succeeds unconditionally. Calls are recorded so tests can assert what
//! went over the boundary.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::session::PhoneNumber;
use crate::error::{Error, Result};

use super::RegistryApi;
use super::types::{AuthGrant, CustomerRecord, LabourRecord};

/// Code the simulated registry accepts unless reconfigured
pub const DEFAULT_ACCEPTED_OTP: &str = "1234";

/// One recorded boundary call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedCall {
    SendOtp(String),
    Authenticate(String),
    CreateCustomer(usize),
    CreateLabour,
}

/// In-process stand-in for the hosted registry
pub struct SimulatedRegistry {
    latency: Duration,
    accepted_otp: String,
    calls: Mutex<Vec<SimulatedCall>>,
}

impl SimulatedRegistry {
    /// Create a simulated registry with the given per-call delay
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            accepted_otp: DEFAULT_ACCEPTED_OTP.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a simulated registry with no delay (useful for tests)
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Change the code `authenticate` accepts
    pub fn with_accepted_otp(mut self, otp: impl Into<String>) -> Self {
        self.accepted_otp = otp.into();
        self
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<SimulatedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SimulatedCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl std::fmt::Debug for SimulatedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedRegistry")
            .field("latency", &self.latency)
            .finish()
    }
}

#[async_trait]
impl RegistryApi for SimulatedRegistry {
    async fn send_otp(&self, phone: &PhoneNumber) -> Result<()> {
        self.pause().await;
        debug!(phone = %phone, "Simulated OTP dispatch");
        self.record(SimulatedCall::SendOtp(phone.as_str().to_string()));
        Ok(())
    }

    async fn authenticate(
        &self,
        phone: &PhoneNumber,
        otp: &str,
        _customer_type: i32,
    ) -> Result<AuthGrant> {
        self.pause().await;
        self.record(SimulatedCall::Authenticate(phone.as_str().to_string()));

        if otp != self.accepted_otp {
            return Err(Error::RemoteRejected("Verification failed".to_string()));
        }

        Ok(AuthGrant {
            username: format!("customer-{}", phone.as_str()),
            token: format!("mock-token-{}", Uuid::new_v4()),
        })
    }

    async fn create_customer(&self, _token: &str, records: &[CustomerRecord]) -> Result<()> {
        self.pause().await;
        debug!(records = records.len(), "Simulated customer submission");
        self.record(SimulatedCall::CreateCustomer(records.len()));
        Ok(())
    }

    async fn create_labour(&self, _token: &str, _record: &LabourRecord) -> Result<()> {
        self.pause().await;
        debug!("Simulated labour submission");
        self.record(SimulatedCall::CreateLabour);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("9876543210").unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_accepts_configured_code() {
        let registry = SimulatedRegistry::instant();

        let grant = registry
            .authenticate(&phone(), DEFAULT_ACCEPTED_OTP, 1)
            .await
            .expect("default code should verify");
        assert!(grant.token.starts_with("mock-token-"));
        assert_eq!(grant.username, "customer-9876543210");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_other_codes() {
        let registry = SimulatedRegistry::instant().with_accepted_otp("9999");

        let err = registry.authenticate(&phone(), "1234", 1).await.unwrap_err();
        assert!(matches!(err, Error::RemoteRejected(_)));

        registry
            .authenticate(&phone(), "9999", 1)
            .await
            .expect("configured code should verify");
    }

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let registry = SimulatedRegistry::instant();

        registry.send_otp(&phone()).await.unwrap();
        registry.authenticate(&phone(), "1234", 1).await.unwrap();

        assert_eq!(
            registry.calls(),
            vec![
                SimulatedCall::SendOtp("9876543210".into()),
                SimulatedCall::Authenticate("9876543210".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_grant() {
        let registry = SimulatedRegistry::instant();

        let first = registry.authenticate(&phone(), "1234", 1).await.unwrap();
        let second = registry.authenticate(&phone(), "1234", 1).await.unwrap();
        assert_ne!(first.token, second.token);
    }
}
