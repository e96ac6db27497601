//! HTTP registry client
//!
//! Thin reqwest wrapper over the registry endpoints. Bearer credentials are
//! supplied by the caller per request; the client itself holds no state
//! beyond the connection pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::domain::session::PhoneNumber;
use crate::error::{Error, Result};

use super::RegistryApi;
use super::types::{AuthEnvelope, AuthGrant, AuthRequest, CustomerRecord, ErrorBody, LabourRecord};

/// Registry API base URL
pub const MLAH_API_BASE_URL: &str = "https://m-lhamobile.azurewebsites.net/api";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the registry API
#[derive(Clone)]
pub struct RegistryClient {
    /// HTTP client for making requests
    http: HttpClient,
    /// Base URL for the API
    base_url: String,
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for creating a RegistryClient
pub struct RegistryClientBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for RegistryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
        }
    }

    /// Set the base URL (defaults to the hosted registry)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the RegistryClient
    pub fn build(self) -> Result<RegistryClient> {
        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Network)?;

        Ok(RegistryClient {
            http,
            base_url: self
                .base_url
                .unwrap_or_else(|| MLAH_API_BASE_URL.to_string()),
        })
    }
}

impl RegistryClient {
    /// Create a client against the hosted registry with defaults
    pub fn new() -> Result<Self> {
        RegistryClientBuilder::new().build()
    }

    /// Create a new builder for RegistryClient
    pub fn builder() -> RegistryClientBuilder {
        RegistryClientBuilder::new()
    }

    /// Create a client from the API section of the configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        RegistryClientBuilder::new()
            .base_url(config.base_url.clone())
            .timeout_secs(config.timeout_secs)
            .build()
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-2xx response to a remote error, passing the service's
    /// message through when it sends one
    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("HTTP {}", status));

        warn!(status = %status, message = %message, "Registry request failed");
        Err(Error::RemoteRejected(message))
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn send_otp(&self, phone: &PhoneNumber) -> Result<()> {
        let url = format!("{}/Customer/SendOTP", self.base_url);
        debug!(phone = %phone, "Dispatching OTP");

        let response = self
            .http
            .post(&url)
            .query(&[("mobileNumber", phone.as_str())])
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn authenticate(
        &self,
        phone: &PhoneNumber,
        otp: &str,
        customer_type: i32,
    ) -> Result<AuthGrant> {
        let url = format!("{}/Customer/AuthenticateCustomer", self.base_url);
        debug!(phone = %phone, "Verifying OTP");

        let request = AuthRequest {
            mobile_number: phone.as_str().to_string(),
            otp: otp.to_string(),
            customer_type,
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let response = Self::ensure_success(response).await?;

        let envelope: AuthEnvelope = response
            .json()
            .await
            .map_err(|e| Error::RemoteRejected(format!("Malformed verification response: {}", e)))?;

        Ok(envelope.data)
    }

    async fn create_customer(&self, token: &str, records: &[CustomerRecord]) -> Result<()> {
        let url = format!("{}/Customer/CreateCustomer", self.base_url);
        debug!(records = records.len(), "Submitting customer records");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(records)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn create_labour(&self, token: &str, record: &LabourRecord) -> Result<()> {
        let url = format!("{}/Labour/CreateLabour", self.base_url);
        debug!("Submitting labour record");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(record)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = RegistryClient::new().expect("client should build");
        assert_eq!(client.base_url(), MLAH_API_BASE_URL);
    }

    #[test]
    fn test_builder_overrides() {
        let client = RegistryClient::builder()
            .base_url("http://localhost:9000/api")
            .timeout_secs(5)
            .build()
            .expect("client should build");
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig {
            base_url: "http://localhost:9000/api".to_string(),
            timeout_secs: 5,
            simulate: false,
            simulated_latency_ms: 0,
        };
        let client = RegistryClient::from_config(&config).expect("client should build");
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }
}
