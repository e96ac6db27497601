//! Error types for Mlah

use thiserror::Error;

/// Result type alias using Mlah's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Broad error classes, grouped by how callers react to them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any remote call
    Validation,
    /// Operation invoked while a required entity or session state is absent
    Precondition,
    /// A referenced entity does not exist
    NotFound,
    /// The registry boundary failed or rejected the request
    Remote,
    /// Local persistence failed
    Storage,
    /// The OS credential store failed
    Credential,
    /// Configuration problem
    Config,
    /// Anything else
    Other,
}

/// Mlah error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Invalid phone number '{0}'. Expected exactly 10 digits.")]
    InvalidPhone(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Precondition errors
    #[error("'{0}' is not allowed while the session is {1}")]
    InvalidSessionState(&'static str, &'static str),

    #[error("Phone number does not match the one that requested the OTP")]
    PhoneMismatch,

    #[error("No {0} profile exists yet. Create a profile first.")]
    NoProfile(&'static str),

    #[error("No stored credential. Sign in before submitting.")]
    MissingCredential,

    // Lookup errors
    #[error("{0} not found")]
    NotFound(String),

    // Remote boundary errors
    #[error("Registry rejected the request: {0}")]
    RemoteRejected(String),

    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Credential store errors
    #[error("Credential store error: {0}")]
    Credential(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Classify this error into the taxonomy callers dispatch on
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPhone(_) | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::InvalidSessionState(..)
            | Self::PhoneMismatch
            | Self::NoProfile(_)
            | Self::MissingCredential => ErrorKind::Precondition,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RemoteRejected(_) | Self::Network(_) => ErrorKind::Remote,
            Self::Database(_) | Self::Serialization(_) => ErrorKind::Storage,
            Self::Credential(_) => ErrorKind::Credential,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) | Self::Other(_) => ErrorKind::Other,
        }
    }

    /// True when retrying the same call can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Remote | ErrorKind::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::InvalidPhone("12".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            Error::InvalidSessionState("verify_otp", "anonymous").kind(),
            ErrorKind::Precondition
        );
        assert_eq!(Error::NoProfile("tourist").kind(), ErrorKind::Precondition);
        assert_eq!(Error::NotFound("Member 42".into()).kind(), ErrorKind::NotFound);
        assert_eq!(Error::RemoteRejected("denied".into()).kind(), ErrorKind::Remote);
        assert_eq!(Error::Credential("locked".into()).kind(), ErrorKind::Credential);
    }

    #[test]
    fn test_messages_mention_the_offending_value() {
        let err = Error::InvalidPhone("98765".into());
        assert!(err.to_string().contains("98765"));

        let err = Error::NoProfile("labour");
        assert!(err.to_string().contains("labour"));
    }

    #[test]
    fn test_retryable_classes() {
        assert!(Error::RemoteRejected("busy".into()).is_retryable());
        assert!(!Error::PhoneMismatch.is_retryable());
        assert!(!Error::InvalidPhone("x".into()).is_retryable());
    }
}
