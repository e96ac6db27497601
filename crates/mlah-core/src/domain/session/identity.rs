//! Session identity types and the authentication state machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A subscriber phone number: exactly ten ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a raw string, rejecting anything that is not ten digits
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() == 10 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Error::InvalidPhone(raw.to_string()))
        }
    }

    /// The digits as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Which registration flow the subscriber chose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Tourist,
    Labour,
}

impl UserType {
    /// Create from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tourist" => Some(Self::Tourist),
            "labour" => Some(Self::Labour),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tourist => "tourist",
            Self::Labour => "labour",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier assigned at verification time
    pub id: Uuid,

    /// The verified phone number
    pub phone: PhoneNumber,

    /// Display name reported by the registry
    pub name: Option<String>,

    pub email: Option<String>,

    /// Absent until the subscriber picks a registration flow
    pub user_type: Option<UserType>,

    /// Cleared once registration completes
    pub is_new_user: bool,
}

impl Identity {
    /// Create a freshly verified identity with no chosen flow
    pub fn new(phone: PhoneNumber, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone,
            name,
            email: None,
            user_type: None,
            is_new_user: true,
        }
    }
}

/// Authentication handshake state
///
/// `is_authenticated` in the classic sense is simply being in the
/// `Authenticated` variant; there is no way to hold an identity outside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SessionStage {
    /// No handshake in progress
    #[default]
    Anonymous,
    /// An OTP was dispatched to this phone and has not verified yet
    OtpPending { phone: PhoneNumber },
    /// Verification succeeded
    Authenticated { identity: Identity },
}

impl SessionStage {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::OtpPending { .. } => "otp_pending",
            Self::Authenticated { .. } => "authenticated",
        }
    }

    /// Check if verification has succeeded
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The phone waiting on verification, if any
    pub fn pending_phone(&self) -> Option<&PhoneNumber> {
        match self {
            Self::OtpPending { phone } => Some(phone),
            _ => None,
        }
    }

    /// The authenticated identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity } => Some(identity),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_parse_accepts_ten_digits() {
        let phone = PhoneNumber::parse("9876543210").expect("should parse");
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_phone_parse_rejects_bad_input() {
        for raw in ["", "12345", "98765432100", "98765x3210", "+919876543"] {
            let err = PhoneNumber::parse(raw).unwrap_err();
            assert!(matches!(err, Error::InvalidPhone(_)), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_user_type_from_str() {
        assert_eq!(UserType::from_str("tourist"), Some(UserType::Tourist));
        assert_eq!(UserType::from_str("LABOUR"), Some(UserType::Labour));
        assert_eq!(UserType::from_str("vendor"), None);
    }

    #[test]
    fn test_fresh_identity_has_no_flow_chosen() {
        let identity = Identity::new(PhoneNumber::parse("9876543210").unwrap(), Some("Asha".into()));
        assert!(identity.user_type.is_none());
        assert!(identity.is_new_user);
    }

    #[test]
    fn test_stage_helpers() {
        let phone = PhoneNumber::parse("9876543210").unwrap();

        let anonymous = SessionStage::Anonymous;
        assert!(!anonymous.is_authenticated());
        assert!(anonymous.pending_phone().is_none());

        let pending = SessionStage::OtpPending { phone: phone.clone() };
        assert_eq!(pending.pending_phone(), Some(&phone));
        assert!(!pending.is_authenticated());

        let authenticated = SessionStage::Authenticated {
            identity: Identity::new(phone, None),
        };
        assert!(authenticated.is_authenticated());
        assert!(authenticated.identity().is_some());
    }

    #[test]
    fn test_stage_serializes_with_tag() {
        let stage = SessionStage::OtpPending {
            phone: PhoneNumber::parse("9876543210").unwrap(),
        };
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(json["stage"], "otp_pending");
        assert_eq!(json["phone"], "9876543210");

        let back: SessionStage = serde_json::from_value(json).unwrap();
        assert_eq!(back, stage);
    }
}
