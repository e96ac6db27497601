//! Card issuance, renewal arithmetic, and the export artifact

use chrono::{Months, NaiveDate};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

use super::profile::LabourProfile;
use crate::domain::session::PhoneNumber;

/// Literal prefix carried by every issued card number
pub const CARD_NUMBER_PREFIX: &str = "LC-";

/// Cards are valid for one year from issue or renewal
const CARD_VALIDITY_MONTHS: u32 = 12;

/// Card lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Expired,
    #[default]
    Pending,
}

impl CardStatus {
    /// Create from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expiry date for a card issued or renewed on `today`
pub fn expiry_one_year_from(today: NaiveDate) -> NaiveDate {
    today + Months::new(CARD_VALIDITY_MONTHS)
}

/// Generator for card numbers
///
/// Numbers are a prefix plus six random digits. Collisions are not checked;
/// the numbers are only displayed locally, not globally unique.
pub struct CardIssuer {
    rng: Mutex<StdRng>,
}

impl CardIssuer {
    /// Create an issuer seeded from entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a deterministic issuer (useful for testing)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw a fresh card number
    pub fn issue_number(&self) -> String {
        let digits: u32 = self.rng.lock().unwrap().gen_range(100_000..1_000_000);
        format!("{}{}", CARD_NUMBER_PREFIX, digits)
    }
}

impl Default for CardIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CardIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardIssuer").finish()
    }
}

/// The artifact handed to the external rendering boundary when the card is
/// downloaded. Built from the current profile; producing it mutates nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDocument {
    pub card_number: Option<String>,
    pub holder_name: String,
    pub phone: PhoneNumber,
    pub skills: Option<String>,
    pub status: CardStatus,
    pub expiry: Option<NaiveDate>,
    pub photo: Option<String>,
}

impl CardDocument {
    /// Assemble the export artifact from the profile's current fields
    pub fn from_profile(profile: &LabourProfile) -> Self {
        Self {
            card_number: profile.card_number.clone(),
            holder_name: profile.name.clone(),
            phone: profile.phone.clone(),
            skills: profile.skills.clone(),
            status: profile.card_status,
            expiry: profile.card_expiry,
            photo: profile.profile_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_status_from_str() {
        assert_eq!(CardStatus::from_str("active"), Some(CardStatus::Active));
        assert_eq!(CardStatus::from_str("EXPIRED"), Some(CardStatus::Expired));
        assert_eq!(CardStatus::from_str("void"), None);
    }

    #[test]
    fn test_issued_numbers_have_prefix_and_six_digits() {
        let issuer = CardIssuer::seeded(7);
        for _ in 0..100 {
            let number = issuer.issue_number();
            let digits = number.strip_prefix(CARD_NUMBER_PREFIX).expect("prefix");
            assert_eq!(digits.len(), 6);
            assert!(digits.bytes().all(|b| b.is_ascii_digit()));
            // Six digits means no leading zero from the range
            assert!(!digits.starts_with('0'));
        }
    }

    #[test]
    fn test_seeded_issuer_is_deterministic() {
        let a = CardIssuer::seeded(42);
        let b = CardIssuer::seeded(42);
        assert_eq!(a.issue_number(), b.issue_number());
        assert_eq!(a.issue_number(), b.issue_number());
    }

    #[test]
    fn test_expiry_is_one_year_out() {
        let issued = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            expiry_one_year_from(issued),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
        );

        // Leap day clamps to the last day of February
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            expiry_one_year_from(leap),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
