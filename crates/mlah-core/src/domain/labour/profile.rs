//! Labour profile entity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::CardStatus;
use crate::domain::session::PhoneNumber;
use crate::image::IdProofImages;

/// The registered labourer and their card
///
/// At most one exists per store; creating another replaces it wholesale.
/// Card fields are assigned only by the card operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabourProfile {
    /// Unique identifier assigned at creation
    pub id: Uuid,

    pub name: String,

    /// Copied by value from the session at creation time
    pub phone: PhoneNumber,

    pub address: Option<String>,
    pub id_proof: Option<String>,

    /// Transmission-encoded portrait, if captured
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,

    /// Free-text trade description
    pub skills: Option<String>,

    pub card_number: Option<String>,
    pub card_status: CardStatus,
    pub card_expiry: Option<NaiveDate>,
}

/// Fields the caller supplies when registering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabourProfileDraft {
    pub name: String,
    pub phone: PhoneNumber,
    pub address: Option<String>,
    pub id_proof: Option<String>,
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,
    pub skills: Option<String>,
}

/// Shallow patch: set fields overwrite, absent fields are kept. Card fields
/// are deliberately not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabourProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub address: Option<String>,
    pub id_proof: Option<String>,
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,
    pub skills: Option<String>,
}

impl LabourProfile {
    /// Create a profile with a fresh identifier and an active card
    pub fn new(draft: LabourProfileDraft, card_number: String, card_expiry: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
            id_proof: draft.id_proof,
            profile_image: draft.profile_image,
            id_proof_images: draft.id_proof_images,
            skills: draft.skills,
            card_number: Some(card_number),
            card_status: CardStatus::Active,
            card_expiry: Some(card_expiry),
        }
    }

    /// Merge a patch into the profile
    pub fn apply(&mut self, patch: LabourProfileUpdate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(id_proof) = patch.id_proof {
            self.id_proof = Some(id_proof);
        }
        if let Some(profile_image) = patch.profile_image {
            self.profile_image = Some(profile_image);
        }
        if let Some(id_proof_images) = patch.id_proof_images {
            self.id_proof_images = Some(id_proof_images);
        }
        if let Some(skills) = patch.skills {
            self.skills = Some(skills);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

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

    #[test]
    fn test_new_profile_carries_an_active_card() {
        let expiry = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let profile = LabourProfile::new(draft(), "LC-123456".into(), expiry);

        assert_eq!(profile.card_number.as_deref(), Some("LC-123456"));
        assert_eq!(profile.card_status, CardStatus::Active);
        assert_eq!(profile.card_expiry, Some(expiry));
    }

    #[test]
    fn test_apply_cannot_touch_card_fields() {
        let expiry = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut profile = LabourProfile::new(draft(), "LC-123456".into(), expiry);

        profile.apply(LabourProfileUpdate {
            skills: Some("carpenter".into()),
            ..Default::default()
        });

        assert_eq!(profile.skills.as_deref(), Some("carpenter"));
        assert_eq!(profile.card_number.as_deref(), Some("LC-123456"));
        assert_eq!(profile.address.as_deref(), Some("Sector 9"));
    }
}
