//! Tourist profile and family member entities

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::session::PhoneNumber;
use crate::image::IdProofImages;

/// The registered tourist
///
/// At most one exists per store; creating another replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristProfile {
    /// Unique identifier assigned at creation
    pub id: Uuid,

    pub name: String,
    pub email: Option<String>,

    /// Copied by value from the session at creation time
    pub phone: PhoneNumber,

    pub address: Option<String>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,

    /// Transmission-encoded portrait, if captured
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,

    /// Family members, in insertion order (display order)
    pub members: Vec<TouristMember>,
}

/// Fields the caller supplies when registering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristProfileDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: PhoneNumber,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,
}

/// Shallow patch: set fields overwrite, absent fields are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouristProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,
}

impl TouristProfile {
    /// Create a profile with a fresh identifier and no members
    pub fn new(draft: TouristProfileDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            nationality: draft.nationality,
            passport_number: draft.passport_number,
            profile_image: draft.profile_image,
            id_proof_images: draft.id_proof_images,
            members: Vec::new(),
        }
    }

    /// Merge a patch into the profile
    pub fn apply(&mut self, patch: TouristProfileUpdate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(nationality) = patch.nationality {
            self.nationality = Some(nationality);
        }
        if let Some(passport_number) = patch.passport_number {
            self.passport_number = Some(passport_number);
        }
        if let Some(profile_image) = patch.profile_image {
            self.profile_image = Some(profile_image);
        }
        if let Some(id_proof_images) = patch.id_proof_images {
            self.id_proof_images = Some(id_proof_images);
        }
    }

    /// Look up a member by id
    pub fn member(&self, id: Uuid) -> Option<&TouristMember> {
        self.members.iter().find(|m| m.id == id)
    }
}

/// A family member travelling with the tourist
///
/// Owned exclusively by the profile; created and removed only through the
/// profile's member operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristMember {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub relation: String,
    pub id_proof: Option<String>,
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,
}

/// Fields the caller supplies when adding a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristMemberDraft {
    pub name: String,
    pub age: u32,
    pub relation: String,
    pub id_proof: Option<String>,
    pub profile_image: Option<String>,
    pub id_proof_images: Option<IdProofImages>,
}

impl TouristMember {
    /// Create a member with a fresh identifier
    pub fn new(draft: TouristMemberDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            age: draft.age,
            relation: draft.relation,
            id_proof: draft.id_proof,
            profile_image: draft.profile_image,
            id_proof_images: draft.id_proof_images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TouristProfileDraft {
        TouristProfileDraft {
            name: "Asha Verma".into(),
            email: Some("asha@example.com".into()),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            address: None,
            nationality: Some("Indian".into()),
            passport_number: None,
            profile_image: None,
            id_proof_images: None,
        }
    }

    #[test]
    fn test_new_profile_starts_without_members() {
        let profile = TouristProfile::new(draft());
        assert!(profile.members.is_empty());
        assert_eq!(profile.name, "Asha Verma");
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut profile = TouristProfile::new(draft());
        let original_email = profile.email.clone();

        profile.apply(TouristProfileUpdate {
            address: Some("12 Lake Road".into()),
            ..Default::default()
        });

        assert_eq!(profile.address.as_deref(), Some("12 Lake Road"));
        assert_eq!(profile.email, original_email);
        assert_eq!(profile.nationality.as_deref(), Some("Indian"));
    }

    #[test]
    fn test_member_lookup() {
        let mut profile = TouristProfile::new(draft());
        let member = TouristMember::new(TouristMemberDraft {
            name: "Ravi".into(),
            age: 12,
            relation: "son".into(),
            id_proof: None,
            profile_image: None,
            id_proof_images: None,
        });
        let id = member.id;
        profile.members.push(member);

        assert_eq!(profile.member(id).unwrap().name, "Ravi");
        assert!(profile.member(Uuid::new_v4()).is_none());
    }
}
