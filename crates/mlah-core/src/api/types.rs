//! Wire types for the registry API
//!
//! Field names mirror the service's JSON contract, which is camelCase
//! throughout. Image fields carry transmission-encoded payload strings
//! produced by the image boundary.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::labour::LabourProfile;
use crate::domain::tourist::TouristProfile;

/// Body of the verification call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub mobile_number: String,
    pub otp: String,
    pub customer_type: i32,
}

/// Envelope the verification endpoint wraps its payload in
#[derive(Debug, Deserialize)]
pub(crate) struct AuthEnvelope {
    pub data: AuthGrant,
}

/// Successful verification: a display name plus the bearer credential to be
/// attached to subsequent writes
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    pub username: String,
    pub token: String,
}

/// Error body some endpoints return on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// One element of the customer submission batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub parent_customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_no: String,
    pub customer_images: String,
    pub document_front: String,
    pub document_back: String,
    pub gender: String,
    pub dob: String,
    pub permanent_address: String,
}

impl CustomerRecord {
    /// Build a submission record from a tourist profile
    pub fn from_profile(profile: &TouristProfile) -> Self {
        let (first_name, last_name) = split_name(&profile.name);
        let (document_front, document_back) = document_pair(profile.id_proof_images.as_ref());

        Self {
            parent_customer_id: 0,
            first_name,
            last_name,
            email: profile.email.clone().unwrap_or_default(),
            contact_no: profile.phone.as_str().to_string(),
            customer_images: profile.profile_image.clone().unwrap_or_default(),
            document_front,
            document_back,
            gender: String::new(),
            dob: String::new(),
            permanent_address: profile.address.clone().unwrap_or_default(),
        }
    }
}

/// Labour submission record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabourRecord {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender: String,
    pub dob: String,
    pub permanent_address: String,
    pub current_address: String,
    pub contact_number: String,
    pub photo: String,
    pub document_front: String,
    pub document_back: String,
    pub created_at: String,
}

impl LabourRecord {
    /// Build a submission record from a labour profile
    pub fn from_profile(profile: &LabourProfile) -> Self {
        let (first_name, last_name) = split_name(&profile.name);
        let (document_front, document_back) = document_pair(profile.id_proof_images.as_ref());
        let address = profile.address.clone().unwrap_or_default();

        Self {
            first_name,
            middle_name: String::new(),
            last_name,
            gender: String::new(),
            dob: String::new(),
            permanent_address: address.clone(),
            current_address: address,
            contact_number: profile.phone.as_str().to_string(),
            photo: profile.profile_image.clone().unwrap_or_default(),
            document_front,
            document_back,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Split a display name into the first/last pair the service expects
fn split_name(name: &str) -> (String, String) {
    let mut parts = name.trim().splitn(2, ' ');
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().unwrap_or_default().trim().to_string();
    (first, last)
}

fn document_pair(images: Option<&crate::image::IdProofImages>) -> (String, String) {
    match images {
        Some(pair) => (
            pair.front.clone().unwrap_or_default(),
            pair.back.clone().unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    }
}
