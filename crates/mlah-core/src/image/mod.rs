//! Image capture boundary
//!
//! Screens hand this layer local file URIs from the picker. The only thing
//! done with them here is encoding the bytes for transmission to the
//! registry; decoding or processing image content is out of scope.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Front/back pair of transmission-encoded identity document images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdProofImages {
    pub front: Option<String>,
    pub back: Option<String>,
}

impl IdProofImages {
    /// True when both sides were captured
    pub fn is_complete(&self) -> bool {
        self.front.is_some() && self.back.is_some()
    }
}

/// Encode raw image bytes for transmission
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Read a local image file and encode it for transmission
pub async fn encode_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(encode_bytes(&bytes))
}

/// Load an optional front/back document pair from local files
pub async fn encode_pair(front: Option<&Path>, back: Option<&Path>) -> Result<IdProofImages> {
    let front = match front {
        Some(path) => Some(encode_file(path).await?),
        None => None,
    };
    let back = match back {
        Some(path) => Some(encode_file(path).await?),
        None => None,
    };
    Ok(IdProofImages { front, back })
}
