//! Profile resources exchanged with the backend.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The server's view of the signed-in user's profile.
///
/// Only the fields the wizard reads are typed; everything else is kept in
/// [`ProfileState::fields`] so it can be handed on unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    #[serde(default, alias = "profile_photo", alias = "avatar")]
    pub profile_picture_url: Option<String>,

    #[serde(default)]
    pub profile_completed: bool,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ProfileState {
    /// The current avatar URL, ignoring empty strings.
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile_picture_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Either a bare profile or one wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileEnvelope {
    Wrapped { data: ProfileState },
    Bare(ProfileState),
}

impl ProfileEnvelope {
    pub(crate) fn into_inner(self) -> ProfileState {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(profile) => profile,
        }
    }
}

/// A profile photo on its way to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoUpload {
    /// Raw bytes sent as the `photo` part of a multipart form.
    Multipart {
        bytes: Vec<u8>,
        file_name: String,
        mime_type: String,
    },
    /// Base64 text sent as JSON `{"photo": ..., "type": ...}`.
    Base64 { data: String, mime_type: String },
}

impl PhotoUpload {
    pub fn multipart(
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::Multipart {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode `bytes` with the standard base64 alphabet.
    pub fn base64(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::Base64 {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Self::Multipart { mime_type, .. } | Self::Base64 { mime_type, .. } => mime_type,
        }
    }

    /// Size of the encoded content in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Multipart { bytes, .. } => bytes.len(),
            Self::Base64 { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
