use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers come from the backend as either JSON strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! backend_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

backend_id!(PhotoId);
backend_id!(SpeechId);

/// Distinguishes a plain image from a social-media embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    #[default]
    Image,
    Instagram,
    /// Any tag this client does not know; rendered as a plain image.
    #[serde(other)]
    Unknown,
}

/// A gallery entry as returned by `GET /images`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<PhotoKind>,
}

impl Photo {
    pub fn kind(&self) -> PhotoKind {
        self.kind.unwrap_or_default()
    }

    /// The image URL or embed permalink, if it is non-blank.
    pub fn reference(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// A message shown one at a time in the letter, as returned by `GET /speeches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speech {
    pub id: SpeechId,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub from: String,
}

impl Speech {
    /// Body text split on newlines, one entry per paragraph.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }
}

/// An image payload picked by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Keep the raw bytes out of logs.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// The multipart payload for `POST /images`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub created_by: String,
    pub caption: String,
    pub file: ImageFile,
}
