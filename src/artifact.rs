//! Self-contained encoded-image values.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Encoding carried by an [`ImageArtifact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    /// Lossy encoding used for camera captures.
    Jpeg,
    /// Lossless encoding used for signatures.
    Png,
}

impl ImageMime {
    /// The MIME type string.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "image/jpeg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            _ => None,
        }
    }
}

/// A complete encoded image carried inline: MIME type plus base64 payload.
///
/// The canonical text form is the `data:<mime>;base64,<payload>` URL, so the
/// value embeds directly wherever the document is rendered or exported, with
/// no separate file reference. Serialization uses that form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    mime: ImageMime,
    data: String,
}

impl ImageArtifact {
    /// Wraps already-encoded image bytes.
    pub fn from_encoded_bytes(mime: ImageMime, bytes: &[u8]) -> Self {
        Self {
            mime,
            data: STANDARD.encode(bytes),
        }
    }

    /// Wraps encoded JPEG bytes.
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self::from_encoded_bytes(ImageMime::Jpeg, bytes)
    }

    /// Wraps encoded PNG bytes.
    pub fn png(bytes: &[u8]) -> Self {
        Self::from_encoded_bytes(ImageMime::Png, bytes)
    }

    /// The embedded MIME type.
    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// The base64 payload without the `data:` prefix.
    pub fn base64(&self) -> &str {
        &self.data
    }

    /// The canonical `data:<mime>;base64,<payload>` form.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime.as_str(), self.data)
    }

    /// Parses a `data:` URL with a supported MIME type.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime, data) = rest.split_once(";base64,")?;
        Some(Self {
            mime: ImageMime::parse(mime)?,
            data: data.to_string(),
        })
    }

    /// Decodes the payload back to raw encoded-image bytes.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data).ok()
    }
}

impl fmt::Display for ImageArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime.as_str(), self.data)
    }
}

impl Serialize for ImageArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for ImageArtifact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        ImageArtifact::from_data_url(&url)
            .ok_or_else(|| de::Error::custom("expected a data:image/...;base64 URL"))
    }
}
