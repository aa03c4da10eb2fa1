//! Cover images attached to a draft before publishing.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Errors that can occur when accepting an uploaded image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The upload contained no bytes.
    #[error("image file is empty")]
    Empty,
    /// The upload is not an image.
    #[error("{0} is not an image type")]
    NotAnImage(String),
}

/// An image chosen in the editor, held in memory until the post is published.
///
/// Bytes serialize as base64 so a draft can be stored in a session record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    #[serde(with = "base64_bytes")]
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accept an uploaded file as a cover image.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty or its content type is not `image/*`.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let content_type = content_type.into();
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if !content_type.starts_with("image/") {
            return Err(ImageError::NotAnImage(content_type));
        }

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: empty uploads are rejected by [`ImageUpload::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A `data:` URL suitable for an `<img>` preview.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
