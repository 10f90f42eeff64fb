//! # Media

use crate::{DomainError, DomainResult};

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub id: i64,
    pub reference_id: String,
    content_type: String,
}

impl Media {
    pub fn new(content_type: &str) -> DomainResult<Self> {
        let content_type = content_type.to_lowercase();
        if content_type.is_empty() {
            return Err(DomainError::validation("contentType is a required field"));
        }

        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(DomainError::validation(format!(
                "the content type '{content_type}' is not allowed"
            )));
        }

        Ok(Self { id: 0, reference_id: String::new(), content_type })
    }

    pub fn from_parts(id: i64, reference_id: String, content_type: String) -> Self {
        Self { id, reference_id, content_type }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Key the media bytes are stored under in the object store.
    pub fn object_key(&self) -> &str {
        &self.reference_id
    }
}
