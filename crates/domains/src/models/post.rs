//! # Post
//!
//! Per viewer a post is either liked or not; the guards below must pass before
//! any like is written or removed.

use chrono::{DateTime, Utc};

use crate::{DomainError, DomainResult};

pub const MAX_CAPTION_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub reference_id: String,
    pub user_id: i64,
    pub media_id: Option<i64>,
    pub posted: DateTime<Utc>,
    caption: String,
    pub like_count: i64,
    pub has_user_liked: bool,
}

impl Post {
    /// Trims the caption and stamps the post with the current time.
    pub fn new(user_id: i64, media_id: Option<i64>, caption: &str) -> DomainResult<Self> {
        let caption = caption.trim();
        validate_caption(caption)?;

        Ok(Self {
            id: 0,
            reference_id: String::new(),
            user_id,
            media_id,
            posted: Utc::now(),
            caption: caption.to_owned(),
            like_count: 0,
            has_user_liked: false,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: i64,
        reference_id: String,
        user_id: i64,
        media_id: Option<i64>,
        posted: DateTime<Utc>,
        caption: String,
        like_count: i64,
        has_user_liked: bool,
    ) -> Self {
        Self { id, reference_id, user_id, media_id, posted, caption, like_count, has_user_liked }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn can_like(&self) -> DomainResult<()> {
        if self.has_user_liked {
            return Err(DomainError::conflict("user has already liked this post"));
        }
        Ok(())
    }

    pub fn can_unlike(&self) -> DomainResult<()> {
        if !self.has_user_liked {
            return Err(DomainError::conflict("user has not liked this post"));
        }
        Ok(())
    }
}

fn validate_caption(caption: &str) -> DomainResult<()> {
    if caption.is_empty() {
        return Err(DomainError::validation("caption cannot be empty"));
    }

    if caption.chars().count() > MAX_CAPTION_LENGTH {
        return Err(DomainError::validation(format!(
            "caption cannot be greater than {MAX_CAPTION_LENGTH} characters long"
        )));
    }

    Ok(())
}
