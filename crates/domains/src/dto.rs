//! # Wire types
//!
//! JSON bodies exchanged between the services. Field names are camelCase on
//! the wire; optional fields are serialized as `null` when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claims::Claims;

/// `{"message": "..."}` body of every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

// ── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub reference_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsResponse {
    pub claims: Claims,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_reference_id: String,
    pub follower_reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub media_id: Option<String>,
    pub bio: Option<String>,
    pub follower_count: i64,
    pub is_following: bool,
    pub is_owner: bool,
    pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub id: String,
    pub username: String,
    pub media_id: Option<String>,
    pub follower_count: i64,
}

// ── Posts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub user_reference_id: String,
    #[serde(default)]
    pub media_id: Option<i64>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_reference_id: String,
    pub user_reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub media_id: Option<String>,
    pub caption: String,
    pub posted: DateTime<Utc>,
    pub username: String,
    pub likes: i64,
    pub has_user_liked: bool,
    pub is_author: bool,
}

/// A single post as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub media_id: Option<String>,
    pub posted: DateTime<Utc>,
    pub username: String,
    pub caption: String,
    pub likes: i64,
    pub has_liked: bool,
}

// ── Media ───────────────────────────────────────────────────────────────────

/// Media payload; `content` is standard base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaResponse {
    pub id: i64,
    pub reference_id: String,
}

// ── Auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    /// Unix timestamp, seconds.
    pub expires: i64,
}

// ── Gateway ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub reference_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileWithFeed {
    #[serde(flatten)]
    pub profile: Profile,
    pub feed: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreated {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_with_feed_flattens_the_profile() {
        let body = ProfileWithFeed {
            profile: Profile {
                user_id: "u1".into(),
                username: "jane".into(),
                media_id: None,
                bio: Some("hi".into()),
                follower_count: 2,
                is_following: false,
                is_owner: true,
                post_count: 0,
            },
            feed: vec![],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["isOwner"], true);
        assert_eq!(json["mediaId"], serde_json::Value::Null);
        assert_eq!(json["feed"], serde_json::json!([]));
    }

    #[test]
    fn create_post_request_media_id_is_optional() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"userReferenceId":"u","caption":"hello"}"#).unwrap();
        assert_eq!(req.media_id, None);
    }
}
