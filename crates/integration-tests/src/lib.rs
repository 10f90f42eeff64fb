//! # integration-tests
//!
//! Support for the cross-service tests: an in-memory store that stands in for
//! postgres behind every repository port, and a helper that serves a router
//! on an ephemeral local port.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use domains::dto::{FeedItem, Info, PostView, Profile};
use domains::models::{Media, Post, User};
use domains::ports::{
    FollowerRepository, LikeRepository, MediaRepository, PendingWrite, PostProvider, PostRepository, UserProvider,
    UserRepository,
};
use domains::DomainResult;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Serves `router` on `127.0.0.1:0` and returns its base url.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    format!("http://{addr}")
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    /// (followed user id, follower reference id)
    follows: HashSet<(i64, String)>,
    posts: Vec<Post>,
    /// (post id, user reference id)
    likes: HashSet<(i64, String)>,
    media: Vec<Media>,
}

impl State {
    fn user_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn user_by_reference(&self, reference_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.reference_id == reference_id)
    }

    fn follower_count(&self, user_id: i64) -> i64 {
        self.follows.iter().filter(|(followed, _)| *followed == user_id).count() as i64
    }

    fn like_count(&self, post_id: i64) -> i64 {
        self.likes.iter().filter(|(post, _)| *post == post_id).count() as i64
    }

    fn media_reference(&self, media_id: Option<i64>) -> Option<String> {
        let id = media_id?;
        self.media.iter().find(|media| media.id == id).map(|media| media.reference_id.clone())
    }

    fn feed_item(&self, post: &Post, viewer: &str) -> FeedItem {
        let author = self.user_by_id(post.user_id);
        FeedItem {
            id: post.reference_id.clone(),
            media_id: self.media_reference(post.media_id),
            caption: post.caption().to_owned(),
            posted: post.posted,
            username: author.map(|user| user.username().to_owned()).unwrap_or_default(),
            likes: self.like_count(post.id),
            has_user_liked: self.likes.contains(&(post.id, viewer.to_owned())),
            is_author: author.is_some_and(|user| user.reference_id == viewer),
        }
    }
}

/// One shared state behind every repository port, like a single database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn media_count(&self) -> usize {
        self.lock().media.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> DomainResult<User> {
        let mut state = self.lock();
        let stored = User::from_parts(
            state.users.len() as i64 + 1,
            Uuid::new_v4().to_string(),
            user.username().to_owned(),
            user.password_hash().to_owned(),
            false,
        );
        state.users.push(stored.clone());
        Ok(stored)
    }

    async fn does_username_exist(&self, username: &str) -> DomainResult<bool> {
        Ok(self.lock().users.iter().any(|user| user.username() == username))
    }

    async fn get_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.lock().users.iter().find(|user| user.username() == username).cloned())
    }

    async fn get_by_reference(&self, reference_id: &str, viewer_reference_id: &str) -> DomainResult<Option<User>> {
        let state = self.lock();
        Ok(state.user_by_reference(reference_id).map(|user| {
            let mut user = user.clone();
            user.is_following = state.follows.contains(&(user.id, viewer_reference_id.to_owned()));
            user
        }))
    }

    async fn get_id_by_reference(&self, reference_id: &str) -> DomainResult<Option<i64>> {
        Ok(self.lock().user_by_reference(reference_id).map(|user| user.id))
    }
}

#[async_trait]
impl FollowerRepository for MemoryStore {
    async fn create(&self, user_id: i64, follower_reference_id: &str) -> DomainResult<u64> {
        let inserted = self.lock().follows.insert((user_id, follower_reference_id.to_owned()));
        Ok(u64::from(inserted))
    }

    async fn delete(&self, user_id: i64, follower_reference_id: &str) -> DomainResult<u64> {
        let removed = self.lock().follows.remove(&(user_id, follower_reference_id.to_owned()));
        Ok(u64::from(removed))
    }
}

#[async_trait]
impl UserProvider for MemoryStore {
    async fn get_profile(&self, username: &str, viewer_reference_id: &str) -> DomainResult<Option<Profile>> {
        let state = self.lock();
        let Some(user) = state.users.iter().find(|user| user.username() == username) else {
            return Ok(None);
        };

        Ok(Some(Profile {
            user_id: user.reference_id.clone(),
            username: user.username().to_owned(),
            media_id: None,
            bio: None,
            follower_count: state.follower_count(user.id),
            is_following: state.follows.contains(&(user.id, viewer_reference_id.to_owned())),
            is_owner: user.reference_id == viewer_reference_id,
            post_count: state.posts.iter().filter(|post| post.user_id == user.id).count() as i64,
        }))
    }

    async fn get_info(&self, reference_id: &str) -> DomainResult<Option<Info>> {
        let state = self.lock();
        Ok(state.user_by_reference(reference_id).map(|user| Info {
            id: user.reference_id.clone(),
            username: user.username().to_owned(),
            media_id: None,
            follower_count: state.follower_count(user.id),
        }))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: &Post) -> DomainResult<Post> {
        let mut state = self.lock();
        let stored = Post::from_parts(
            state.posts.len() as i64 + 1,
            Uuid::new_v4().to_string(),
            post.user_id,
            post.media_id,
            Utc::now(),
            post.caption().to_owned(),
            0,
            false,
        );
        state.posts.push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, reference_id: &str, viewer_reference_id: &str) -> DomainResult<Option<Post>> {
        let state = self.lock();
        Ok(state.posts.iter().find(|post| post.reference_id == reference_id).map(|post| {
            let mut post = post.clone();
            post.like_count = state.like_count(post.id);
            post.has_user_liked = state.likes.contains(&(post.id, viewer_reference_id.to_owned()));
            post
        }))
    }

    async fn get_feed(&self, viewer_reference_id: &str) -> DomainResult<Vec<FeedItem>> {
        let state = self.lock();
        let Some(viewer) = state.user_by_reference(viewer_reference_id) else {
            return Ok(Vec::new());
        };

        Ok(state
            .posts
            .iter()
            .rev()
            .filter(|post| {
                post.user_id == viewer.id || state.follows.contains(&(post.user_id, viewer_reference_id.to_owned()))
            })
            .map(|post| state.feed_item(post, viewer_reference_id))
            .collect())
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn create(&self, post_id: i64, user_reference_id: &str) -> DomainResult<()> {
        self.lock().likes.insert((post_id, user_reference_id.to_owned()));
        Ok(())
    }

    async fn delete(&self, post_id: i64, user_reference_id: &str) -> DomainResult<()> {
        self.lock().likes.remove(&(post_id, user_reference_id.to_owned()));
        Ok(())
    }
}

#[async_trait]
impl PostProvider for MemoryStore {
    async fn get(&self, post_reference_id: &str, viewer_reference_id: &str) -> DomainResult<Option<PostView>> {
        let state = self.lock();
        Ok(state.posts.iter().find(|post| post.reference_id == post_reference_id).map(|post| {
            let item = state.feed_item(post, viewer_reference_id);
            PostView {
                id: item.id,
                media_id: item.media_id,
                posted: item.posted,
                username: item.username,
                caption: item.caption,
                likes: item.likes,
                has_liked: item.has_user_liked,
            }
        }))
    }

    async fn get_profile_feed(&self, username: &str, viewer_reference_id: Uuid) -> DomainResult<Vec<FeedItem>> {
        let state = self.lock();
        let viewer = viewer_reference_id.to_string();
        let Some(author) = state.users.iter().find(|user| user.username() == username) else {
            return Ok(Vec::new());
        };

        Ok(state
            .posts
            .iter()
            .rev()
            .filter(|post| post.user_id == author.id)
            .map(|post| state.feed_item(post, &viewer))
            .collect())
    }
}

#[async_trait]
impl MediaRepository for MemoryStore {
    async fn create(&self, media: &Media) -> DomainResult<(Media, PendingWrite)> {
        let stored = {
            let mut state = self.lock();
            let stored =
                Media::from_parts(state.media.len() as i64 + 1, Uuid::new_v4().to_string(), media.content_type().into());
            state.media.push(stored.clone());
            stored
        };

        let store = self.clone();
        let id = stored.id;
        let pending = PendingWrite::new(move |commit| async move {
            if !commit {
                store.lock().media.retain(|media| media.id != id);
            }
            Ok(())
        });

        Ok((stored, pending))
    }

    async fn get_content_type(&self, reference_id: &str) -> DomainResult<Option<String>> {
        Ok(self
            .lock()
            .media
            .iter()
            .find(|media| media.reference_id == reference_id)
            .map(|media| media.content_type().to_owned()))
    }
}
