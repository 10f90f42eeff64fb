//! # UserService
//!
//! Registration, credential checks, follow management and profile reads for
//! the users process.

use std::sync::Arc;

use domains::claims::Claims;
use domains::dto::{CreateUserResponse, Credentials, FollowRequest, Info, Profile};
use domains::models::User;
use domains::password::PasswordPolicy;
use domains::ports::{FollowerRepository, PasswordHasher, UserProvider, UserRepository};
use domains::{DomainError, DomainResult};

pub const USER_NOT_FOUND: &str = "user not found";
pub const FOLLOWER_NOT_FOUND: &str = "follower not found";
pub const PROFILE_NOT_FOUND: &str = "profile not found";

pub struct UserService {
    users: Arc<dyn UserRepository>,
    followers: Arc<dyn FollowerRepository>,
    provider: Arc<dyn UserProvider>,
    hasher: Arc<dyn PasswordHasher>,
    policy: PasswordPolicy,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        followers: Arc<dyn FollowerRepository>,
        provider: Arc<dyn UserProvider>,
        hasher: Arc<dyn PasswordHasher>,
        policy: PasswordPolicy,
    ) -> Self {
        Self { users, followers, provider, hasher, policy }
    }

    pub async fn create_user(&self, request: &Credentials) -> DomainResult<CreateUserResponse> {
        let user = User::new(&request.username, &request.password, &self.policy, self.hasher.as_ref())?;

        if self.users.does_username_exist(user.username()).await? {
            return Err(DomainError::validation(format!(
                "the username '{}' is taken",
                user.username()
            )));
        }

        let user = self.users.create(&user).await?;
        tracing::info!(reference_id = %user.reference_id, "user created");

        Ok(CreateUserResponse {
            reference_id: user.reference_id.clone(),
            username: user.username().to_owned(),
        })
    }

    /// Checks the credentials and returns the claims a token is issued for.
    pub async fn get_claims(&self, request: &Credentials) -> DomainResult<Claims> {
        let user = self
            .users
            .get_by_username(&request.username.to_lowercase())
            .await?
            .ok_or_else(|| DomainError::validation(USER_NOT_FOUND))?;

        user.verify_password(&request.password, self.hasher.as_ref())?;

        Ok(Claims::for_user(&user.reference_id, user.username()))
    }

    pub async fn get_id_by_reference(&self, reference_id: &str) -> DomainResult<i64> {
        self.users
            .get_id_by_reference(reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    pub async fn follow(&self, request: &FollowRequest) -> DomainResult<()> {
        let user = self.load_for_follower(request).await?;
        user.can_follow()?;

        let written = self.followers.create(user.id, &request.follower_reference_id).await?;
        if written < 1 {
            return Err(DomainError::not_found(FOLLOWER_NOT_FOUND));
        }

        Ok(())
    }

    pub async fn unfollow(&self, request: &FollowRequest) -> DomainResult<()> {
        let user = self.load_for_follower(request).await?;
        user.can_unfollow()?;

        let removed = self.followers.delete(user.id, &request.follower_reference_id).await?;
        if removed < 1 {
            return Err(DomainError::not_found(FOLLOWER_NOT_FOUND));
        }

        Ok(())
    }

    async fn load_for_follower(&self, request: &FollowRequest) -> DomainResult<User> {
        self.users
            .get_by_reference(&request.user_reference_id, &request.follower_reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    pub async fn get_profile(&self, username: &str, viewer_reference_id: &str) -> DomainResult<Profile> {
        self.provider
            .get_profile(username, viewer_reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROFILE_NOT_FOUND))
    }

    pub async fn get_info(&self, reference_id: &str) -> DomainResult<Info> {
        self.provider
            .get_info(reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROFILE_NOT_FOUND))
    }
}
