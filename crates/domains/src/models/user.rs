//! # User
//!
//! Construction validates the username and password before any identifier
//! exists; `id` and `reference_id` are assigned by the store afterwards.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::password::PasswordPolicy;
use crate::ports::PasswordHasher;
use crate::{DomainError, DomainResult};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;

pub const INVALID_PASSWORD: &str = "password is invalid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub reference_id: String,
    username: String,
    password_hash: String,
    /// Whether the viewer the user was loaded for follows them.
    pub is_following: bool,
}

impl User {
    /// Validates the username, checks the password against `policy` and
    /// keeps only its hash.
    pub fn new(
        username: &str,
        password: &str,
        policy: &PasswordPolicy,
        hasher: &dyn PasswordHasher,
    ) -> DomainResult<Self> {
        let username = username.to_lowercase();
        validate_username(&username)?;
        policy.validate(password)?;

        let hash = hasher.hash(password.as_bytes())?;

        Ok(Self {
            id: 0,
            reference_id: String::new(),
            username,
            password_hash: STANDARD.encode(hash),
            is_following: false,
        })
    }

    /// Rebuilds a user loaded from the store.
    pub fn from_parts(
        id: i64,
        reference_id: String,
        username: String,
        password_hash: String,
        is_following: bool,
    ) -> Self {
        Self { id, reference_id, username, password_hash, is_following }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Base64 of the hasher output.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn verify_password(&self, password: &str, hasher: &dyn PasswordHasher) -> DomainResult<()> {
        let verified = STANDARD
            .decode(&self.password_hash)
            .is_ok_and(|hash| hasher.verify(password.as_bytes(), &hash));
        if !verified {
            return Err(DomainError::validation(INVALID_PASSWORD));
        }

        Ok(())
    }

    pub fn can_follow(&self) -> DomainResult<()> {
        if self.is_following {
            return Err(DomainError::conflict("user is already following this user"));
        }
        Ok(())
    }

    pub fn can_unfollow(&self) -> DomainResult<()> {
        if !self.is_following {
            return Err(DomainError::conflict("user is not following this user"));
        }
        Ok(())
    }
}

/// Expects an already lowercased username.
pub fn validate_username(username: &str) -> DomainResult<()> {
    let length = username.chars().count();
    if length == 0 {
        return Err(DomainError::validation("username is a required field"));
    }

    if length < MIN_USERNAME_LENGTH {
        return Err(DomainError::validation(format!(
            "username must be greater than {MIN_USERNAME_LENGTH} characters long"
        )));
    }

    if length > MAX_USERNAME_LENGTH {
        return Err(DomainError::validation(format!(
            "username cannot be greater than {MAX_USERNAME_LENGTH} characters long"
        )));
    }

    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.');
    if !username.chars().all(allowed) {
        return Err(DomainError::validation(
            "username must only contain alphanumerics, hyphens, underscores and periods",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockPasswordHasher;

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|pwd| Ok([b"hashed:".as_slice(), pwd].concat()));
        hasher
            .expect_verify()
            .returning(|pwd, hash| hash == [b"hashed:".as_slice(), pwd].concat().as_slice());
        hasher
    }

    #[test]
    fn new_lowercases_and_hashes() {
        let user = User::new("Jane.Doe", "secret", &PasswordPolicy::permissive(), &hasher()).unwrap();
        assert_eq!(user.username(), "jane.doe");
        assert_eq!(user.password_hash(), STANDARD.encode(b"hashed:secret"));
        assert_eq!(user.id, 0);
        assert!(user.reference_id.is_empty());
    }

    #[test]
    fn username_rules_fail_in_order() {
        let msg = |name: &str| validate_username(name).unwrap_err().to_string();
        assert_eq!(msg(""), "username is a required field");
        assert_eq!(msg("ab"), "username must be greater than 3 characters long");
        assert_eq!(msg("abcdefghijklmnopqrstu"), "username cannot be greater than 20 characters long");
        assert_eq!(
            msg("jane doe"),
            "username must only contain alphanumerics, hyphens, underscores and periods"
        );
    }

    #[test]
    fn username_bounds_are_inclusive() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("abcdefghijklmnopqrst").is_ok());
        assert!(validate_username("a-b_c.9").is_ok());
    }

    #[test]
    fn username_length_counts_characters() {
        let err = validate_username("éé").unwrap_err();
        assert_eq!(err.to_string(), "username must be greater than 3 characters long");
    }

    #[test]
    fn password_policy_runs_after_username() {
        let err = User::new("jane", "", &PasswordPolicy::permissive(), &hasher()).unwrap_err();
        assert_eq!(err, DomainError::validation("password is required"));
    }

    #[test]
    fn verify_password_rejects_a_mismatch() {
        let hasher = hasher();
        let user = User::new("jane", "secret", &PasswordPolicy::permissive(), &hasher).unwrap();
        assert!(user.verify_password("secret", &hasher).is_ok());
        assert_eq!(
            user.verify_password("nope", &hasher).unwrap_err().to_string(),
            INVALID_PASSWORD
        );
    }

    #[test]
    fn verify_password_hides_a_corrupt_stored_hash() {
        let user = User::from_parts(1, "ref".into(), "jane".into(), "not base64!".into(), false);
        let err = user.verify_password("secret", &MockPasswordHasher::new()).unwrap_err();
        assert_eq!(err, DomainError::validation(INVALID_PASSWORD));
    }

    #[test]
    fn follow_guards_read_is_following() {
        let mut user = User::from_parts(1, "ref".into(), "jane".into(), String::new(), false);
        assert!(user.can_follow().is_ok());
        assert_eq!(user.can_unfollow().unwrap_err().to_string(), "user is not following this user");

        user.is_following = true;
        assert_eq!(user.can_follow().unwrap_err().status(), 400);
        assert!(user.can_unfollow().is_ok());
    }
}
