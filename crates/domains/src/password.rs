//! # Password policy
//!
//! Configurable strength rules applied to a plaintext password before it is
//! hashed. Character classes are ASCII only; anything else counts as
//! non-alphanumeric.

use serde::Deserialize;

use crate::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub required_length: usize,
    pub require_non_alphanumeric: bool,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    /// Evaluated only when at least 1.
    pub required_unique_chars: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            required_length: 8,
            require_non_alphanumeric: true,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            required_unique_chars: 1,
        }
    }
}

impl PasswordPolicy {
    /// A policy with every rule switched off.
    pub fn permissive() -> Self {
        Self {
            required_length: 0,
            require_non_alphanumeric: false,
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            required_unique_chars: 0,
        }
    }

    /// Returns the message of the first rule the password breaks.
    pub fn validate(&self, password: &str) -> DomainResult<()> {
        let length = password.chars().count();
        if length == 0 {
            return Err(DomainError::validation("password is required"));
        }

        if length < self.required_length {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters long",
                self.required_length
            )));
        }

        if self.require_non_alphanumeric && password.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation("password requires an non-alphanumeric character"));
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation("password requires a digit"));
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(DomainError::validation("password requires a lowercase letter"));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::validation("password requires an uppercase letter"));
        }

        if self.required_unique_chars >= 1 {
            let mut seen: Vec<char> = Vec::with_capacity(length);
            for c in password.chars() {
                if !seen.contains(&c) {
                    seen.push(c);
                }
            }

            if seen.len() < self.required_unique_chars {
                return Err(DomainError::validation(format!(
                    "password requires at least {} unique characters",
                    self.required_unique_chars
                )));
            }
        }

        Ok(())
    }
}
