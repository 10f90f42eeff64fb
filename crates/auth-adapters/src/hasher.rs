//! # Argon2PasswordHasher
//!
//! Hashes to a PHC string (Argon2id, random salt). The PHC bytes are what the
//! `User` model base64-encodes and stores.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use domains::ports::PasswordHasher;
use domains::{DomainError, DomainResult};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::AuthError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HasherOptions {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub output_len: usize,
    /// Optional secret mixed into every hash.
    pub pepper: Option<SecretString>,
}

impl Default for HasherOptions {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
            output_len: Params::DEFAULT_OUTPUT_LEN,
            pepper: None,
        }
    }
}

pub struct Argon2PasswordHasher {
    params: Params,
    pepper: Option<SecretString>,
}

impl Argon2PasswordHasher {
    pub fn new(options: &HasherOptions) -> Result<Self, AuthError> {
        let params = Params::new(
            options.memory_kib,
            options.iterations,
            options.parallelism,
            Some(options.output_len),
        )
        .map_err(|err| AuthError::HasherOptions(err.to_string()))?;

        let hasher = Self { params, pepper: options.pepper.clone() };
        // Surface a bad pepper at startup rather than on the first request.
        hasher.argon2().map_err(|err| AuthError::HasherOptions(err.to_string()))?;

        Ok(hasher)
    }

    fn argon2(&self) -> Result<Argon2<'_>, argon2::Error> {
        match &self.pepper {
            Some(pepper) => Argon2::new_with_secret(
                pepper.expose_secret().as_bytes(),
                Algorithm::Argon2id,
                Version::V0x13,
                self.params.clone(),
            ),
            None => Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &[u8]) -> DomainResult<Vec<u8>> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.argon2().map_err(DomainError::internal)?;
        let hash = argon2.hash_password(password, &salt).map_err(DomainError::internal)?;

        Ok(hash.to_string().into_bytes())
    }

    fn verify(&self, password: &[u8], hash: &[u8]) -> bool {
        let Ok(hash) = std::str::from_utf8(hash) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };

        argon2.verify_password(password, &parsed).is_ok()
    }
}
