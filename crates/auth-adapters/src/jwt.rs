//! # JWT access tokens
//!
//! Tokens carry the string claims plus `exp`. The auth process signs with an
//! RSA private key; the gateway verifies with the matching public key. HS256
//! with a shared secret is available for tests and single-host setups.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domains::claims::Claims;
use domains::ports::{TokenSigner, TokenVerifier};
use domains::{DomainError, DomainResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

use crate::error::AuthError;

const EXPIRY_CLAIM: &str = "exp";

pub struct JwtSigner {
    header: Header,
    key: EncodingKey,
}

impl JwtSigner {
    pub fn rs256_pem(pem: &[u8]) -> Result<Self, AuthError> {
        Ok(Self { header: Header::new(Algorithm::RS256), key: EncodingKey::from_rsa_pem(pem)? })
    }

    pub fn hs256(secret: &[u8]) -> Self {
        Self { header: Header::new(Algorithm::HS256), key: EncodingKey::from_secret(secret) }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, claims: &Claims, expires: DateTime<Utc>) -> DomainResult<String> {
        let mut body: HashMap<&str, Value> =
            claims.iter().map(|(k, v)| (k.as_str(), Value::String(v.clone()))).collect();
        body.insert(EXPIRY_CLAIM, Value::from(expires.timestamp()));

        encode(&self.header, &body, &self.key).map_err(DomainError::internal)
    }
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn rs256_pem(pem: &[u8]) -> Result<Self, AuthError> {
        Ok(Self { key: DecodingKey::from_rsa_pem(pem)?, validation: Validation::new(Algorithm::RS256) })
    }

    pub fn hs256(secret: &[u8]) -> Self {
        Self { key: DecodingKey::from_secret(secret), validation: Validation::new(Algorithm::HS256) }
    }
}

impl TokenVerifier for JwtVerifier {
    /// Non-string claims, `exp` included, are dropped.
    fn verify(&self, token: &str) -> DomainResult<Claims> {
        let data = decode::<HashMap<String, Value>>(token, &self.key, &self.validation)
            .map_err(|err| DomainError::unauthorized(err.to_string()))?;

        Ok(data
            .claims
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(value) => Some((key, value)),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn verifies_what_it_signs() {
        let signer = JwtSigner::hs256(SECRET);
        let token = signer
            .sign(&Claims::for_user("ref", "jane"), Utc::now() + Duration::minutes(5))
            .unwrap();

        let claims = JwtVerifier::hs256(SECRET).verify(&token).unwrap();
        assert_eq!(claims, Claims::for_user("ref", "jane"));
    }

    #[test]
    fn expired_tokens_are_unauthorized() {
        let token = JwtSigner::hs256(SECRET)
            .sign(&Claims::for_user("ref", "jane"), Utc::now() - Duration::hours(1))
            .unwrap();

        let err = JwtVerifier::hs256(SECRET).verify(&token).unwrap_err();
        assert_eq!(err.status(), 401);
    }

    #[test]
    fn foreign_signatures_are_unauthorized() {
        let token = JwtSigner::hs256(b"other-secret")
            .sign(&Claims::for_user("ref", "jane"), Utc::now() + Duration::minutes(5))
            .unwrap();

        assert!(JwtVerifier::hs256(SECRET).verify(&token).is_err());
        assert!(JwtVerifier::hs256(SECRET).verify("not.a.token").is_err());
    }

    #[test]
    fn malformed_pem_is_rejected() {
        assert!(matches!(JwtSigner::rs256_pem(b"nope"), Err(AuthError::Key(_))));
        assert!(matches!(JwtVerifier::rs256_pem(b"nope"), Err(AuthError::Key(_))));
    }
}
