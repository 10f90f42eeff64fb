//! # TokenService
//!
//! Issues access tokens for the auth process. Credentials are checked by the
//! users service; its error status is relayed unchanged.

use std::sync::Arc;

use chrono::{Duration, Utc};
use domains::dto::{AccessToken, Credentials};
use domains::ports::{TokenSigner, UsersApi};
use domains::DomainResult;

pub struct TokenService {
    users: Arc<dyn UsersApi>,
    signer: Arc<dyn TokenSigner>,
    expiry: Duration,
}

impl TokenService {
    pub fn new(users: Arc<dyn UsersApi>, signer: Arc<dyn TokenSigner>, expiry_minutes: i64) -> Self {
        Self { users, signer, expiry: Duration::minutes(expiry_minutes) }
    }

    pub async fn generate(&self, credentials: &Credentials) -> DomainResult<AccessToken> {
        let claims = self.users.get_claims(credentials).await?;

        let expires = Utc::now() + self.expiry;
        let token = self.signer.sign(&claims, expires)?;

        Ok(AccessToken { token, expires: expires.timestamp() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::claims::Claims;
    use domains::ports::{MockTokenSigner, MockUsersApi};
    use domains::DomainError;

    fn credentials() -> Credentials {
        Credentials { username: "jane".into(), password: "secret".into() }
    }

    #[tokio::test]
    async fn signs_the_users_claims_with_an_expiry() {
        let mut users = MockUsersApi::new();
        users.expect_get_claims().returning(|_| Ok(Claims::for_user("ref", "jane")));

        let mut signer = MockTokenSigner::new();
        signer
            .expect_sign()
            .withf(|claims, _| claims.uid() == Some("ref"))
            .returning(|_, _| Ok("signed".into()));

        let svc = TokenService::new(Arc::new(users), Arc::new(signer), 60);
        let before = Utc::now().timestamp();
        let token = svc.generate(&credentials()).await.unwrap();

        assert_eq!(token.token, "signed");
        assert!(token.expires >= before + 3600);
        assert!(token.expires <= Utc::now().timestamp() + 3600);
    }

    #[tokio::test]
    async fn relays_the_users_service_status() {
        let mut users = MockUsersApi::new();
        users.expect_get_claims().returning(|_| {
            Err(DomainError::Upstream { status: 400, message: "password is invalid".into() })
        });
        let mut signer = MockTokenSigner::new();
        signer.expect_sign().never();

        let svc = TokenService::new(Arc::new(users), Arc::new(signer), 60);
        let err = svc.generate(&credentials()).await.unwrap_err();

        assert_eq!(err.status(), 400);
        assert_eq!(err.to_string(), "password is invalid");
    }

    #[tokio::test]
    async fn transport_failures_are_internal() {
        let mut users = MockUsersApi::new();
        users.expect_get_claims().returning(|_| Err(DomainError::internal("http: connection refused")));

        let svc = TokenService::new(Arc::new(users), Arc::new(MockTokenSigner::new()), 60);
        assert_eq!(svc.generate(&credentials()).await.unwrap_err().status(), 500);
    }
}
