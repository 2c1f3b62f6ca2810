//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{
    auth::{
        AuthServiceError, IssuedSession, NewSession, SessionMetadata, SessionTokenVersion,
        SessionUuid, format_session_token, generate_session_secret, hash_session_token,
        parse_session_token, repository::PgAuthRepository,
    },
    domain::profiles::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new session for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub async fn issue_session(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, SessionTokenVersion::V1, &secret);

        let metadata = self
            .repository
            .create_session(NewSession {
                uuid: session_uuid,
                user_uuid: user,
                token_hash: hash_session_token(&token),
                expires_at,
            })
            .await?;

        info!(session = %session_uuid, %user, "session issued");

        Ok(IssuedSession { token, metadata })
    }

    /// List all sessions of the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sessions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<SessionMetadata>, AuthServiceError> {
        self.repository
            .list_sessions(user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a session. Returns `true` if it was still active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, session: SessionUuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_session(session)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let session = self
            .repository
            .find_active_session(parsed.session_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if session.token_hash != hash_session_token(bearer_token) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort; authentication does not depend on it.
        let _touch_result = self.repository.touch_session(parsed.session_uuid).await;

        Ok(session.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_tokens_authenticate_their_user() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_session(ctx.carrier, None).await?;

        assert!(issued.token.starts_with("fs_v1_"));
        assert_eq!(ctx.auth.authenticate_bearer(&issued.token).await?, ctx.carrier);

        let sessions = ctx.auth.list_sessions(ctx.carrier).await?;

        assert_eq!(sessions.len(), 1);
        assert!(sessions.iter().all(|s| s.last_used_at.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secrets_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let issued = ctx.auth.issue_session(ctx.carrier, None).await?;

        let mut tampered = issued.token.clone();
        let last = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(last);

        let result = ctx.auth.authenticate_bearer(&tampered).await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn revoked_sessions_stop_authenticating() -> TestResult {
        let ctx = TestContext::new().await;
        let issued = ctx.auth.issue_session(ctx.shipper, None).await?;

        assert!(ctx.auth.revoke_session(issued.metadata.uuid).await?);
        assert!(!ctx.auth.revoke_session(issued.metadata.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn expired_sessions_stop_authenticating() -> TestResult {
        let ctx = TestContext::new().await;
        let expired = Timestamp::now().checked_sub(1.hour())?;

        let issued = ctx.auth.issue_session(ctx.shipper, Some(expired)).await?;

        assert!(!issued.metadata.is_active(Timestamp::now()));

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn garbage_tokens_are_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("Bearer nonsense").await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));
    }

    #[tokio::test]
    async fn sessions_require_an_existing_user() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_session(UserUuid::new(), None).await;

        assert!(matches!(result, Err(AuthServiceError::InvalidReference)));
    }
}
