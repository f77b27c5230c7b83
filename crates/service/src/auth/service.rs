use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, Authenticated, LoginInput};
use super::errors::AuthError;
use super::jwt::{AccessClaims, AuthConfig, JwtManager};
use super::password::verify_password;
use super::token_store::RefreshTokenStore;
use crate::user::domain::UserAccount;
use crate::user::repository::UserRepository;

/// Auth business service independent of web framework
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn RefreshTokenStore>,
    jwt: JwtManager,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn RefreshTokenStore>, cfg: AuthConfig) -> Self {
        Self { users, tokens, jwt: JwtManager::new(cfg) }
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    pub fn token_store(&self) -> Arc<dyn RefreshTokenStore> {
        self.tokens.clone()
    }

    /// Verify credentials, issue a token pair and remember the refresh token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, domain::LoginInput, jwt::AuthConfig, token_store::InMemoryRefreshTokenStore};
    /// use service::user::{UserService, domain::SignUpInput, repository::mock::InMemoryUserRepository};
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let tokens = Arc::new(InMemoryRefreshTokenStore::new());
    /// let accounts = UserService::new(users.clone(), tokens.clone());
    /// let auth = AuthService::new(users, tokens.clone(), AuthConfig::with_secrets("a", "r"));
    /// let signup = SignUpInput { email: "u@e.com".into(), password: "1234".into(), cellphone: None };
    /// tokio_test::block_on(accounts.sign_up(signup)).unwrap();
    /// let session = tokio_test::block_on(auth.login(LoginInput { email: "u@e.com".into(), password: "1234".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.tokens.access_token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = models::user::normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("userEmail and userPassword required".into()));
        }
        let user = self.users.find_by_email(&email).await?.ok_or(AuthError::Unauthorized)?;
        if !user.is_active() {
            debug!(user_id = %user.id, "login attempt on withdrawn account");
            return Err(AuthError::Unauthorized);
        }
        let cred = self.users.get_credentials(user.id).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }

        let tokens = self.jwt.issue_pair(&user.email, user.role)?;
        let ttl = Duration::from_secs(self.jwt.config().refresh_ttl_secs);
        self.tokens.save(&user.email, &tokens.refresh_token, ttl).await?;
        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, tokens })
    }

    /// Drop the stored refresh token. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub async fn logout(&self, email: &str) -> Result<(), AuthError> {
        let removed = self.tokens.remove(email).await?;
        info!(removed, "user_logged_out");
        Ok(())
    }

    /// Resolve the caller from an `Authorization` header value.
    ///
    /// An expired access token is accepted once more when the refresh token
    /// issued alongside it (same subject, `jti` equal to the access `sid`) is
    /// still the one stored; the replacement access token is returned in
    /// [`Authenticated::reissued_access`].
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, errors::AuthError, jwt::AuthConfig, token_store::InMemoryRefreshTokenStore};
    /// use service::user::repository::mock::InMemoryUserRepository;
    /// let auth = AuthService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(InMemoryRefreshTokenStore::new()),
    ///     AuthConfig::with_secrets("a", "r"),
    /// );
    /// let missing = tokio_test::block_on(auth.authenticate(None));
    /// assert!(matches!(missing, Err(AuthError::MissingToken)));
    /// let wrong_scheme = tokio_test::block_on(auth.authenticate(Some("Basic abc")));
    /// assert!(matches!(wrong_scheme, Err(AuthError::InvalidTokenFormat)));
    /// ```
    #[instrument(skip_all)]
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Authenticated, AuthError> {
        let header = authorization.map(str::trim).filter(|h| !h.is_empty()).ok_or(AuthError::MissingToken)?;
        let token = JwtManager::strip_prefix(header).ok_or(AuthError::InvalidTokenFormat)?;

        match self.jwt.verify_access(token) {
            Ok(claims) => {
                let user = self.active_user(&claims).await?;
                Ok(Authenticated { user, reissued_access: None })
            }
            Err(AuthError::TokenExpired) => self.reissue(token).await,
            Err(e) => Err(e),
        }
    }

    async fn reissue(&self, expired: &str) -> Result<Authenticated, AuthError> {
        let claims = self.jwt.decode_expired_access(expired)?;
        let Some(refresh) = self.tokens.find(&claims.sub).await? else {
            debug!(email = %claims.sub, "access expired and no refresh token stored");
            return Err(AuthError::TokenExpired);
        };
        let refresh_claims = match self.jwt.verify_refresh(&refresh) {
            Ok(c) => c,
            Err(e) => {
                warn!(email = %claims.sub, error = %e, "stored refresh token rejected");
                return Err(AuthError::TokenExpired);
            }
        };
        if refresh_claims.sub != claims.sub {
            warn!(email = %claims.sub, "refresh token subject mismatch");
            return Err(AuthError::InvalidToken);
        }
        if refresh_claims.jti != claims.sid {
            debug!(email = %claims.sub, "access token belongs to a revoked session");
            return Err(AuthError::TokenExpired);
        }
        let user = self.active_user(&claims).await?;
        let access = self.jwt.sign_access(&user.email, user.role, &claims.sid, chrono::Utc::now())?;
        info!(user_id = %user.id, "access_token_reissued");
        Ok(Authenticated { user, reissued_access: Some(access) })
    }

    async fn active_user(&self, claims: &AccessClaims) -> Result<UserAccount, AuthError> {
        match self.users.find_by_email(&claims.sub).await? {
            Some(user) if user.is_active() => Ok(user),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token_store::InMemoryRefreshTokenStore;
    use crate::user::domain::{Role, SignUpInput};
    use crate::user::repository::mock::InMemoryUserRepository;
    use crate::user::UserService;

    struct Fixture {
        auth: AuthService,
        accounts: UserService,
        tokens: Arc<InMemoryRefreshTokenStore>,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::default());
        let tokens = Arc::new(InMemoryRefreshTokenStore::new());
        let accounts = UserService::new(users.clone(), tokens.clone());
        let auth = AuthService::new(users, tokens.clone(), AuthConfig::with_secrets("access", "refresh"));
        accounts
            .sign_up(SignUpInput { email: "ohejung@naver.com".into(), password: "1234".into(), cellphone: None })
            .await
            .unwrap();
        Fixture { auth, accounts, tokens }
    }

    fn login_input(password: &str) -> LoginInput {
        LoginInput { email: "ohejung@naver.com".into(), password: password.into() }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn login_stores_refresh_token_under_email() {
        let f = fixture().await;
        let session = f.auth.login(login_input("1234")).await.unwrap();
        let stored = f.tokens.find("ohejung@naver.com").await.unwrap();
        assert_eq!(stored.as_deref(), Some(session.tokens.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let f = fixture().await;
        assert!(matches!(f.auth.login(login_input("wrong")).await, Err(AuthError::Unauthorized)));
        let unknown = LoginInput { email: "nobody@x.com".into(), password: "1234".into() };
        assert!(matches!(f.auth.login(unknown).await, Err(AuthError::Unauthorized)));
        let blank = LoginInput { email: String::new(), password: String::new() };
        assert!(matches!(f.auth.login(blank).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_email() {
        let f = fixture().await;
        let input = LoginInput { email: " OheJung@Naver.com".into(), password: "1234".into() };
        assert!(f.auth.login(input).await.is_ok());
    }

    #[tokio::test]
    async fn authenticate_valid_token() {
        let f = fixture().await;
        let session = f.auth.login(login_input("1234")).await.unwrap();
        let header = bearer(&session.tokens.access_token);
        let who = f.auth.authenticate(Some(&header)).await.unwrap();
        assert_eq!(who.user.email, "ohejung@naver.com");
        assert!(who.reissued_access.is_none());
    }

    #[tokio::test]
    async fn authenticate_rejects_garbage_and_missing() {
        let f = fixture().await;
        assert!(matches!(f.auth.authenticate(Some("   ")).await, Err(AuthError::MissingToken)));
        assert!(matches!(f.auth.authenticate(Some("Token abc")).await, Err(AuthError::InvalidTokenFormat)));
        assert!(matches!(f.auth.authenticate(Some("Bearer not.a.jwt")).await, Err(AuthError::InvalidToken)));
    }

    /// Same session as `session`, but already past its expiry.
    fn expired_copy(f: &Fixture, session: &AuthSession) -> String {
        let sid = f.auth.jwt().verify_access(&session.tokens.access_token).unwrap().sid;
        f.auth
            .jwt()
            .sign_access("ohejung@naver.com", Role::User, &sid, chrono::Utc::now() - chrono::Duration::hours(1))
            .unwrap()
    }

    #[tokio::test]
    async fn expired_access_is_reissued_from_refresh_token() {
        let f = fixture().await;
        let session = f.auth.login(login_input("1234")).await.unwrap();
        let stale = expired_copy(&f, &session);
        let who = f.auth.authenticate(Some(&bearer(&stale))).await.unwrap();
        let fresh = who.reissued_access.expect("new access token");
        let claims = f.auth.jwt().verify_access(&fresh).unwrap();
        assert_eq!(claims.sid, f.auth.jwt().verify_access(&session.tokens.access_token).unwrap().sid);
    }

    #[tokio::test]
    async fn expired_token_from_before_password_change_is_not_reissued() {
        let f = fixture().await;
        let old = f.auth.login(login_input("1234")).await.unwrap();
        let stale = expired_copy(&f, &old);
        f.accounts.change_password(&old.user, "5678").await.unwrap();
        f.auth.login(login_input("5678")).await.unwrap();

        assert!(f.tokens.find("ohejung@naver.com").await.unwrap().is_some());
        assert!(matches!(f.auth.authenticate(Some(&bearer(&stale))).await, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn newer_login_supersedes_older_session() {
        let f = fixture().await;
        let first = f.auth.login(login_input("1234")).await.unwrap();
        let stale = expired_copy(&f, &first);
        f.auth.login(login_input("1234")).await.unwrap();
        assert!(matches!(f.auth.authenticate(Some(&bearer(&stale))).await, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn oversized_refresh_lifetime_fails_login_cleanly() {
        let users = Arc::new(InMemoryUserRepository::default());
        let tokens = Arc::new(InMemoryRefreshTokenStore::new());
        let accounts = UserService::new(users.clone(), tokens.clone());
        let mut cfg = AuthConfig::with_secrets("access", "refresh");
        cfg.refresh_ttl_secs = 10_000_000_000_000;
        let auth = AuthService::new(users, tokens.clone(), cfg);
        accounts
            .sign_up(SignUpInput { email: "ohejung@naver.com".into(), password: "1234".into(), cellphone: None })
            .await
            .unwrap();
        assert!(matches!(auth.login(login_input("1234")).await, Err(AuthError::TokenError(_))));
        assert!(tokens.find("ohejung@naver.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_access_without_refresh_token_fails() {
        let f = fixture().await;
        let session = f.auth.login(login_input("1234")).await.unwrap();
        f.auth.logout("ohejung@naver.com").await.unwrap();
        let stale = expired_copy(&f, &session);
        assert!(matches!(f.auth.authenticate(Some(&bearer(&stale))).await, Err(AuthError::TokenExpired)));
        // logout twice is fine
        f.auth.logout("ohejung@naver.com").await.unwrap();
    }

    #[tokio::test]
    async fn withdrawn_user_cannot_authenticate() {
        let f = fixture().await;
        let session = f.auth.login(login_input("1234")).await.unwrap();
        f.accounts.withdraw(&session.user, "1234").await.unwrap();
        let header = bearer(&session.tokens.access_token);
        assert!(matches!(f.auth.authenticate(Some(&header)).await, Err(AuthError::Unauthorized)));
        assert!(matches!(f.auth.login(login_input("1234")).await, Err(AuthError::Unauthorized)));
    }
}
