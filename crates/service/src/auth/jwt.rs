//! HS512 access/refresh token codec.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;
use crate::user::domain::Role;

pub const HEADER_NAME: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";

pub const DEFAULT_ACCESS_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 14 * 24 * 60 * 60;

/// Signing secrets and lifetimes.
#[derive(Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl AuthConfig {
    /// Default lifetimes with the given secrets.
    pub fn with_secrets(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// user email
    pub sub: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    pub role: Role,
    /// `jti` of the refresh token issued alongside
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtManager {
    cfg: AuthConfig,
    access_enc: EncodingKey,
    access_dec: DecodingKey,
    refresh_enc: EncodingKey,
    refresh_dec: DecodingKey,
}

impl JwtManager {
    pub fn new(cfg: AuthConfig) -> Self {
        Self {
            access_enc: EncodingKey::from_secret(cfg.access_secret.as_bytes()),
            access_dec: DecodingKey::from_secret(cfg.access_secret.as_bytes()),
            refresh_enc: EncodingKey::from_secret(cfg.refresh_secret.as_bytes()),
            refresh_dec: DecodingKey::from_secret(cfg.refresh_secret.as_bytes()),
            cfg,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.cfg
    }

    /// Raw token from an `Authorization` header value, `None` without the `Bearer ` prefix.
    pub fn strip_prefix(header: &str) -> Option<&str> {
        header.strip_prefix(TOKEN_PREFIX).map(str::trim).filter(|t| !t.is_empty())
    }

    /// Access token bound to refresh session `sid`, lifetime starting at `issued_at`.
    pub fn sign_access(&self, email: &str, role: Role, sid: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AccessClaims {
            sub: email.to_string(),
            user_email: email.to_string(),
            role,
            sid: sid.to_string(),
            iat: issued_at.timestamp(),
            exp: expiry(issued_at, self.cfg.access_ttl_secs)?,
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.access_enc)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn sign_refresh(&self, email: &str, jti: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = RefreshClaims {
            sub: email.to_string(),
            jti: jti.to_string(),
            iat: issued_at.timestamp(),
            exp: expiry(issued_at, self.cfg.refresh_ttl_secs)?,
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.refresh_enc)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Fresh refresh session; the access token carries its `jti` as `sid`.
    pub fn issue_pair(&self, email: &str, role: Role) -> Result<super::domain::TokenPair, AuthError> {
        let now = Utc::now();
        let sid = Uuid::new_v4().to_string();
        Ok(super::domain::TokenPair {
            access_token: self.sign_access(email, role, &sid, now)?,
            refresh_token: self.sign_refresh(email, &sid, now)?,
            expires_in: self.cfg.access_ttl_secs,
        })
    }

    /// `TokenExpired` for a well-signed but stale token, `InvalidToken` for everything else.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode::<AccessClaims>(token, &self.access_dec, &validation(true))
            .map(|data| data.claims)
            .map_err(classify)
    }

    /// Signature-checked claims of an access token, ignoring `exp`.
    pub fn decode_expired_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode::<AccessClaims>(token, &self.access_dec, &validation(false))
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        decode::<RefreshClaims>(token, &self.refresh_dec, &validation(true))
            .map(|data| data.claims)
            .map_err(classify)
    }
}

fn expiry(issued_at: DateTime<Utc>, ttl_secs: u64) -> Result<i64, AuthError> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .map(|exp| exp.timestamp())
        .ok_or_else(|| AuthError::TokenError(format!("token lifetime of {ttl_secs}s is out of range")))
}

fn validation(check_exp: bool) -> Validation {
    let mut v = Validation::new(Algorithm::HS512);
    v.leeway = 0;
    v.validate_exp = check_exp;
    v
}

fn classify(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(AuthConfig::with_secrets("access-secret-for-tests", "refresh-secret-for-tests"))
    }

    #[test]
    fn access_token_round_trip() {
        let jwt = manager();
        let pair = jwt.issue_pair("ohejung@naver.com", Role::User).unwrap();
        let claims = jwt.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "ohejung@naver.com");
        assert_eq!(claims.user_email, "ohejung@naver.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, DEFAULT_ACCESS_TTL_SECS as i64);
        assert_eq!(pair.expires_in, DEFAULT_ACCESS_TTL_SECS);

        let refresh = jwt.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, "ohejung@naver.com");
        assert_eq!(refresh.jti, claims.sid);
    }

    #[test]
    fn each_pair_opens_a_new_session() {
        let jwt = manager();
        let first = jwt.verify_access(&jwt.issue_pair("a@b.com", Role::User).unwrap().access_token).unwrap();
        let second = jwt.verify_access(&jwt.issue_pair("a@b.com", Role::User).unwrap().access_token).unwrap();
        assert_ne!(first.sid, second.sid);
    }

    #[test]
    fn oversized_lifetime_is_an_error_not_a_panic() {
        let mut cfg = AuthConfig::with_secrets("a", "r");
        cfg.refresh_ttl_secs = 10_000_000_000_000;
        let jwt = JwtManager::new(cfg);
        assert!(matches!(jwt.issue_pair("a@b.com", Role::User), Err(AuthError::TokenError(_))));
        assert!(matches!(jwt.sign_refresh("a@b.com", "sid", Utc::now()), Err(AuthError::TokenError(_))));

        let mut cfg = AuthConfig::with_secrets("a", "r");
        cfg.access_ttl_secs = u64::MAX;
        let jwt = JwtManager::new(cfg);
        assert!(matches!(jwt.sign_access("a@b.com", Role::User, "sid", Utc::now()), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn secrets_are_not_interchangeable() {
        let jwt = manager();
        let pair = jwt.issue_pair("a@b.com", Role::Admin).unwrap();
        assert!(matches!(jwt.verify_access(&pair.refresh_token), Err(AuthError::InvalidToken)));
        assert!(matches!(jwt.verify_refresh(&pair.access_token), Err(AuthError::InvalidToken)));

        let other = JwtManager::new(AuthConfig::with_secrets("another", "refresh-secret-for-tests"));
        assert!(matches!(other.verify_access(&pair.access_token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_access_is_distinguished_and_still_decodable() {
        let jwt = manager();
        let stale = jwt.sign_access("a@b.com", Role::User, "sid", Utc::now() - Duration::hours(2)).unwrap();
        assert!(matches!(jwt.verify_access(&stale), Err(AuthError::TokenExpired)));
        let claims = jwt.decode_expired_access(&stale).unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert!(matches!(jwt.decode_expired_access("garbage"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn header_prefix_handling() {
        assert_eq!(JwtManager::strip_prefix("Bearer abc.def"), Some("abc.def"));
        assert_eq!(JwtManager::strip_prefix("bearer abc"), None);
        assert_eq!(JwtManager::strip_prefix("abc"), None);
        assert_eq!(JwtManager::strip_prefix("Bearer "), None);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", AuthConfig::with_secrets("s3cr3t", "r3fr3sh"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
