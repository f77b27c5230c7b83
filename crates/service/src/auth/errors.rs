use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("access token missing")]
    MissingToken,
    #[error("authorization header must use the Bearer scheme")]
    InvalidTokenFormat,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("token store error: {0}")]
    TokenStore(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Unauthorized => 1004,
            AuthError::MissingToken => 1005,
            AuthError::InvalidTokenFormat => 1006,
            AuthError::InvalidToken => 1007,
            AuthError::TokenExpired => 1008,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::TokenStore(_) => 1103,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Auth(inner) => inner,
            ServiceError::Validation(msg) => AuthError::Validation(msg),
            other => AuthError::Repository(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(e: redis::RedisError) -> Self {
        AuthError::TokenStore(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            AuthError::Validation(String::new()),
            AuthError::Unauthorized,
            AuthError::MissingToken,
            AuthError::InvalidTokenFormat,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::HashError(String::new()),
            AuthError::TokenError(String::new()),
            AuthError::TokenStore(String::new()),
            AuthError::Repository(String::new()),
        ];
        let mut codes: Vec<u16> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn service_error_unwraps_nested_auth_error() {
        let e: AuthError = ServiceError::Auth(AuthError::TokenExpired).into();
        assert!(matches!(e, AuthError::TokenExpired));
        let e: AuthError = ServiceError::Db("boom".into()).into();
        assert_eq!(e.code(), 1200);
    }
}
