use serde::{Deserialize, Serialize};

use crate::user::domain::UserAccount;

/// Login input (`POST /login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(rename = "userEmail", default)]
    pub email: String,
    #[serde(rename = "userPassword", default)]
    pub password: String,
}

/// Freshly issued access/refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// Login result (session)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserAccount,
    pub tokens: TokenPair,
}

/// Outcome of validating a request's bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: UserAccount,
    /// Set when the access token had expired and was reissued from the stored refresh token.
    pub reissued_access: Option<String>,
}
