//! Refresh-token storage keyed by user email.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::sync::RwLock;
use tracing::info;

use super::errors::AuthError;

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Replaces any token already stored for `email`.
    async fn save(&self, email: &str, token: &str, ttl: Duration) -> Result<(), AuthError>;
    async fn find(&self, email: &str) -> Result<Option<String>, AuthError>;
    /// `true` when a token was present.
    async fn remove(&self, email: &str) -> Result<bool, AuthError>;
}

/// Redis-backed store: `SET key token EX ttl`.
#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisRefreshTokenStore {
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, AuthError> {
        info!("Connecting to Redis...");
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Redis connection established");
        Ok(Self { conn, key_prefix: key_prefix.to_string() })
    }

    pub async fn ping(&self) -> Result<bool, AuthError> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }

    fn key(&self, email: &str) -> String {
        format!("{}{}", self.key_prefix, email)
    }
}

#[async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn save(&self, email: &str, token: &str, ttl: Duration) -> Result<(), AuthError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(self.key(email), token, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn find(&self, email: &str) -> Result<Option<String>, AuthError> {
        let mut conn = self.conn.clone();
        let token: Option<String> = conn.get(self.key(email)).await?;
        Ok(token)
    }

    async fn remove(&self, email: &str) -> Result<bool, AuthError> {
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(self.key(email)).await?;
        Ok(deleted > 0)
    }
}

/// Process-local store for tests and single-instance setups without redis.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn save(&self, email: &str, token: &str, ttl: Duration) -> Result<(), AuthError> {
        let expires = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| AuthError::TokenStore(format!("refresh ttl of {}s is out of range", ttl.as_secs())))?;
        self.entries.write().await.insert(email.to_string(), (token.to_string(), expires));
        Ok(())
    }

    async fn find(&self, email: &str) -> Result<Option<String>, AuthError> {
        let mut entries = self.entries.write().await;
        match entries.get(email) {
            Some((token, expires)) if *expires > Instant::now() => Ok(Some(token.clone())),
            Some(_) => {
                entries.remove(email);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, email: &str) -> Result<bool, AuthError> {
        let removed = self.entries.write().await.remove(email);
        Ok(removed.is_some_and(|(_, expires)| expires > Instant::now()))
    }
}
