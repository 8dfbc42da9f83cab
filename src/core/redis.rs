use std::sync::Arc;

use redis::aio::ConnectionManager;
use redis::{cmd, Client, RedisError};
use tokio::sync::RwLock;

const KEY_PREFIX: &str = "assess";

const FIXED_WINDOW_SCRIPT: &str = r#"
    local current = redis.call("INCR", KEYS[1])
    if current == 1 then
        redis.call("EXPIRE", KEYS[1], ARGV[1])
    end
    return current
"#;

/// Attempts allowed per fixed window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RateLimit {
    pub(crate) max_attempts: u64,
    pub(crate) window_seconds: u64,
}

/// Optional redis connection. Every operation degrades to "allowed" while
/// disconnected, so the API stays usable without the cache.
#[derive(Clone)]
pub(crate) struct RedisHandle {
    url: String,
    manager: Arc<RwLock<Option<ConnectionManager>>>,
}

#[derive(Debug, Clone)]
pub(crate) enum RedisHealth {
    Healthy,
    Disconnected,
    Unhealthy(String),
}

impl RedisHandle {
    pub(crate) fn new(url: String) -> Self {
        Self { url, manager: Arc::new(RwLock::new(None)) }
    }

    pub(crate) async fn connect(&self) -> Result<(), RedisError> {
        let client = Client::open(self.url.clone())?;
        let manager = ConnectionManager::new(client).await?;
        *self.manager.write().await = Some(manager);
        Ok(())
    }

    pub(crate) async fn disconnect(&self) {
        *self.manager.write().await = None;
    }

    pub(crate) async fn health(&self) -> RedisHealth {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return RedisHealth::Disconnected;
        };

        match cmd("PING").query_async::<_, String>(&mut manager).await {
            Ok(_) => RedisHealth::Healthy,
            Err(err) => RedisHealth::Unhealthy(err.to_string()),
        }
    }

    /// Counts one attempt under `scope:subject` and reports whether it is
    /// still inside the limit.
    pub(crate) async fn allow(
        &self,
        scope: &str,
        subject: &str,
        limit: RateLimit,
    ) -> Result<bool, RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(true);
        };

        let key = format!("{KEY_PREFIX}:rl:{scope}:{}", subject.trim().to_ascii_lowercase());
        let current: i64 = redis::Script::new(FIXED_WINDOW_SCRIPT)
            .key(key)
            .arg(limit.window_seconds as i64)
            .invoke_async(&mut manager)
            .await?;

        Ok(current <= limit.max_attempts as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::{RateLimit, RedisHandle};
    use crate::core::config::Settings;
    use crate::test_support;
    use uuid::Uuid;

    #[tokio::test]
    async fn disconnected_handle_allows_everything() {
        let redis = RedisHandle::new("redis://127.0.0.1:1/0".to_string());
        let limit = RateLimit { max_attempts: 0, window_seconds: 5 };
        assert!(redis.allow("sign-in", "someone@example.com", limit).await.unwrap());
    }

    #[tokio::test]
    async fn allow_enforces_limit() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        test_support::reset_redis(settings.redis().redis_url()).await.expect("redis reset");

        let redis = RedisHandle::new(settings.redis().redis_url());
        redis.connect().await.expect("redis connect");

        let subject = format!("{}@example.com", Uuid::new_v4());
        let limit = RateLimit { max_attempts: 1, window_seconds: 5 };
        let first = redis.allow("sign-in", &subject, limit).await.expect("rate limit");
        let second = redis.allow("sign-in", &subject, limit).await.expect("rate limit");

        assert!(first);
        assert!(!second);
    }
}
