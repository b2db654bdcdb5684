use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{KvStore, StoreError, StoreKey};

/// Redis 存储后端
#[derive(Clone)]
pub struct RedisStore {
    redis: Arc<RedisClient>,
}

impl RedisStore {
    pub fn new(redis: RedisClient) -> Self {
        Self {
            redis: Arc::new(redis),
        }
    }

    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(RedisClient::open(url)?))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key.flat()).await?;
        Ok(value)
    }

    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        match ttl {
            // SET EX 不接受 0
            Some(ttl) => {
                let _: () = conn.set_ex(key.flat(), value, ttl.as_secs().max(1)).await?;
            }
            None => {
                let _: () = conn.set(key.flat(), value).await?;
            }
        }

        Ok(())
    }
}
