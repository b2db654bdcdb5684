// 缓存模块
// 计数器存储接口与各后端实现

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub mod document;
pub mod keys;
pub mod memory;
pub mod operations;
pub mod redis_store;

pub use document::DocumentStore;
pub use keys::StoreKey;
pub use memory::MemoryStore;
pub use operations::{CounterCacheOperations, Counts};
pub use redis_store::RedisStore;

use crate::config::{Config, ConfigError, StoreBackend};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("document store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("document store returned {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },
    #[error("invalid document store url: {0}")]
    Url(String),
}

/// 计数器依赖的键值存储接口
///
/// 值为短字符串；`ttl` 要求存储到期删除该键，不支持过期的后端可以忽略。
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError>;

    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;
}

/// 根据配置创建存储后端
pub fn from_config(config: &Config) -> Result<Arc<dyn KvStore>, ConfigError> {
    match config.store_backend {
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(ConfigError::Missing("REDIS_URL"))?;
            let store = RedisStore::open(url).map_err(|e| {
                tracing::error!("Failed to create Redis client: {}", e);
                ConfigError::InvalidStore(e.to_string())
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Document => {
            let url = config
                .document_store_url
                .as_deref()
                .ok_or(ConfigError::Missing("DOCUMENT_STORE_URL"))?;
            let store = DocumentStore::new(url, config.document_store_auth.clone()).map_err(|e| {
                tracing::error!("Failed to create document store client: {}", e);
                ConfigError::InvalidStore(e.to_string())
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, counts are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
