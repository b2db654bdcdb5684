use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;

use super::{KvStore, StoreError, StoreKey};

/// 内存存储，克隆后共享同一份数据
///
/// 读取时检查过期；写入时清理所有已过期的键。
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<AsyncMutex<HashMap<String, (String, Option<Instant>)>>>, // (value, expires_at)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前未过期的键数量
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, expires_at)| expires_at.is_none_or(|at| at > now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 内部保存的键数量，包括尚未清理的过期键
    pub async fn stored_len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().await;
        let flat = key.flat();

        let expired = match entries.get(&flat) {
            Some((_, Some(expires_at))) => *expires_at <= Instant::now(),
            Some((_, None)) => false,
            None => return Ok(None),
        };

        if expired {
            entries.remove(&flat);
            return Ok(None);
        }

        Ok(entries.get(&flat).map(|(value, _)| value.clone()))
    }

    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now + ttl);

        let mut entries = self.entries.lock().await;
        entries.retain(|_, (_, deadline)| deadline.is_none_or(|at| at > now));
        entries.insert(key.flat(), (value.to_string(), expires_at));
        Ok(())
    }
}
