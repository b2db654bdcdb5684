use std::time::Duration;

use crate::cache::{KvStore, StoreError, StoreKey};
use crate::utils::parse_count;

/// 计数器当前值
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: u64,
    pub unique: u64,
    pub updated_at: Option<String>,
}

/// 计数器缓存操作
///
/// 自增是不加锁的读-改-写：同一键的并发点击可能读到相同的值，丢失一次计数。
/// 三个字段分别写入，没有事务。
pub struct CounterCacheOperations;

impl CounterCacheOperations {
    /// 读取计数器的三个字段，缺失视为 0 / None
    pub async fn read_counts(store: &dyn KvStore, key: &str) -> Result<Counts, StoreError> {
        let (total_key, unique_key, updated_key) = (
            StoreKey::total(key),
            StoreKey::unique(key),
            StoreKey::updated_at(key),
        );

        let (total, unique, updated_at) = futures_util::try_join!(
            store.get(&total_key),
            store.get(&unique_key),
            store.get(&updated_key),
        )?;

        Ok(Counts {
            total: parse_count(total.as_deref()),
            unique: parse_count(unique.as_deref()),
            updated_at,
        })
    }

    /// `total` 加一，`unique` 加 `unique_inc`，更新 `updated_at`，返回刚写入的值
    pub async fn increment(
        store: &dyn KvStore,
        key: &str,
        unique_inc: u64,
        now: String,
    ) -> Result<Counts, StoreError> {
        let (total_key, unique_key, updated_key) = (
            StoreKey::total(key),
            StoreKey::unique(key),
            StoreKey::updated_at(key),
        );

        let (total_raw, unique_raw) =
            futures_util::try_join!(store.get(&total_key), store.get(&unique_key))?;

        let total = parse_count(total_raw.as_deref()).saturating_add(1);
        let unique = parse_count(unique_raw.as_deref()).saturating_add(unique_inc);
        let (total_value, unique_value) = (total.to_string(), unique.to_string());

        futures_util::try_join!(
            store.put(&total_key, &total_value, None),
            store.put(&unique_key, &unique_value, None),
            store.put(&updated_key, &now, None),
        )?;

        Ok(Counts {
            total,
            unique,
            updated_at: Some(now),
        })
    }

    /// 返回本次的独立访客增量：`(key, day, ip)` 标记首次出现为 1 并写入标记，之后为 0
    pub async fn check_unique(
        store: &dyn KvStore,
        key: &str,
        day: &str,
        ip: &str,
        ttl: Duration,
    ) -> Result<u64, StoreError> {
        let marker = StoreKey::unique_marker(key, day, ip);

        if store.get(&marker).await?.is_some() {
            return Ok(0);
        }

        store.put(&marker, "1", Some(ttl)).await?;
        Ok(1)
    }

    /// 标记不存在时写入 `(key, ip)` 节流标记，返回标记是否已存在（调用方不据此拦截）
    pub async fn touch_throttle(
        store: &dyn KvStore,
        key: &str,
        ip: &str,
        window: Duration,
    ) -> Result<bool, StoreError> {
        let marker = StoreKey::throttle_marker(key, ip);

        if store.get(&marker).await?.is_some() {
            return Ok(true);
        }

        store.put(&marker, "1", Some(window)).await?;
        Ok(false)
    }
}
