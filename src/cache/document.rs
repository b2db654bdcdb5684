use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::{KvStore, StoreError, StoreKey};

/// 远程 JSON 文档存储，每个字段一个文档（`counters/<key>/total.json` 等）
///
/// 不支持过期，`put` 的 TTL 会被忽略，去重标记永不过期。
#[derive(Clone)]
pub struct DocumentStore {
    client: Client,
    base: Url,
    auth: Option<String>,
}

impl DocumentStore {
    pub fn new(base: &str, auth: Option<String>) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), base, auth)
    }

    pub fn with_client(
        client: Client,
        base: &str,
        auth: Option<String>,
    ) -> Result<Self, StoreError> {
        let base = Url::parse(base).map_err(|e| StoreError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Url(format!("{} cannot be a base url", base)));
        }
        Ok(Self { client, base, auth })
    }

    /// 生成文档地址
    pub fn document_url(&self, key: &StoreKey) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Url(self.base.to_string()))?;
            segments.pop_if_empty();
            segments.extend(key.document_segments());
        }
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }
}

/// 将文档值转为存储字符串，`null` 视为不存在
fn document_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl KvStore for DocumentStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        let url = self.document_url(key)?;
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status {
                status: response.status(),
                path: key.document_segments().join("/"),
            });
        }

        let value: Value = response.json().await?;
        Ok(document_value(value))
    }

    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        if let Some(ttl) = ttl {
            tracing::debug!(
                "Document store has no expiry, ignoring ttl of {}s for {}",
                ttl.as_secs(),
                key
            );
        }

        let url = self.document_url(key)?;
        let response = self.client.put(url).json(&value).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Status {
                status: response.status(),
                path: key.document_segments().join("/"),
            });
        }

        Ok(())
    }
}
