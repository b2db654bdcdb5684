use axum::{
    Json,
    extract::{Query, State},
    http::{Extensions, HeaderMap, Uri, header},
    response::IntoResponse,
};

use super::model::{CounterQuery, CounterView, resolve_key};
use crate::AppState;
use crate::cache::CounterCacheOperations;
use crate::error::AppError;
use crate::utils::{client_ip, now_iso, utc_day};

const USAGE: &str = "Hit Counter API Ready ✅
➡ Increment: /hit?key=<id>&unique=1
➡ Read only: /get?key=<id>";

/// 去掉路由前缀后的路径，用于推断计数器键
fn path_remainder<'a>(uri: &'a Uri, prefix: &str) -> &'a str {
    uri.path().strip_prefix(prefix).unwrap_or_default()
}

#[axum::debug_handler]
pub async fn get_counts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
    uri: Uri,
) -> Result<Json<CounterView>, AppError> {
    let config = &state.config;
    let query = CounterQuery::from_pairs(pairs);
    let key = resolve_key(
        &query,
        path_remainder(&uri, "/get"),
        config.infer_key_from_path,
        &config.default_key,
    );

    let counts = CounterCacheOperations::read_counts(state.store.as_ref(), &key).await?;
    Ok(Json(CounterView::new(key, counts)))
}

#[axum::debug_handler]
pub async fn hit(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
) -> Result<Json<CounterView>, AppError> {
    let config = &state.config;
    let store = state.store.as_ref();
    let query = CounterQuery::from_pairs(pairs);
    let key = resolve_key(
        &query,
        path_remainder(&uri, "/hit"),
        config.infer_key_from_path,
        &config.default_key,
    );
    let ip = client_ip(&headers, &extensions, &config.client_ip_header);

    // 节流标记只记录，不拦截请求
    if config.throttle {
        let throttled =
            CounterCacheOperations::touch_throttle(store, &key, &ip, config.throttle_window())
                .await?;
        if throttled {
            tracing::debug!("Repeated hit within throttle window, key: {}, ip: {}", key, ip);
        }
    }

    // 未开启去重时 unique 也随每次点击加一
    let mut unique_inc = 1;
    if query.unique_mode() {
        unique_inc = CounterCacheOperations::check_unique(
            store,
            &key,
            &utc_day(),
            &ip,
            config.unique_ttl(),
        )
        .await?;
    }

    let counts = CounterCacheOperations::increment(store, &key, unique_inc, now_iso()).await?;
    tracing::debug!(
        "Hit recorded, key: {}, total: {}, unique: {}",
        key,
        counts.total,
        counts.unique
    );

    Ok(Json(CounterView::new(key, counts)))
}

pub async fn usage() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], USAGE)
}
