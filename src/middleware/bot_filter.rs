use axum::{
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// 只检查 User-Agent 的前 200 个字符
const MAX_USER_AGENT_CHARS: usize = 200;

/// 命中任一子串即视为爬虫（不区分大小写）
const BOT_PATTERNS: [&str; 10] = [
    "bot",
    "crawl",
    "spider",
    "preview",
    "fetch",
    "monitor",
    "facebookexternalhit",
    "curl",
    "wget",
    "headless",
];

/// User-Agent 为空或像自动化客户端时返回 true
pub fn is_bot(user_agent: &str) -> bool {
    let ua: String = user_agent
        .chars()
        .take(MAX_USER_AGENT_CHARS)
        .collect::<String>()
        .to_lowercase();

    ua.is_empty() || BOT_PATTERNS.iter().any(|pattern| ua.contains(pattern))
}

pub async fn bot_filter(req: Request<Body>, next: Next) -> Response {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
        .unwrap_or_default();

    if is_bot(&user_agent) {
        tracing::debug!("Blocked bot request, user-agent: {:?}", user_agent);
        return AppError::BlockedBot.into_response();
    }

    next.run(req).await
}
