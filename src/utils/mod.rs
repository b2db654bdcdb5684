use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Extensions};
use chrono::{SecondsFormat, Utc};

/// 数量级后缀，最大到 T
const UNITS: [&str; 4] = ["K", "M", "B", "T"];

/// 客户端 IP 缺失时的占位值
pub const UNKNOWN_IP: &str = "0.0.0.0";

/// 格式化计数：达到 1000 后使用 K/M/B/T 后缀，保留一位小数（`1234` → `1.2K`，`1000000` → `1M`）
pub fn format_num(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let mut unit = 0;
    let mut num = n as f64 / 1000.0;
    while num >= 1000.0 && unit < UNITS.len() - 1 {
        num /= 1000.0;
        unit += 1;
    }

    // 四舍五入到一位小数，整数不带 ".0"
    let rounded = (num * 10.0 + 0.5).floor() / 10.0;
    format!("{}{}", rounded, UNITS[unit])
}

/// 宽松解析存储的计数：跳过前导空白，取开头的数字，其余情况为 0
pub fn parse_count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..digits_end].parse().unwrap_or(0)
}

/// 客户端 IP：优先配置的请求头，其次连接地址，最后 `0.0.0.0`
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions, header_name: &str) -> String {
    let remote_ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    headers
        .get(header_name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or(remote_ip)
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

/// 当前 UTC 日期，`YYYY-MM-DD`
pub fn utc_day() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// 当前时间的 ISO-8601 表示，精确到毫秒
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
