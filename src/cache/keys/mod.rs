// 缓存键模块
// 计数器在存储中的寻址方式

use std::fmt;

/// 总点击数键前缀
const TOTAL_PREFIX: &str = "t:";
/// 独立访客数键前缀
const UNIQUE_PREFIX: &str = "n:";
/// 最后更新时间键前缀
const UPDATED_PREFIX: &str = "updated:";
/// 去重标记键前缀
const UNIQUE_MARKER_PREFIX: &str = "u:";
/// 节流标记键前缀
const THROTTLE_MARKER_PREFIX: &str = "th:";

/// 文档存储的根路径
const DOCUMENT_ROOT: &str = "counters";

/// 存储键：由计数器键派生，指向存储中的一个值
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Total(String),
    Unique(String),
    UpdatedAt(String),
    UniqueMarker { key: String, day: String, ip: String },
    ThrottleMarker { key: String, ip: String },
}

impl StoreKey {
    pub fn total(key: &str) -> Self {
        Self::Total(key.to_string())
    }

    pub fn unique(key: &str) -> Self {
        Self::Unique(key.to_string())
    }

    pub fn updated_at(key: &str) -> Self {
        Self::UpdatedAt(key.to_string())
    }

    pub fn unique_marker(key: &str, day: &str, ip: &str) -> Self {
        Self::UniqueMarker {
            key: key.to_string(),
            day: day.to_string(),
            ip: ip.to_string(),
        }
    }

    pub fn throttle_marker(key: &str, ip: &str) -> Self {
        Self::ThrottleMarker {
            key: key.to_string(),
            ip: ip.to_string(),
        }
    }

    /// Redis 与内存存储使用的扁平键
    pub fn flat(&self) -> String {
        match self {
            Self::Total(key) => format!("{}{}", TOTAL_PREFIX, key),
            Self::Unique(key) => format!("{}{}", UNIQUE_PREFIX, key),
            Self::UpdatedAt(key) => format!("{}{}", UPDATED_PREFIX, key),
            Self::UniqueMarker { key, day, ip } => {
                format!("{}{}:{}:{}", UNIQUE_MARKER_PREFIX, key, day, ip)
            }
            Self::ThrottleMarker { key, ip } => {
                format!("{}{}:{}", THROTTLE_MARKER_PREFIX, key, ip)
            }
        }
    }

    /// 文档路径段，最后一段带 `.json` 后缀，尚未做百分号编码
    pub fn document_segments(&self) -> Vec<String> {
        let mut segments = vec![DOCUMENT_ROOT.to_string()];
        match self {
            Self::Total(key) => {
                segments.push(document_safe(key));
                segments.push("total.json".to_string());
            }
            Self::Unique(key) => {
                segments.push(document_safe(key));
                segments.push("unique.json".to_string());
            }
            Self::UpdatedAt(key) => {
                segments.push(document_safe(key));
                segments.push("updated_at.json".to_string());
            }
            Self::UniqueMarker { key, day, ip } => {
                segments.push(document_safe(key));
                segments.push("seen".to_string());
                segments.push(document_safe(day));
                segments.push(format!("{}.json", document_safe(ip)));
            }
            Self::ThrottleMarker { key, ip } => {
                segments.push(document_safe(key));
                segments.push("throttle".to_string());
                segments.push(format!("{}.json", document_safe(ip)));
            }
        }
        segments
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flat())
    }
}

// 文档存储不允许路径段中出现这些字符
fn document_safe(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| match c {
            '.' | '#' | '$' | '[' | ']' | '/' => '_',
            other => other,
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_keys_use_short_prefixes() {
        assert_eq!(StoreKey::total("home").flat(), "t:home");
        assert_eq!(StoreKey::unique("home").flat(), "n:home");
        assert_eq!(StoreKey::updated_at("home").flat(), "updated:home");
        assert_eq!(
            StoreKey::unique_marker("home", "2024-05-01", "1.2.3.4").flat(),
            "u:home:2024-05-01:1.2.3.4"
        );
        assert_eq!(
            StoreKey::throttle_marker("home", "1.2.3.4").flat(),
            "th:home:1.2.3.4"
        );
    }

    #[test]
    fn document_paths_are_per_field() {
        assert_eq!(
            StoreKey::total("blog").document_segments(),
            vec!["counters", "blog", "total.json"]
        );
        assert_eq!(
            StoreKey::updated_at("blog").document_segments(),
            vec!["counters", "blog", "updated_at.json"]
        );
    }

    #[test]
    fn document_segments_replace_reserved_characters() {
        assert_eq!(
            StoreKey::unique_marker("a.b/c", "2024-05-01", "10.0.0.1").document_segments(),
            vec!["counters", "a_b_c", "seen", "2024-05-01", "10_0_0_1.json"]
        );
    }
}
