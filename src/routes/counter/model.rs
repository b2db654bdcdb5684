use serde::{Deserialize, Serialize};

use crate::cache::Counts;
use crate::utils::format_num;

#[derive(Debug, Default)]
pub struct CounterQuery {
    pub key: Option<String>,
    pub unique: Option<String>,
}

impl CounterQuery {
    /// 从查询参数对构建，重复参数取第一个值
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "key" if query.key.is_none() => query.key = Some(value),
                "unique" if query.unique.is_none() => query.unique = Some(value),
                _ => {}
            }
        }
        query
    }

    /// 只有 `unique=1` 才开启去重
    pub fn unique_mode(&self) -> bool {
        self.unique.as_deref() == Some("1")
    }
}

/// `/get` 与 `/hit` 的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterView {
    pub key: String,
    pub total: u64,
    pub unique: u64,
    pub total_formatted: String,
    pub unique_formatted: String,
    pub updated_at: Option<String>,
}

impl CounterView {
    pub fn new(key: String, counts: Counts) -> Self {
        Self {
            key,
            total: counts.total,
            unique: counts.unique,
            total_formatted: format_num(counts.total),
            unique_formatted: format_num(counts.unique),
            updated_at: counts.updated_at,
        }
    }
}

/// 解析计数器键：优先 `key` 参数（去空白），其次路径剩余部分（去掉首尾斜杠），最后默认键
pub fn resolve_key(
    query: &CounterQuery,
    path_remainder: &str,
    infer_from_path: bool,
    default_key: &str,
) -> String {
    if let Some(key) = query.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        return key.to_string();
    }

    if infer_from_path {
        let inferred = path_remainder.trim_matches('/');
        if !inferred.is_empty() {
            return inferred.to_string();
        }
    }

    default_key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(key: Option<&str>) -> CounterQuery {
        CounterQuery {
            key: key.map(str::to_string),
            unique: None,
        }
    }

    #[test]
    fn key_parameter_wins() {
        assert_eq!(resolve_key(&query(Some("  blog  ")), "/other/", true, "home"), "blog");
    }

    #[test]
    fn blank_key_falls_through_to_path() {
        assert_eq!(
            resolve_key(&query(Some("   ")), "/posts/hello/", true, "home"),
            "posts/hello"
        );
    }

    #[test]
    fn path_inference_can_be_disabled() {
        assert_eq!(resolve_key(&query(None), "/posts/hello", false, "default"), "default");
    }

    #[test]
    fn empty_everything_uses_default() {
        assert_eq!(resolve_key(&query(None), "", true, "home"), "home");
        assert_eq!(resolve_key(&query(None), "///", true, "home"), "home");
    }

    #[test]
    fn unique_mode_requires_literal_one() {
        let mut q = query(None);
        assert!(!q.unique_mode());
        q.unique = Some("true".to_string());
        assert!(!q.unique_mode());
        q.unique = Some("1".to_string());
        assert!(q.unique_mode());
    }

    #[test]
    fn repeated_parameters_keep_the_first_value() {
        let q = CounterQuery::from_pairs(vec![
            ("key".to_string(), "a".to_string()),
            ("unique".to_string(), "1".to_string()),
            ("key".to_string(), "b".to_string()),
            ("unique".to_string(), "0".to_string()),
            ("other".to_string(), "x".to_string()),
        ]);
        assert_eq!(q.key.as_deref(), Some("a"));
        assert!(q.unique_mode());
    }

    #[test]
    fn view_formats_counts() {
        let view = CounterView::new(
            "home".to_string(),
            Counts {
                total: 1234,
                unique: 999,
                updated_at: None,
            },
        );
        assert_eq!(view.total_formatted, "1.2K");
        assert_eq!(view.unique_formatted, "999");
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["updated_at"].is_null());
    }
}
