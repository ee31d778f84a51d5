//! 核心工具函数
//!
//! 提供项目中常用的工具函数，避免代码重复

/// 获取当前Unix时间戳（秒）
///
/// 返回自1970年1月1日以来的秒数，存档元数据使用。
///
/// # 示例
///
/// ```rust
/// use adventure_engine::core::utils::current_timestamp;
///
/// let saved_at = current_timestamp();
/// assert!(saved_at > 0);
/// ```
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 从区域设置字符串中提取语言代码
///
/// `"es_ES.UTF-8"` → `"es"`，`"en-US"` → `"en"`。空字符串返回 `None`。
pub fn language_code(locale: &str) -> Option<&str> {
    let lang = locale
        .split(|c| c == '_' || c == '-' || c == '.')
        .next()
        .unwrap_or_default();
    if lang.is_empty() || lang.eq_ignore_ascii_case("C") || lang.eq_ignore_ascii_case("POSIX") {
        None
    } else {
        Some(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp() {
        let ts1 = current_timestamp();
        let ts2 = current_timestamp();
        assert!(ts2 >= ts1);
    }

    #[test]
    fn test_language_code() {
        assert_eq!(language_code("es_ES.UTF-8"), Some("es"));
        assert_eq!(language_code("en-US"), Some("en"));
        assert_eq!(language_code("fr"), Some("fr"));
        assert_eq!(language_code("C"), None);
        assert_eq!(language_code(""), None);
    }
}
