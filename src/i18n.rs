//! 本地化文本
//!
//! 以 `@` 开头的文本是本地化键，例如角色描述 `@door.desc`。翻译文件是
//! `key=value` 格式，`#` 开头的行为注释。

use crate::core::utils::language_code;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 本地化键前缀
pub const KEY_PREFIX: char = '@';

#[derive(Debug, Clone, Default)]
pub struct I18n {
    strings: HashMap<String, String>,
    locale: Option<String>,
}

impl I18n {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 `key=value` 文本
    pub fn from_properties(content: &str) -> Self {
        let strings = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| l.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().replace("\\n", "\n")))
            .collect();
        Self {
            strings,
            locale: None,
        }
    }

    /// 加载 `<dir>/<base>_<lang>.properties`，不存在时回退到 `<dir>/<base>.properties`
    pub fn load(dir: &Path, base: &str, locale: Option<&str>) -> std::io::Result<Self> {
        let path = localized_path(dir, base, "properties", locale);
        let mut i18n = Self::from_properties(&fs::read_to_string(&path)?);
        i18n.locale = locale.map(str::to_string);
        tracing::debug!(target: "engine", "Loaded {} strings from {:?}", i18n.strings.len(), path);
        Ok(i18n)
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// 翻译文本；不是键或找不到翻译时原样返回（去掉 `@`）
    pub fn translate(&self, text: &str) -> String {
        match text.strip_prefix(KEY_PREFIX) {
            Some(key) => match self.strings.get(key) {
                Some(value) => value.clone(),
                None => {
                    tracing::warn!(target: "engine", "Missing translation for '{}'", key);
                    key.to_string()
                }
            },
            None => text.to_string(),
        }
    }
}

/// 按语言查找本地化文件：`<dir>/<base>_<lang>.<ext>` 存在时使用，否则 `<dir>/<base>.<ext>`
pub fn localized_path(dir: &Path, base: &str, ext: &str, locale: Option<&str>) -> PathBuf {
    if let Some(lang) = locale.and_then(language_code) {
        let candidate = dir.join(format!("{}_{}.{}", base, lang, ext));
        if candidate.exists() {
            return candidate;
        }
    }
    dir.join(format!("{}.{}", base, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let i18n = I18n::from_properties("# comment\ndoor.desc = An old door\nmulti=a\\nb\n");
        assert_eq!(i18n.translate("@door.desc"), "An old door");
        assert_eq!(i18n.translate("@multi"), "a\nb");
        assert_eq!(i18n.translate("plain text"), "plain text");
        assert_eq!(i18n.translate("@missing"), "missing");
        assert_eq!(i18n.len(), 2);
    }

    #[test]
    fn test_localized_path_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("credits.txt"), "").unwrap();
        fs::write(dir.path().join("credits_es.txt"), "").unwrap();

        assert_eq!(
            localized_path(dir.path(), "credits", "txt", Some("es_ES")),
            dir.path().join("credits_es.txt")
        );
        assert_eq!(
            localized_path(dir.path(), "credits", "txt", Some("fr_FR")),
            dir.path().join("credits.txt")
        );
        assert_eq!(
            localized_path(dir.path(), "credits", "txt", None),
            dir.path().join("credits.txt")
        );
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("world_es.properties"), "door=Una puerta\n").unwrap();
        let i18n = I18n::load(dir.path(), "world", Some("es")).unwrap();
        assert_eq!(i18n.translate("@door"), "Una puerta");
        assert_eq!(i18n.locale(), Some("es"));
        assert!(I18n::load(dir.path(), "world", None).is_err());
    }
}
