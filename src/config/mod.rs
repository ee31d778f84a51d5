/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和配置验证
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod assets;
pub mod text;
pub mod ui;

pub use assets::AssetsConfig;
pub use text::TextConfig;
pub use ui::UiConfig;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 引擎主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdventureConfig {
    /// 字幕配置
    #[serde(default)]
    pub text: TextConfig,

    /// 界面配置
    #[serde(default)]
    pub ui: UiConfig,

    /// 资源配置
    #[serde(default)]
    pub assets: AssetsConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdventureConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        // 字幕
        if let Ok(val) = env::var("ADVENTURE_TEXT_TIME_PER_CHAR") {
            if let Ok(t) = val.parse() {
                self.text.time_per_char = t;
            }
        }
        if let Ok(val) = env::var("ADVENTURE_TEXT_MIN_TIME") {
            if let Ok(t) = val.parse() {
                self.text.min_time = t;
            }
        }

        // 资源
        if let Ok(val) = env::var("ADVENTURE_ASSETS_ROOT") {
            self.assets.root = val;
        }
        if let Ok(val) = env::var("ADVENTURE_ASSETS_SCALE") {
            if let Ok(scale) = val.parse() {
                self.assets.scale = scale;
            }
        }
        if let Ok(val) = env::var("ADVENTURE_LOCALE") {
            self.assets.locale = Some(val).filter(|l| !l.is_empty());
        }

        // 界面
        if let Ok(val) = env::var("ADVENTURE_UI_SCALE") {
            if let Ok(scale) = val.parse() {
                self.ui.scale = scale;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.text.validate()?;
        self.ui.validate()?;
        self.assets.validate()?;
        Ok(())
    }

    /// 用户配置目录下的配置文件路径
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("adventure_engine").join("adventure.toml"))
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./adventure.toml
    /// 2. ./adventure.json
    /// 3. <config_dir>/adventure_engine/adventure.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("adventure.toml") {
            tracing::info!(target: "engine", "Loaded config from adventure.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("adventure.json") {
            tracing::info!(target: "engine", "Loaded config from adventure.json");
            return config;
        }

        if let Some(config_path) = Self::user_config_path() {
            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "engine", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "engine", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（`RUST_LOG` 未设置时使用）
    pub level: LogLevel,

    /// 是否输出目标名
    pub with_target: bool,
}

use crate::impl_default;

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    with_target: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// `EnvFilter` 指令
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdventureConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = AdventureConfig::default();
        config.assets.locale = Some("es_ES".to_string());
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AdventureConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let config = AdventureConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = AdventureConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config.text, parsed.text);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AdventureConfig::from_toml_str("[text]\ntime_per_char = 0.05\nmin_time = 2.0\n").unwrap();
        assert_eq!(config.text.min_time, 2.0);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_scale() {
        let mut config = AdventureConfig::default();
        config.assets.scale = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adventure.toml");
        let mut config = AdventureConfig::default();
        config.ui.scale = 2.0;
        config.save_toml(&path).unwrap();
        assert_eq!(AdventureConfig::from_toml_file(&path).unwrap(), config);

        let path = dir.path().join("adventure.json");
        config.save_json(&path).unwrap();
        assert_eq!(AdventureConfig::from_json_file(&path).unwrap(), config);
    }
}
