/// 资源配置

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 资源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// 项目根目录
    pub root: String,

    /// 资源缩放（场景单位 → 像素）
    pub scale: f32,

    /// 语言区域，例如 `es_ES`；为空时使用默认文本
    pub locale: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            scale: 1.0,
            locale: None,
        }
    }
}

impl AssetsConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scale <= 0.0 {
            return Err(ConfigError::ValidationError("Invalid asset scale".to_string()));
        }
        if self.root.is_empty() {
            return Err(ConfigError::ValidationError("Empty assets root".to_string()));
        }
        Ok(())
    }
}
