/// 字幕配置

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 字幕显示时间配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// 每个字符的显示时间（秒）
    pub time_per_char: f32,

    /// 最短显示时间（秒）
    pub min_time: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            time_per_char: 0.1,
            min_time: 1.5,
        }
    }
}

impl TextConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.time_per_char < 0.0 {
            return Err(ConfigError::ValidationError(
                "Text time per char must not be negative".to_string(),
            ));
        }
        if self.min_time < 0.0 {
            return Err(ConfigError::ValidationError(
                "Text min time must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
