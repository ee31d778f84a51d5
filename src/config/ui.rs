/// 界面配置

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 界面配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// 屏幕宽度（像素）
    pub screen_width: f32,

    /// 屏幕高度（像素）
    pub screen_height: f32,

    /// 字幕行距离屏幕底部的比例
    pub subtitle_line: f32,

    /// 片尾字幕滚动速度（像素/秒，乘以界面缩放）
    pub credits_speed: f32,

    /// 界面缩放（dp）
    pub scale: f32,

    /// 饼菜单按钮半径（像素）
    pub pie_radius: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            subtitle_line: 0.1,
            credits_speed: 30.0,
            scale: 1.0,
            pie_radius: 80.0,
        }
    }
}

impl UiConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(ConfigError::ValidationError("Invalid screen size".to_string()));
        }
        if !(0.0..=1.0).contains(&self.subtitle_line) {
            return Err(ConfigError::ValidationError("Invalid subtitle line".to_string()));
        }
        if self.scale <= 0.0 {
            return Err(ConfigError::ValidationError("Invalid UI scale".to_string()));
        }
        Ok(())
    }
}
