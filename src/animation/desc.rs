//! 动画描述与动画ID命名约定
//!
//! 动画ID通过后缀编码状态和朝向：`<state>.<direction>`，例如 `talk.left`、
//! `stand.right`。渲染器（镜像回退）、对话动作（说话/站立切换）都依赖这套约定。

use serde::{Deserialize, Serialize};
use std::num::ParseFloatError;

/// 说话动画前缀
pub const TALK_ANIM: &str = "talk";
/// 站立动画前缀
pub const STAND_ANIM: &str = "stand";
/// 行走动画前缀
pub const WALK_ANIM: &str = "walk";

pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const FRONT: &str = "front";
pub const BACK: &str = "back";

/// 无限循环次数
pub const INFINITY: i32 = -1;

/// 编辑器预览的默认时长（秒）
pub const DEFAULT_EDITOR_SPEED: f32 = 2.0;

/// 动画播放类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    /// 循环播放
    #[default]
    Repeat,
    /// 往返播放
    Yoyo,
    /// 只播放一次
    NoRepeat,
    /// 倒放
    Reverse,
}

/// 动画描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDesc {
    pub id: String,
    pub source: String,
    /// 一个周期的时长（秒）
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub delay: f32,
    /// 播放次数，`INFINITY` 表示无限
    #[serde(default = "default_count")]
    pub count: i32,
    #[serde(default)]
    pub anim_type: AnimationType,
    /// 开始播放时触发的音效ID
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub preload: bool,
    #[serde(default)]
    pub dispose_when_played: bool,
}

fn default_count() -> i32 {
    INFINITY
}

impl AnimationDesc {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            duration: 1.0,
            delay: 0.0,
            count: INFINITY,
            anim_type: AnimationType::Repeat,
            sound: None,
            preload: true,
            dispose_when_played: false,
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    pub fn with_type(mut self, anim_type: AnimationType) -> Self {
        self.anim_type = anim_type;
        self
    }

    /// 从编辑器的预览输入构建
    ///
    /// 空速度字符串使用默认值 2.0；类型 `yoyo` 为往返，其余为循环。
    pub fn from_editor_input(
        id: &str,
        source: &str,
        speed: &str,
        anim_type: &str,
    ) -> Result<Self, ParseFloatError> {
        let duration = if speed.trim().is_empty() {
            DEFAULT_EDITOR_SPEED
        } else {
            speed.trim().parse()?
        };
        let anim_type = if anim_type == "yoyo" {
            AnimationType::Yoyo
        } else {
            AnimationType::Repeat
        };
        Ok(Self {
            duration,
            anim_type,
            preload: false,
            dispose_when_played: true,
            ..Self::new(id, source)
        })
    }

    /// 实际播放次数（`NoRepeat` 固定为 1）
    pub fn effective_count(&self) -> i32 {
        match self.anim_type {
            AnimationType::NoRepeat => 1,
            _ => self.count,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.effective_count() != INFINITY
    }
}

/// 第一个 `.` 开始的后缀（含 `.`），没有则为空串
pub fn direction_suffix(id: &str) -> &str {
    id.find('.').map_or("", |idx| &id[idx..])
}

/// 与动画同朝向的站立动画：`talk.left` → `stand.left`
pub fn stand_pose(id: &str) -> String {
    format!("{}{}", STAND_ANIM, direction_suffix(id))
}

/// 左右镜像的动画ID：`walk.left` ↔ `walk.right`
pub fn flipped(id: &str) -> Option<String> {
    if let Some(base) = id.strip_suffix(LEFT).filter(|b| b.ends_with('.')) {
        Some(format!("{}{}", base, RIGHT))
    } else {
        id.strip_suffix(RIGHT)
            .filter(|b| b.ends_with('.'))
            .map(|base| format!("{}{}", base, LEFT))
    }
}

pub fn with_direction(base: &str, direction: &str) -> String {
    format!("{}.{}", base, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_suffix() {
        assert_eq!(direction_suffix("talk.left"), ".left");
        assert_eq!(direction_suffix("walk.front.fast"), ".front.fast");
        assert_eq!(direction_suffix("idle"), "");
    }

    #[test]
    fn test_stand_pose() {
        assert_eq!(stand_pose("talk.right"), "stand.right");
        assert_eq!(stand_pose("talk"), "stand");
    }

    #[test]
    fn test_flipped() {
        assert_eq!(flipped("walk.left").as_deref(), Some("walk.right"));
        assert_eq!(flipped("walk.right").as_deref(), Some("walk.left"));
        assert_eq!(flipped("walk.front"), None);
        assert_eq!(flipped("bright"), None);
    }

    #[test]
    fn test_from_editor_input() {
        let desc = AnimationDesc::from_editor_input("idle", "guybrush", "", "yoyo").unwrap();
        assert_eq!(desc.duration, DEFAULT_EDITOR_SPEED);
        assert_eq!(desc.anim_type, AnimationType::Yoyo);
        assert_eq!(desc.count, INFINITY);

        let desc = AnimationDesc::from_editor_input("idle", "guybrush", "0.5", "repeat").unwrap();
        assert_eq!(desc.duration, 0.5);
        assert_eq!(desc.anim_type, AnimationType::Repeat);

        assert!(AnimationDesc::from_editor_input("idle", "guybrush", "fast", "").is_err());
    }

    #[test]
    fn test_effective_count() {
        let desc = AnimationDesc::new("open", "door").with_type(AnimationType::NoRepeat);
        assert_eq!(desc.effective_count(), 1);
        assert!(desc.is_finite());
        assert!(!AnimationDesc::new("idle", "door").is_finite());
    }
}
