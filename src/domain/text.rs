//! 字幕与文本管理
//!
//! `TextManager` 按队列显示字幕，每条字幕在显示时间结束（或被跳过）时
//! 触发其回调，使等待中的动词继续执行。

use crate::actions::callback::{ActionCallback, ResumeQueue};
use crate::config::TextConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// 解析颜色名或 `"r,g,b[,a]"`（分量 0..1）
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "black" => return Some(Self::BLACK),
            "white" => return Some(Self::WHITE),
            "red" => return Some(Self::RED),
            "green" => return Some(Self::GREEN),
            "blue" => return Some(Self::BLUE),
            "yellow" => return Some(Self::YELLOW),
            _ => {}
        }

        let parts: Vec<f32> = value
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self { r: *r, g: *g, b: *b, a: 1.0 }),
            [r, g, b, a] => Some(Self { r: *r, g: *g, b: *b, a: *a }),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// 字幕类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextType {
    /// 纯文本
    #[default]
    Plain,
    /// 带矩形背景
    Rectangle,
    /// 角色说话（气泡，居中于说话者）
    Talk,
}

/// 单个坐标轴上的锚点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    /// 场景坐标
    At(f32),
    /// 屏幕居中
    Center,
    /// 字幕行
    Subtitle,
}

/// 字幕位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    pub x: Anchor,
    pub y: Anchor,
}

impl TextPosition {
    pub fn scene(pos: Vec2) -> Self {
        Self {
            x: Anchor::At(pos.x),
            y: Anchor::At(pos.y),
        }
    }

    pub fn subtitle() -> Self {
        Self {
            x: Anchor::Center,
            y: Anchor::Subtitle,
        }
    }

    pub fn center() -> Self {
        Self {
            x: Anchor::Center,
            y: Anchor::Center,
        }
    }
}

/// 屏幕上的一条字幕
#[derive(Debug, Serialize, Deserialize)]
pub struct Text {
    pub str: String,
    pub position: TextPosition,
    pub ty: TextType,
    pub color: Color,
    /// 剩余显示时间（秒）
    pub time: f32,
    callback: Option<ActionCallback>,
    #[serde(default)]
    restore: Option<AnimationRestore>,
}

/// 字幕结束时要恢复的角色动画
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationRestore {
    pub actor: String,
    pub animation: String,
}

impl Text {
    fn finish(mut self, resumes: &mut ResumeQueue, restores: &mut Vec<AnimationRestore>) {
        if let Some(cb) = self.callback.take() {
            cb.resume(resumes);
        }
        restores.extend(self.restore.take());
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

/// 字幕管理器
///
/// 同一时间只显示一条字幕；`queue == false` 的新字幕会替换当前和排队中的字幕，
/// 被替换字幕的回调会立即触发，保证等待者一定被恢复。
/// 结束的字幕带有的动画恢复请求由 `take_restores` 取出。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TextManager {
    current: Option<Text>,
    queue: VecDeque<Text>,
    #[serde(skip)]
    config: TextConfig,
    #[serde(skip)]
    restores: Vec<AnimationRestore>,
}

impl TextManager {
    pub fn new(config: TextConfig) -> Self {
        Self {
            current: None,
            queue: VecDeque::new(),
            config,
            restores: Vec::new(),
        }
    }

    pub fn config(&self) -> TextConfig {
        self.config
    }

    pub fn set_config(&mut self, config: TextConfig) {
        self.config = config;
    }

    /// 根据字符数计算显示时间
    pub fn display_time(&self, str: &str) -> f32 {
        let chars = str.chars().count() as f32;
        (chars * self.config.time_per_char).max(self.config.min_time)
    }

    /// 添加字幕
    #[allow(clippy::too_many_arguments)]
    pub fn add_subtitle(
        &mut self,
        str: impl Into<String>,
        position: TextPosition,
        queue: bool,
        ty: TextType,
        color: Color,
        callback: Option<ActionCallback>,
        resumes: &mut ResumeQueue,
    ) {
        let str = str.into();
        let text = Text {
            time: self.display_time(&str),
            str,
            position,
            ty,
            color,
            callback,
            restore: None,
        };
        tracing::debug!(target: "text", "Subtitle ({:?}): {}", text.ty, text.str);

        if queue {
            self.queue.push_back(text);
            if self.current.is_none() {
                self.next(resumes);
            }
        } else {
            self.reset(resumes);
            self.current = Some(text);
        }
    }

    /// 最后添加的字幕结束时恢复角色动画
    pub fn restore_on_finish(&mut self, restore: AnimationRestore) {
        let last = match self.queue.back_mut() {
            Some(text) => Some(text),
            None => self.current.as_mut(),
        };
        match last {
            Some(text) => text.restore = Some(restore),
            None => self.restores.push(restore),
        }
    }

    /// 取出已结束字幕的动画恢复请求
    pub fn take_restores(&mut self) -> Vec<AnimationRestore> {
        std::mem::take(&mut self.restores)
    }

    /// 当前显示的字幕
    pub fn current_subtitle(&self) -> Option<&Text> {
        self.current.as_ref()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// 结束当前字幕并显示下一条
    pub fn next(&mut self, resumes: &mut ResumeQueue) {
        if let Some(text) = self.current.take() {
            text.finish(resumes, &mut self.restores);
        }
        self.current = self.queue.pop_front();
    }

    /// 跳过当前字幕（玩家点击）
    pub fn skip(&mut self, resumes: &mut ResumeQueue) {
        if self.current.is_some() {
            self.next(resumes);
        }
    }

    /// 清空所有字幕，触发全部回调
    pub fn reset(&mut self, resumes: &mut ResumeQueue) {
        if let Some(text) = self.current.take() {
            text.finish(resumes, &mut self.restores);
        }
        for text in self.queue.drain(..) {
            text.finish(resumes, &mut self.restores);
        }
    }

    /// 每帧更新
    pub fn update(&mut self, delta: f32, resumes: &mut ResumeQueue) {
        let expired = match self.current.as_mut() {
            Some(text) => {
                text.time -= delta;
                text.time <= 0.0
            }
            None => false,
        };
        if expired {
            self.next(resumes);
        }
    }
}
