//! 字幕布局
//!
//! 计算当前字幕在屏幕上的矩形。坐标原点在屏幕左下角，y 轴向上，与场景相机一致。

use super::font::FontMetrics;
use crate::config::UiConfig;
use crate::domain::camera::SceneCamera;
use crate::domain::text::{Anchor, Color, Text, TextType};
use glam::Vec2;

/// 边距（dp）
pub const MARGIN: f32 = 10.0;
/// 说话字幕的最大宽度（空格宽度的倍数）
pub const TALK_WIDTH_SPACES: f32 = 35.0;
/// 其他字幕的最大宽度（空格宽度的倍数）
pub const RECT_WIDTH_SPACES: f32 = 80.0;

/// 布局结果
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleBox {
    /// 左下角（含边距）
    pub position: Vec2,
    /// 尺寸（含边距）
    pub size: Vec2,
    pub lines: Vec<String>,
    pub ty: TextType,
    pub color: Color,
}

impl SubtitleBox {
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.size.y
    }
}

/// 字幕布局器
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleLayout {
    screen: Vec2,
    padding: f32,
    subtitle_line: f32,
    max_rect_width: f32,
    max_talk_width: f32,
}

impl SubtitleLayout {
    pub fn new(config: &UiConfig, font: &dyn FontMetrics) -> Self {
        let mut layout = Self {
            screen: Vec2::ZERO,
            padding: MARGIN * config.scale,
            subtitle_line: config.subtitle_line,
            max_rect_width: 0.0,
            max_talk_width: 0.0,
        };
        layout.resize(config.screen_width, config.screen_height, font);
        layout
    }

    /// 屏幕尺寸变化时重新计算最大宽度
    pub fn resize(&mut self, width: f32, height: f32, font: &dyn FontMetrics) {
        self.screen = Vec2::new(width, height);
        let available = width - self.padding * 2.0;
        self.max_rect_width = available.min(font.space_width() * RECT_WIDTH_SPACES);
        self.max_talk_width = available.min(font.space_width() * TALK_WIDTH_SPACES);
    }

    pub fn max_width(&self, ty: TextType) -> f32 {
        match ty {
            TextType::Talk => self.max_talk_width,
            TextType::Plain | TextType::Rectangle => self.max_rect_width,
        }
    }

    /// 计算字幕矩形
    ///
    /// 说话字幕水平居中于说话者；所有字幕都被限制在屏幕内（底边除外）。
    pub fn layout(&self, text: &Text, camera: &SceneCamera, font: &dyn FontMetrics) -> SubtitleBox {
        let max_width = self.max_width(text.ty);
        let lines = font.wrap(&text.str, max_width);
        let bounds = font.wrapped_bounds(&text.str, max_width);

        let anchor = |x: f32, y: f32| {
            let to_screen = self.screen / camera.viewport;
            camera.scene_to_screen(Vec2::new(x, y)) * to_screen
        };

        let x = match text.position.x {
            Anchor::At(x) => anchor(x, 0.0).x,
            Anchor::Center | Anchor::Subtitle => (self.screen.x - bounds.x) / 2.0,
        };
        let y = match text.position.y {
            Anchor::At(y) => anchor(0.0, y).y,
            Anchor::Center => (self.screen.y - bounds.y) / 2.0,
            Anchor::Subtitle => self.screen.y * self.subtitle_line,
        };

        let mut position = Vec2::new(x - self.padding, y - self.padding);
        if text.ty == TextType::Talk {
            position.x -= bounds.x / 2.0;
        }
        let size = bounds + Vec2::splat(self.padding * 2.0);

        if position.x < 0.0 {
            position.x = 0.0;
        } else if position.x + size.x > self.screen.x {
            position.x = self.screen.x - size.x;
        }
        if position.y + size.y > self.screen.y {
            position.y = self.screen.y - size.y;
        }

        SubtitleBox {
            position,
            size,
            lines,
            ty: text.ty,
            color: text.color,
        }
    }
}
