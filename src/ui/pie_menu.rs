//! 饼菜单
//!
//! 点击角色时弹出：左边 `lookat`，右边 `talkto`（角色有该动词时）或 `pickup`。

use super::font::FontMetrics;
use crate::config::UiConfig;
use crate::domain::actor::Actor;
use crate::domain::world::World;
use crate::i18n::I18n;
use crate::verbs::{VerbRunnerId, LOOKAT_VERB, PICKUP_VERB, TALKTO_VERB};
use glam::Vec2;

/// 按钮间距（dp）
pub const UI_SPACE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieButton {
    LookAt,
    TalkTo,
    PickUp,
}

impl PieButton {
    pub fn verb(self) -> &'static str {
        match self {
            PieButton::LookAt => LOOKAT_VERB,
            PieButton::TalkTo => TALKTO_VERB,
            PieButton::PickUp => PICKUP_VERB,
        }
    }
}

/// 饼菜单状态
#[derive(Debug, Clone)]
pub struct PieMenu {
    target: Option<String>,
    desc: Option<String>,
    center: Vec2,
    right: PieButton,
    viewport: Vec2,
    button_size: f32,
    margin: f32,
}

impl PieMenu {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            target: None,
            desc: None,
            center: Vec2::ZERO,
            right: PieButton::PickUp,
            viewport: Vec2::new(config.screen_width, config.screen_height),
            button_size: config.pie_radius * 2.0 * config.scale,
            margin: UI_SPACE * config.scale,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn is_visible(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// 已翻译的目标描述
    pub fn description(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// 修正后的菜单中心（屏幕坐标）
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// 在 `pos` 处为角色弹出菜单，菜单不会超出屏幕
    pub fn show(&mut self, actor: &Actor, pos: Vec2, i18n: &I18n) {
        self.target = Some(actor.id.clone());
        self.desc = actor.desc.as_deref().map(|d| i18n.translate(d));
        self.right = if actor.has_verb(TALKTO_VERB) {
            PieButton::TalkTo
        } else {
            PieButton::PickUp
        };

        let size = self.button_size;
        let margin = self.margin;
        let mut center = pos;
        if center.x < size + margin {
            center.x = size + margin;
        } else if center.x > self.viewport.x - size - margin {
            center.x = self.viewport.x - size - margin;
        }
        if center.y < margin {
            center.y = margin;
        } else if center.y > self.viewport.y - size - margin {
            center.y = self.viewport.y - size - margin;
        }
        self.center = center;
        tracing::debug!(target: "ui", "Pie menu for '{}' at {:?}", actor.id, center);
    }

    pub fn hide(&mut self) {
        self.target = None;
        self.desc = None;
    }

    /// 可见按钮及其左下角位置
    pub fn buttons(&self) -> Vec<(PieButton, Vec2)> {
        if !self.is_visible() {
            return Vec::new();
        }
        let c = self.center;
        vec![
            (
                PieButton::LookAt,
                Vec2::new(c.x - self.button_size - self.margin / 2.0, c.y + self.margin),
            ),
            (self.right, Vec2::new(c.x + self.margin / 2.0, c.y + self.margin)),
        ]
    }

    /// 按钮所在位置，没有按钮时为 `None`
    pub fn button_at(&self, point: Vec2) -> Option<PieButton> {
        self.buttons().into_iter().find_map(|(button, origin)| {
            let inside = point.x >= origin.x
                && point.x <= origin.x + self.button_size
                && point.y >= origin.y
                && point.y <= origin.y + self.button_size;
            inside.then_some(button)
        })
    }

    /// 描述文本的基线位置（不超出屏幕左边）
    pub fn description_position(&self, font: &dyn FontMetrics) -> Option<Vec2> {
        let desc = self.desc.as_deref()?;
        let x = (self.center.x - font.text_width(desc) / 2.0).max(0.0);
        let y = self.center.y - font.line_height() - UI_SPACE;
        Some(Vec2::new(x, y))
    }

    /// 选择按钮：对目标运行动词并隐藏菜单
    pub fn select(&mut self, button: PieButton, world: &mut World) -> Option<VerbRunnerId> {
        let target = self.target.take()?;
        self.desc = None;
        if button != PieButton::LookAt && button != self.right {
            tracing::warn!(target: "ui", "Pie button {:?} is not shown for '{}'", button, target);
            return None;
        }
        world.run_verb(Some(&target), button.verb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verbs::Verb;

    fn menu() -> PieMenu {
        PieMenu::new(&UiConfig::default())
    }

    #[test]
    fn test_right_button_depends_on_talkto() {
        let mut menu = menu();
        let i18n = I18n::new();
        menu.show(&Actor::new("door"), Vec2::new(500.0, 500.0), &i18n);
        assert_eq!(menu.buttons()[1].0, PieButton::PickUp);

        let pirate = Actor::new("pirate").with_verb(Verb::new(TALKTO_VERB));
        menu.show(&pirate, Vec2::new(500.0, 500.0), &i18n);
        assert_eq!(menu.buttons()[1].0, PieButton::TalkTo);
        assert_eq!(menu.buttons()[0].0, PieButton::LookAt);
    }

    #[test]
    fn test_clamped_to_viewport() {
        let mut menu = menu();
        let i18n = I18n::new();
        let door = Actor::new("door");

        menu.show(&door, Vec2::new(0.0, 0.0), &i18n);
        assert_eq!(menu.center(), Vec2::new(170.0, 10.0));

        menu.show(&door, Vec2::new(1920.0, 1080.0), &i18n);
        assert_eq!(menu.center(), Vec2::new(1920.0 - 170.0, 1080.0 - 170.0));
    }

    #[test]
    fn test_description_is_translated() {
        let mut menu = menu();
        let mut i18n = I18n::new();
        i18n.insert("door.desc", "A door");
        let mut door = Actor::new("door");
        door.desc = Some("@door.desc".to_string());

        menu.show(&door, Vec2::new(500.0, 500.0), &i18n);
        assert_eq!(menu.description(), Some("A door"));

        let font = crate::ui::font::MonospaceFont::default();
        assert_eq!(menu.description_position(&font), Some(Vec2::new(470.0, 470.0)));
    }

    #[test]
    fn test_button_hit_and_hide() {
        let mut menu = menu();
        menu.show(&Actor::new("door"), Vec2::new(500.0, 500.0), &I18n::new());
        assert_eq!(menu.button_at(Vec2::new(400.0, 520.0)), Some(PieButton::LookAt));
        assert_eq!(menu.button_at(Vec2::new(600.0, 520.0)), Some(PieButton::PickUp));
        assert_eq!(menu.button_at(Vec2::new(500.0, 400.0)), None);

        menu.hide();
        assert!(!menu.is_visible());
        assert!(menu.buttons().is_empty());
    }
}
