//! 角色领域对象
//!
//! 角色是场景中可交互的实体。带有 `renderer` 的角色即"精灵角色"，可以播放动画。

use crate::animation::AnimationRenderer;
use crate::domain::dialog::Dialog;
use crate::verbs::{find_verb, Verb};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 角色音效描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDesc {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub looping: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

/// 场景角色
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    /// 描述文本，以 `@` 开头时为本地化键
    #[serde(default)]
    pub desc: Option<String>,
    /// 场景坐标（脚底）
    #[serde(default)]
    pub position: Vec2,
    /// 包围盒尺寸（宽, 高）
    #[serde(default)]
    pub bbox: Vec2,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub interaction: bool,
    #[serde(default)]
    pub verbs: Vec<Verb>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDesc>,
    #[serde(default)]
    pub dialogs: HashMap<String, Dialog>,
    #[serde(default)]
    pub renderer: Option<AnimationRenderer>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            interaction: true,
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_bbox(mut self, bbox: Vec2) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_renderer(mut self, renderer: AnimationRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_verb(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    pub fn with_dialog(mut self, dialog: Dialog) -> Self {
        self.dialogs.insert(dialog.id.clone(), dialog);
        self
    }

    pub fn with_sound(mut self, sound: SoundDesc) -> Self {
        self.sounds.insert(sound.id.clone(), sound);
        self
    }

    pub fn is_sprite(&self) -> bool {
        self.renderer.is_some()
    }

    /// 精灵高度，没有渲染尺寸时使用包围盒高度
    pub fn height(&self) -> f32 {
        match &self.renderer {
            Some(r) if r.size.y > 0.0 => r.size.y,
            _ => self.bbox.y,
        }
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.renderer.as_ref().and_then(|r| r.current_animation_id())
    }

    pub fn verb(&self, id: &str) -> Option<&Verb> {
        find_verb(&self.verbs, id)
    }

    pub fn has_verb(&self, id: &str) -> bool {
        self.verb(id).is_some()
    }

    /// 音频后端使用的声音名
    pub fn sound_name(&self, sound: &str) -> String {
        format!("{}.{}", self.id, sound)
    }

    /// 点是否在包围盒内（包围盒底边中点在 `position`）
    pub fn hit(&self, point: Vec2) -> bool {
        let half_w = self.bbox.x / 2.0;
        point.x >= self.position.x - half_w
            && point.x <= self.position.x + half_w
            && point.y >= self.position.y
            && point.y <= self.position.y + self.bbox.y
    }
}

/// 背包
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Actor>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            visible: true,
        }
    }

    pub fn add(&mut self, actor: Actor) {
        self.items.push(actor);
    }

    pub fn remove(&mut self, id: &str) -> Option<Actor> {
        let idx = self.items.iter().position(|a| a.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Actor> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Actor> {
        self.items.iter_mut().find(|a| a.id == id)
    }

    pub fn items(&self) -> &[Actor] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Actor] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationDesc;

    #[test]
    fn test_height() {
        let actor = Actor::new("door").with_bbox(Vec2::new(40.0, 120.0));
        assert_eq!(actor.height(), 120.0);

        let mut renderer = AnimationRenderer::new();
        renderer.size = Vec2::new(50.0, 150.0);
        let actor = actor.with_renderer(renderer);
        assert_eq!(actor.height(), 150.0);
    }

    #[test]
    fn test_hit() {
        let actor = Actor::new("door")
            .with_position(Vec2::new(100.0, 0.0))
            .with_bbox(Vec2::new(40.0, 120.0));
        assert!(actor.hit(Vec2::new(110.0, 60.0)));
        assert!(!actor.hit(Vec2::new(130.0, 60.0)));
        assert!(!actor.hit(Vec2::new(100.0, 121.0)));
    }

    #[test]
    fn test_actor_json_defaults() {
        let json = r#"{
            "id": "guybrush",
            "position": [10.0, 20.0],
            "renderer": {"animations": {"stand.left": {"id": "stand.left", "source": "guybrush"}}}
        }"#;
        let actor: Actor = serde_json::from_str(json).unwrap();
        assert!(actor.visible);
        assert!(actor.interaction);
        assert!(actor.is_sprite());
        let renderer = actor.renderer.as_ref().unwrap();
        let desc: &AnimationDesc = &renderer.animations["stand.left"];
        assert_eq!(desc.source, "guybrush");
        assert!(!desc.is_finite());
    }

    #[test]
    fn test_inventory() {
        let mut inventory = Inventory::new();
        inventory.add(Actor::new("key"));
        inventory.add(Actor::new("map"));
        assert!(inventory.get("map").is_some());
        assert_eq!(inventory.remove("key").map(|a| a.id), Some("key".to_string()));
        assert_eq!(inventory.len(), 1);
    }
}
