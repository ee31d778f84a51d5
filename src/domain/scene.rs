//! 场景领域对象
//!
//! 场景是角色的容器，持有相机、玩家角色、相机跟随角色和场景级动词。

use crate::domain::actor::Actor;
use crate::domain::camera::SceneCamera;
use crate::domain::errors::{SceneError, SceneResult};
use crate::verbs::{find_verb, Verb};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 场景
///
/// ## 业务规则
///
/// 1. 场景内角色ID唯一
/// 2. 玩家角色和跟随角色必须是场景中的角色
/// 3. 设置了 `size` 的场景，相机不会移出场景范围
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    actors: Vec<Actor>,
    /// 玩家角色ID
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub camera: SceneCamera,
    #[serde(default)]
    pub follow_actor: Option<String>,
    #[serde(default)]
    pub verbs: Vec<Verb>,
    /// 场景尺寸（场景单位）
    #[serde(default)]
    pub size: Option<Vec2>,
    #[serde(default)]
    pub music: Option<String>,
}

impl Scene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.add_actor(actor);
        self
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn with_verb(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    /// 添加角色，同ID的角色被替换
    pub fn add_actor(&mut self, actor: Actor) {
        match self.actors.iter_mut().find(|a| a.id == actor.id) {
            Some(existing) => *existing = actor,
            None => self.actors.push(actor),
        }
    }

    pub fn remove_actor(&mut self, id: &str) -> Option<Actor> {
        let idx = self.actors.iter().position(|a| a.id == id)?;
        if self.follow_actor.as_deref() == Some(id) {
            self.follow_actor = None;
        }
        Some(self.actors.remove(idx))
    }

    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: &str) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn player(&self) -> SceneResult<&Actor> {
        self.player
            .as_deref()
            .and_then(|id| self.actor(id))
            .ok_or_else(|| SceneError::NoPlayer(self.id.clone()))
    }

    pub fn verb(&self, id: &str) -> Option<&Verb> {
        find_verb(&self.verbs, id)
    }

    /// 点击位置下最上层的可交互角色
    pub fn actor_at(&self, point: Vec2) -> Option<&Actor> {
        self.actors
            .iter()
            .rev()
            .find(|a| a.visible && a.interaction && a.hit(point))
    }

    /// 检查引用的角色是否存在
    pub fn validate(&self) -> SceneResult<()> {
        for (i, actor) in self.actors.iter().enumerate() {
            if self.actors[..i].iter().any(|a| a.id == actor.id) {
                tracing::warn!(
                    target: "scene",
                    "Duplicated actor '{}' in scene '{}'",
                    actor.id,
                    self.id
                );
            }
        }
        if let Some(player) = self.player.as_deref() {
            if self.actor(player).is_none() {
                return Err(SceneError::ActorNotFound(player.to_string()));
            }
        }
        if let Some(follow) = self.follow_actor.as_deref() {
            if self.actor(follow).is_none() {
                return Err(SceneError::ActorNotFound(follow.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player() {
        let scene = Scene::new("deck")
            .with_actor(Actor::new("guybrush"))
            .with_player("guybrush");
        assert_eq!(scene.player().map(|a| a.id.as_str()), Ok("guybrush"));

        let scene = Scene::new("deck");
        assert_eq!(
            scene.player().map(|a| a.id.clone()),
            Err(SceneError::NoPlayer("deck".to_string()))
        );
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut scene = Scene::new("deck");
        scene.add_actor(Actor::new("door"));
        scene.add_actor(Actor::new("door").with_position(Vec2::new(5.0, 0.0)));
        assert_eq!(scene.actors().len(), 1);
        assert_eq!(scene.actor("door").map(|a| a.position.x), Some(5.0));
    }

    #[test]
    fn test_actor_at_skips_hidden() {
        let mut scene = Scene::new("deck")
            .with_actor(Actor::new("wall").with_bbox(Vec2::new(100.0, 100.0)))
            .with_actor(Actor::new("ghost").with_bbox(Vec2::new(100.0, 100.0)));
        if let Some(ghost) = scene.actor_mut("ghost") {
            ghost.visible = false;
        }
        assert_eq!(scene.actor_at(Vec2::new(0.0, 50.0)).map(|a| a.id.as_str()), Some("wall"));
    }

    #[test]
    fn test_validate() {
        let mut scene = Scene::new("deck").with_player("nobody");
        assert_eq!(scene.validate(), Err(SceneError::ActorNotFound("nobody".to_string())));
        scene.player = None;
        scene.follow_actor = Some("guybrush".to_string());
        assert!(scene.validate().is_err());
        scene.add_actor(Actor::new("guybrush"));
        assert!(scene.validate().is_ok());
    }
}
