use super::param::{self, Param, ParamType};
use super::{read_state, write_state, Action, ActionCallback};
use crate::domain::errors::ActionResult;
use crate::domain::world::World;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const INFO: &str =
    "Set/Animates the camera position and zoom. Also can set the actor the camera follows";

const PARAMS: &[Param] = &[
    Param::new("pos", "The target position", ParamType::Vector2),
    Param::new("zoom", "The target zoom", ParamType::Float),
    Param::new(
        "duration",
        "Duration of the animation in seconds. If not 0 the camera is animated",
        ParamType::Float,
    )
    .with_default("0"),
    Param::new(
        "followActor",
        "Sets the actor to follow. 'none' puts no actor to follow",
        ParamType::String,
    ),
    Param::new(
        "wait",
        "If false the action continues immediately",
        ParamType::Boolean,
    )
    .with_default("true"),
];

/// 相机动作
///
/// 未设置的 `pos` / `zoom` 使用相机当前值。位置是场景单位，执行时乘以资源缩放。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraAction {
    pos: Option<Vec2>,
    zoom: Option<f32>,
    duration: f32,
    follow_actor: Option<String>,
    wait: bool,
}

impl Default for CameraAction {
    fn default() -> Self {
        Self {
            pos: None,
            zoom: None,
            duration: 0.0,
            follow_actor: None,
            wait: true,
        }
    }
}

impl CameraAction {
    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

impl Action for CameraAction {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn info(&self) -> &'static str {
        INFO
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()> {
        let name = self.name();
        self.follow_actor = param::get_string(params, "followActor");
        self.pos = param::get_string(params, "pos")
            .map(|v| param::parse_vector2(name, "pos", &v))
            .transpose()?;
        self.zoom = param::get_string(params, "zoom")
            .map(|v| param::parse_float(name, "zoom", &v))
            .transpose()?;
        self.duration = param::get_string(params, "duration")
            .map(|v| param::parse_float(name, "duration", &v))
            .transpose()?
            .unwrap_or(0.0);
        self.wait = param::get_string(params, "wait").map_or(true, |v| param::parse_bool(&v));

        if self.duration == 0.0 {
            self.wait = false;
        }
        Ok(())
    }

    fn run(&mut self, world: &mut World, cb: ActionCallback) -> ActionResult<bool> {
        let scale = world.asset_scale();
        let (current_pos, current_zoom) = {
            let camera = &world.current_scene()?.camera;
            (camera.position, camera.zoom)
        };

        let zoom = self.zoom.unwrap_or(current_zoom);
        let target = self.pos.map_or(current_pos, |p| p * scale);

        match self.follow_actor.as_deref() {
            Some("none") => world.set_camera_follow(None)?,
            Some(actor) => world.set_camera_follow(Some(actor))?,
            None => {}
        }

        tracing::debug!(
            target: "camera",
            "Camera to {:?} zoom {} in {}s",
            target,
            zoom,
            self.duration
        );

        if self.duration == 0.0 {
            world.set_camera(target, zoom)?;
            Ok(false)
        } else {
            let callback = self.wait.then_some(cb);
            world.start_camera_tween(target, zoom, self.duration, callback)?;
            Ok(self.wait)
        }
    }

    fn write(&self) -> ActionResult<serde_json::Value> {
        write_state(self.name(), self)
    }

    fn read(&mut self, value: &serde_json::Value) -> ActionResult<()> {
        *self = read_state(self.name(), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_zero_duration_never_waits() {
        let mut action = CameraAction::default();
        action
            .set_params(&params(&[("pos", "10,20"), ("wait", "true")]))
            .unwrap();
        assert_eq!(action.duration(), 0.0);
        assert!(!action.wait());
    }

    #[test]
    fn test_animated_waits_by_default() {
        let mut action = CameraAction::default();
        action
            .set_params(&params(&[("pos", "10,20"), ("duration", "1.5")]))
            .unwrap();
        assert!(action.wait());

        action
            .set_params(&params(&[("duration", "1.5"), ("wait", "False")]))
            .unwrap();
        assert!(!action.wait());
    }

    #[test]
    fn test_invalid_zoom() {
        let mut action = CameraAction::default();
        assert!(action.set_params(&params(&[("zoom", "huge")])).is_err());
    }

    #[test]
    fn test_state_roundtrip() {
        let mut action = CameraAction::default();
        action
            .set_params(&params(&[("pos", "1,2"), ("followActor", "guybrush")]))
            .unwrap();
        let state = action.write().unwrap();

        let mut restored = CameraAction::default();
        restored.read(&state).unwrap();
        assert_eq!(restored, action);
    }
}
