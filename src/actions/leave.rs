use super::param::{self, Param, ParamType};
use super::{read_state, write_state, Action, ActionCallback};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::world::World;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const INFO: &str =
    "Change the current scene. The target scene must exist in the current chapter unless a chapter is given";

const PARAMS: &[Param] = &[
    Param::new("scene", "The target scene", ParamType::Scene),
    Param::new("chapter", "The target chapter", ParamType::Chapter),
];

/// 切换场景或章节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveAction {
    scene: Option<String>,
    chapter: Option<String>,
}

impl Action for LeaveAction {
    fn name(&self) -> &'static str {
        "leave"
    }

    fn info(&self) -> &'static str {
        INFO
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()> {
        self.scene = param::get_string(params, "scene");
        self.chapter = param::get_string(params, "chapter");
        Ok(())
    }

    fn run(&mut self, world: &mut World, _cb: ActionCallback) -> ActionResult<bool> {
        match (self.chapter.as_deref(), self.scene.as_deref()) {
            (Some(chapter), scene) => world.load_chapter(chapter, scene)?,
            (None, Some(scene)) => world.set_current_scene(scene)?,
            (None, None) => {
                return Err(ActionError::MissingParam {
                    action: "leave",
                    param: "scene".to_string(),
                })
            }
        }
        Ok(false)
    }

    fn write(&self) -> ActionResult<serde_json::Value> {
        write_state(self.name(), self)
    }

    fn read(&mut self, value: &serde_json::Value) -> ActionResult<()> {
        *self = read_state(self.name(), value)?;
        Ok(())
    }
}
