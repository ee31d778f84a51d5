use super::param::{self, Param, ParamType};
use super::{read_state, write_state, Action, ActionCallback};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::world::World;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const INFO: &str = "Play/Stop a sound";

const PARAMS: &[Param] = &[
    Param::new("play", "The 'soundId' to play", ParamType::String),
    Param::new("stop", "The 'soundId' to stop", ParamType::String),
];

/// 播放/停止角色音效，角色也会在背包中查找
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundAction {
    actor: Option<String>,
    play: Option<String>,
    stop: Option<String>,
}

impl Action for SoundAction {
    fn name(&self) -> &'static str {
        "sound"
    }

    fn info(&self) -> &'static str {
        INFO
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()> {
        self.actor = param::get_string(params, "actor");
        self.play = param::get_string(params, "play");
        self.stop = param::get_string(params, "stop");
        Ok(())
    }

    fn run(&mut self, world: &mut World, _cb: ActionCallback) -> ActionResult<bool> {
        let actor = self.actor.as_deref().ok_or(ActionError::MissingParam {
            action: "sound",
            param: "actor".to_string(),
        })?;

        if let Some(sound) = self.play.as_deref() {
            world.play_actor_sound(actor, sound)?;
        }
        if let Some(sound) = self.stop.as_deref() {
            world.stop_actor_sound(actor, sound)?;
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
