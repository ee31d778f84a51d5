use super::param::{self, Param, ParamType};
use super::{read_state, write_state, Action, ActionCallback};
use crate::domain::errors::ActionResult;
use crate::domain::world::World;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const INFO: &str = "Waits the given time in seconds";

const PARAMS: &[Param] = &[Param::new("time", "Time in seconds", ParamType::Float).mandatory()];

/// 等待
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitAction {
    time: f32,
}

impl Action for WaitAction {
    fn name(&self) -> &'static str {
        "wait"
    }

    fn info(&self) -> &'static str {
        INFO
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()> {
        self.time = param::get_string(params, "time")
            .map(|v| param::parse_float("wait", "time", &v))
            .transpose()?
            .unwrap_or(0.0);
        Ok(())
    }

    fn run(&mut self, world: &mut World, cb: ActionCallback) -> ActionResult<bool> {
        world.add_timer(self.time, cb);
        Ok(true)
    }

    fn write(&self) -> ActionResult<serde_json::Value> {
        write_state(self.name(), self)
    }

    fn read(&mut self, value: &serde_json::Value) -> ActionResult<()> {
        *self = read_state(self.name(), value)?;
        Ok(())
    }
}
