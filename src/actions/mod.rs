//! 动作解释器
//!
//! 动作是脚本的最小执行单元：由动词（`Verb`）按顺序执行，参数来自项目文档中的
//! `{action, params}` 描述。`run` 返回 `true` 表示执行器必须挂起，直到传入的回调被触发。
//!
//! ## 内置动作
//!
//! | 名称 | 说明 | 等待 |
//! |------|------|------|
//! | `camera` | 设置/动画相机位置、缩放和跟随角色 | `wait` 且 `duration > 0` |
//! | `say_dialog` | 说出当前对话选项（玩家台词 → 回应） | 总是 |
//! | `say` | 在角色上方显示字幕 | `wait` |
//! | `sound` | 播放/停止角色音效 | 从不 |
//! | `leave` | 切换场景或章节 | 从不 |
//! | `wait` | 等待指定秒数 | 总是 |

pub mod callback;
pub mod camera;
pub mod leave;
pub mod param;
pub mod registry;
pub mod say;
pub mod say_dialog;
pub mod sound;
pub mod wait;

pub use callback::{ActionCallback, CallbackSlot, CallbackTarget, ResumeQueue};
pub use camera::CameraAction;
pub use leave::LeaveAction;
pub use param::{Param, ParamType};
pub use registry::ActionRegistry;
pub use say::SayAction;
pub use say_dialog::SayDialogAction;
pub use sound::SoundAction;
pub use wait::WaitAction;

use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::world::World;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// 脚本动作
pub trait Action: fmt::Debug + Send + Sync {
    /// 注册名
    fn name(&self) -> &'static str;

    /// 编辑器中显示的说明
    fn info(&self) -> &'static str;

    /// 声明的参数
    fn params(&self) -> &'static [Param];

    /// 设置参数，格式错误返回 `ActionError::InvalidParam`
    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()>;

    /// 执行动作
    ///
    /// 返回 `Ok(true)` 时动作持有 `cb`，并保证在完成时恰好触发一次。
    fn run(&mut self, world: &mut World, cb: ActionCallback) -> ActionResult<bool>;

    /// 子系统触发 `CallbackTarget::Action` 回调时调用
    fn resume(&mut self, _world: &mut World) -> ActionResult<()> {
        tracing::warn!(target: "action", "Action '{}' received an unexpected resume", self.name());
        Ok(())
    }

    /// 序列化动作状态（存档）
    fn write(&self) -> ActionResult<serde_json::Value>;

    /// 恢复动作状态（读档）
    fn read(&mut self, value: &serde_json::Value) -> ActionResult<()>;
}

/// 将动作状态序列化为 JSON
pub fn write_state<T: Serialize>(action: &str, state: &T) -> ActionResult<serde_json::Value> {
    serde_json::to_value(state).map_err(|e| ActionError::State {
        action: action.to_string(),
        reason: e.to_string(),
    })
}

/// 从 JSON 读取动作状态
pub fn read_state<T: DeserializeOwned>(action: &str, value: &serde_json::Value) -> ActionResult<T> {
    T::deserialize(value).map_err(|e| ActionError::State {
        action: action.to_string(),
        reason: e.to_string(),
    })
}
