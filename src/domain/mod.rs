//! 领域层模块
//!
//! 游戏世界的数据和规则：角色、场景、相机、对话、字幕、计时器，以及把它们
//! 组合起来驱动动词执行的 `World`。

pub mod actor;
pub mod camera;
pub mod dialog;
pub mod errors;
#[cfg(test)]
mod property_tests;
pub mod scene;
pub mod text;
pub mod timers;
pub mod world;

// 重新导出主要类型
pub use actor::{Actor, Inventory, SoundDesc};
pub use camera::SceneCamera;
pub use dialog::{Dialog, DialogNext, DialogOption};
pub use errors::{ActionError, ActionResult, SceneError, SceneResult};
pub use scene::Scene;
pub use text::{AnimationRestore, Color, Text, TextManager, TextPosition, TextType};
pub use timers::Timers;
pub use world::{DialogRef, World, WorldEvent};
