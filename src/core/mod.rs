//! 核心模块
//!
//! 包含引擎的核心功能：
//! - `engine` - 主引擎入口和运行循环
//! - `systems` - ECS系统与资源定义
//! - `error` - 错误类型定义

pub mod engine;
pub mod error;
pub mod systems;
pub mod utils;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{AudioError, AudioResult, EngineError, EngineResult};

// 重新导出主要类型
pub use engine::{Engine, EngineArgs};
pub use systems::{adventure_update_system, collect_world_events_system, FrameTime, WorldEvents};
pub use utils::{current_timestamp, language_code};
