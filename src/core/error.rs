//! 统一错误处理模块
//!
//! 提供引擎范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **基础设施层错误** (`core::error`): 启动、资源、音频后端等错误
//! - **领域层错误** (`domain::errors`): 动作参数、场景查找等脚本运行期错误
//!
//! `EngineError` 可以同时处理基础设施层和领域层的错误。

use crate::config::ConfigError;
use crate::domain::errors::{ActionError, SceneError};
use crate::editor::CommandError;
use crate::project::{ProjectError, SaveError};
use crate::ui::credits::CreditsError;
use thiserror::Error;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Save game error: {0}")]
    Save(#[from] SaveError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Credits error: {0}")]
    Credits(#[from] CreditsError),

    #[error("Editor command error: {0}")]
    Command(#[from] CommandError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

/// 音频系统错误（基础设施层）
///
/// 由 `AudioBackend` 实现返回；运行期调用方只记录日志并继续。
#[derive(Error, Debug, Clone)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Sound not playing: {0}")]
    NotPlaying(String),
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type AudioResult<T> = Result<T, AudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let credits_err = CreditsError::UnknownType {
            line: 3,
            ty: 'x',
        };
        let engine_err: EngineError = credits_err.into();
        assert!(matches!(engine_err, EngineError::Credits(_)));

        let scene_err = SceneError::SceneNotFound("hall".to_string());
        let engine_err: EngineError = scene_err.into();
        assert!(matches!(engine_err, EngineError::Scene(_)));
    }

    #[test]
    fn test_error_display() {
        let err = AudioError::FileNotFound("door.ogg".to_string());
        assert_eq!(err.to_string(), "Audio file not found: door.ogg");

        let err = ActionError::MissingParam {
            action: "leave",
            param: "scene".to_string(),
        };
        let engine_err: EngineError = err.into();
        assert_eq!(
            engine_err.to_string(),
            "Action error: Missing mandatory param 'scene' for action 'leave'"
        );
    }
}
