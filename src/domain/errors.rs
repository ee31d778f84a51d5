//! 领域特定错误类型

use thiserror::Error;

/// 动作错误
///
/// 参数解析失败在编辑器边界弹出提示；运行期由动词执行器记录日志后跳过该动作。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// 缺少必填参数
    #[error("Missing mandatory param '{param}' for action '{action}'")]
    MissingParam { action: &'static str, param: String },
    /// 参数格式错误
    #[error("Invalid value '{value}' for param '{param}' of action '{action}': {reason}")]
    InvalidParam {
        action: &'static str,
        param: String,
        value: String,
        reason: String,
    },
    /// 未注册的动作类型
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    /// 当前没有对话
    #[error("No dialog is active")]
    NoCurrentDialog,
    /// 当前对话没有选中的选项
    #[error("Dialog '{0}' has no selected option")]
    NoCurrentOption(String),
    /// 场景查找失败
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// 动作状态序列化失败
    #[error("Failed to (de)serialize state of action '{action}': {reason}")]
    State { action: String, reason: String },
}

/// 场景领域错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// 场景未找到
    #[error("Scene not found: {0}")]
    SceneNotFound(String),
    /// 章节未找到
    #[error("Chapter not found: {0}")]
    ChapterNotFound(String),
    /// 角色未找到
    #[error("Actor not found: {0}")]
    ActorNotFound(String),
    /// 场景没有玩家角色
    #[error("Scene '{0}' has no player")]
    NoPlayer(String),
    /// 尚未加载任何场景
    #[error("No scene is loaded")]
    NoCurrentScene,
    /// 对话未找到
    #[error("Dialog '{dialog}' not found in actor '{actor}'")]
    DialogNotFound { actor: String, dialog: String },
    /// 对话选项不可用
    #[error("Option {index} of dialog '{dialog}' is not available")]
    OptionNotAvailable { dialog: String, index: usize },
}

pub type ActionResult<T> = Result<T, ActionError>;
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_from_scene_error() {
        let scene_error = SceneError::ActorNotFound("door".to_string());
        let action_error: ActionError = scene_error.into();
        assert!(matches!(
            action_error,
            ActionError::Scene(SceneError::ActorNotFound(_))
        ));
        // transparent: the message is the scene error's message
        assert_eq!(action_error.to_string(), "Actor not found: door");
    }

    #[test]
    fn test_invalid_param_display() {
        let err = ActionError::InvalidParam {
            action: "camera",
            param: "zoom".to_string(),
            value: "big".to_string(),
            reason: "invalid float literal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'big' for param 'zoom' of action 'camera': invalid float literal"
        );
    }

    #[test]
    fn test_scene_error_variants() {
        assert!(matches!(SceneError::SceneNotFound("test".to_string()), SceneError::SceneNotFound(_)));
        assert!(matches!(SceneError::ChapterNotFound("test".to_string()), SceneError::ChapterNotFound(_)));
        assert!(matches!(SceneError::NoPlayer("test".to_string()), SceneError::NoPlayer(_)));
        assert!(matches!(SceneError::NoCurrentScene, SceneError::NoCurrentScene));
        assert_eq!(
            SceneError::OptionNotAvailable {
                dialog: "intro".to_string(),
                index: 3
            }
            .to_string(),
            "Option 3 of dialog 'intro' is not available"
        );
    }
}
