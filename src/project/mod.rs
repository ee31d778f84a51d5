//! 项目文档与存档
//!
//! - `document` - 项目和章节 JSON 文档，按需加载章节
//! - `serialization` - 游戏存档（世界状态、挂起的动词执行器）

pub mod document;
pub mod serialization;

pub use document::{ChapterDocument, ChapterSource, Project, ProjectDocument};
pub use serialization::{SaveError, SaveGame, SaveResult, SAVE_VERSION};

use thiserror::Error;

/// 项目文档错误
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chapter not found: {0}")]
    ChapterNotFound(String),

    #[error("Chapter already exists: {0}")]
    ChapterExists(String),

    #[error("Invalid project: {0}")]
    Invalid(String),
}

impl ProjectError {
    /// 错误类别名（编辑器提示使用）
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectError::Io(_) => "IOException",
            ProjectError::Json(_) => "ParseException",
            ProjectError::ChapterNotFound(_) => "ChapterNotFound",
            ProjectError::ChapterExists(_) => "ChapterExists",
            ProjectError::Invalid(_) => "InvalidProject",
        }
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;
