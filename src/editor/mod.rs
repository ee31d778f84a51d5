//! 编辑器模型
//!
//! 编辑器界面之下的数据层：
//! - `undo_redo` - 命令模式的撤销/重做
//! - `chapter` - 章节的创建、重命名以及排序列表
//! - `animation_preview` - 动画表单预览

pub mod animation_preview;
pub mod chapter;
pub mod undo_redo;

pub use animation_preview::AnimationPreview;
pub use chapter::{command_error_message, error_message, ChapterEditor, CreateChapterCommand, RenameChapterCommand};
pub use undo_redo::{Command, CommandError, CommandManager, CompositeCommand};
