//! 章节编辑
//!
//! 编辑器上下文 `ChapterEditor` 持有项目和当前选中的章节；章节的创建和重命名
//! 是可撤销命令。文档操作失败时编辑器弹出 `error_message` 生成的提示。

use super::undo_redo::{Command, CommandError};
use crate::project::{ChapterDocument, Project, ProjectError, ProjectResult};

/// 编辑器弹窗的错误提示
pub fn error_message(task: &str, kind: &str, message: &str) -> String {
    format!("Something went wrong while {}.\n\n{} - {}", task, kind, message)
}

/// 命令失败的提示
pub fn command_error_message(task: &str, error: &CommandError) -> String {
    let message = match error {
        CommandError::Project(ProjectError::Io(e)) => e.to_string(),
        CommandError::Project(ProjectError::Json(e)) => e.to_string(),
        CommandError::Project(ProjectError::ChapterNotFound(id))
        | CommandError::Project(ProjectError::ChapterExists(id)) => id.clone(),
        CommandError::Project(ProjectError::Invalid(msg))
        | CommandError::ExecutionFailed(msg)
        | CommandError::UndoFailed(msg)
        | CommandError::InvalidState(msg) => msg.clone(),
    };
    error_message(task, error.kind(), &message)
}

/// 按ID排序的元素列表
pub fn sorted_ids<'a, I>(ids: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<&str> = ids.into_iter().collect();
    ids.sort_unstable();
    ids
}

/// 章节编辑上下文
#[derive(Debug)]
pub struct ChapterEditor {
    project: Project,
    selected: Option<ChapterDocument>,
}

impl ChapterEditor {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            selected: None,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn selected_chapter(&self) -> Option<&ChapterDocument> {
        self.selected.as_ref()
    }

    pub fn selected_chapter_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|c| c.id.as_str())
    }

    pub fn selected_chapter_mut(&mut self) -> Option<&mut ChapterDocument> {
        self.selected.as_mut()
    }

    /// 选中并加载章节
    pub fn select_chapter(&mut self, id: &str) -> ProjectResult<()> {
        self.selected = Some(self.project.load_chapter(id)?);
        Ok(())
    }

    /// 保存选中的章节
    pub fn save_selected(&mut self) -> ProjectResult<()> {
        if let Some(chapter) = self.selected.as_ref() {
            self.project.save_chapter(chapter)?;
        }
        Ok(())
    }

    /// 章节列表（排序）
    pub fn chapter_ids(&self) -> Vec<&str> {
        sorted_ids(self.project.document.chapters.iter().map(String::as_str))
    }

    /// 选中章节的场景列表（排序）
    pub fn scene_ids(&self) -> Vec<&str> {
        self.selected
            .as_ref()
            .map(|c| sorted_ids(c.scenes.iter().map(|s| s.id.as_str())))
            .unwrap_or_default()
    }

    fn rename(&mut self, old: &str, new: &str) -> ProjectResult<()> {
        let was_selected = self.selected_chapter_id() == Some(old);
        if was_selected {
            self.save_selected()?;
        }
        self.project.rename_chapter(old, new)?;
        if was_selected {
            self.select_chapter(new)?;
        }
        self.project.save()
    }
}

/// 创建章节
#[derive(Debug)]
pub struct CreateChapterCommand {
    id: String,
    description: String,
    previous_init: Option<String>,
}

impl CreateChapterCommand {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            description: format!("Create chapter '{}'", id),
            id,
            previous_init: None,
        }
    }
}

impl Command<ChapterEditor> for CreateChapterCommand {
    fn execute(&mut self, editor: &mut ChapterEditor) -> Result<(), CommandError> {
        self.previous_init = editor.project.document.init_chapter.clone();
        editor.project.create_chapter(&self.id)?;
        editor.project.save()?;
        tracing::info!(target: "editor", "Chapter '{}' created", self.id);
        Ok(())
    }

    fn undo(&mut self, editor: &mut ChapterEditor) -> Result<(), CommandError> {
        if editor.selected_chapter_id() == Some(self.id.as_str()) {
            editor.selected = None;
        }
        editor.project.delete_chapter(&self.id)?;
        editor.project.document.init_chapter = self.previous_init.take();
        editor.project.save()?;
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// 重命名章节
///
/// 同时更新项目的初始章节；重命名的是选中章节时先保存再重新加载。
#[derive(Debug)]
pub struct RenameChapterCommand {
    old: String,
    new: String,
    description: String,
}

impl RenameChapterCommand {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        let (old, new) = (old.into(), new.into());
        Self {
            description: format!("Rename chapter '{}' to '{}'", old, new),
            old,
            new,
        }
    }
}

impl Command<ChapterEditor> for RenameChapterCommand {
    fn execute(&mut self, editor: &mut ChapterEditor) -> Result<(), CommandError> {
        if self.old == self.new {
            return Err(CommandError::InvalidState(format!("chapter is already named '{}'", self.new)));
        }
        editor.rename(&self.old, &self.new)?;
        Ok(())
    }

    fn undo(&mut self, editor: &mut ChapterEditor) -> Result<(), CommandError> {
        editor.rename(&self.new, &self.old)?;
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
