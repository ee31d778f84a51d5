use super::{ProjectError, ProjectResult};
use crate::domain::scene::Scene;
use crate::verbs::Verb;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 项目文件名
pub const PROJECT_FILE: &str = "project.json";
/// 章节文件扩展名
pub const CHAPTER_EXT: &str = "chapter.json";

/// 项目文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub title: String,
    #[serde(default)]
    pub init_chapter: Option<String>,
    /// 章节ID（每个章节一个文件）
    #[serde(default)]
    pub chapters: Vec<String>,
    /// 默认动词（角色和场景都没有定义时使用）
    #[serde(default)]
    pub verbs: Vec<Verb>,
}

impl ProjectDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// 章节文档
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChapterDocument {
    pub id: String,
    #[serde(default)]
    pub init_scene: Option<String>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl ChapterDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scenes.push(scene);
        self
    }

    pub fn with_init_scene(mut self, scene: impl Into<String>) -> Self {
        self.init_scene = Some(scene.into());
        self
    }

    /// 初始场景，未指定时为第一个场景
    pub fn init_scene_id(&self) -> Option<&str> {
        self.init_scene
            .as_deref()
            .or_else(|| self.scenes.first().map(|s| s.id.as_str()))
    }

    pub fn has_scene(&self, id: &str) -> bool {
        self.scenes.iter().any(|s| s.id == id)
    }
}

/// 章节文档的来源
#[derive(Debug, Clone)]
pub enum ChapterSource {
    /// `<root>/<id>.chapter.json`
    Dir(PathBuf),
    /// 内存中的 JSON 文本
    Memory(HashMap<String, String>),
}

/// 项目：项目文档 + 按需加载的章节
///
/// 每次加载章节都会重新解析文档，得到全新的场景状态。
#[derive(Debug)]
pub struct Project {
    pub document: ProjectDocument,
    source: ChapterSource,
}

fn check_chapter_id(id: &str) -> ProjectResult<()> {
    if id.trim().is_empty() || id.contains(['/', '\\']) {
        return Err(ProjectError::Invalid(format!("invalid chapter id '{}'", id)));
    }
    Ok(())
}

impl Project {
    pub fn in_memory(document: ProjectDocument) -> Self {
        Self {
            document,
            source: ChapterSource::Memory(HashMap::new()),
        }
    }

    /// 从目录加载 `project.json`
    pub fn load_dir<P: AsRef<Path>>(root: P) -> ProjectResult<Self> {
        let root = root.as_ref();
        let json = fs::read_to_string(root.join(PROJECT_FILE))?;
        let document: ProjectDocument = serde_json::from_str(&json)?;
        tracing::info!(target: "scene", "Loaded project '{}' from {:?}", document.title, root);
        Ok(Self {
            document,
            source: ChapterSource::Dir(root.to_path_buf()),
        })
    }

    pub fn source(&self) -> &ChapterSource {
        &self.source
    }

    fn chapter_path(root: &Path, id: &str) -> PathBuf {
        root.join(format!("{}.{}", id, CHAPTER_EXT))
    }

    pub fn has_chapter(&self, id: &str) -> bool {
        self.document.chapters.iter().any(|c| c == id)
    }

    fn read_chapter_json(&self, id: &str) -> ProjectResult<String> {
        if !self.has_chapter(id) {
            return Err(ProjectError::ChapterNotFound(id.to_string()));
        }
        match &self.source {
            ChapterSource::Dir(root) => Ok(fs::read_to_string(Self::chapter_path(root, id))?),
            ChapterSource::Memory(chapters) => chapters
                .get(id)
                .cloned()
                .ok_or_else(|| ProjectError::ChapterNotFound(id.to_string())),
        }
    }

    fn write_chapter_json(&mut self, id: &str, json: String) -> ProjectResult<()> {
        match &mut self.source {
            ChapterSource::Dir(root) => fs::write(Self::chapter_path(root, id), json)?,
            ChapterSource::Memory(chapters) => {
                chapters.insert(id.to_string(), json);
            }
        }
        Ok(())
    }

    /// 加载章节文档
    pub fn load_chapter(&self, id: &str) -> ProjectResult<ChapterDocument> {
        let json = self.read_chapter_json(id)?;
        let chapter: ChapterDocument = serde_json::from_str(&json)?;
        Ok(chapter)
    }

    /// 保存章节文档，新章节加入项目；项目没有初始章节时设为初始章节
    pub fn save_chapter(&mut self, chapter: &ChapterDocument) -> ProjectResult<()> {
        check_chapter_id(&chapter.id)?;
        let json = serde_json::to_string_pretty(chapter)?;
        self.write_chapter_json(&chapter.id, json)?;
        if !self.has_chapter(&chapter.id) {
            self.document.chapters.push(chapter.id.clone());
        }
        if self.document.init_chapter.is_none() {
            self.document.init_chapter = Some(chapter.id.clone());
        }
        Ok(())
    }

    /// 创建空章节
    pub fn create_chapter(&mut self, id: &str) -> ProjectResult<()> {
        if self.has_chapter(id) {
            return Err(ProjectError::ChapterExists(id.to_string()));
        }
        self.save_chapter(&ChapterDocument::new(id))
    }

    /// 删除章节；删除初始章节时初始章节改为第一个剩余章节
    pub fn delete_chapter(&mut self, id: &str) -> ProjectResult<()> {
        if !self.has_chapter(id) {
            return Err(ProjectError::ChapterNotFound(id.to_string()));
        }
        match &mut self.source {
            ChapterSource::Dir(root) => {
                let path = Self::chapter_path(root, id);
                if path.exists() {
                    fs::remove_file(path)?;
                }
            }
            ChapterSource::Memory(chapters) => {
                chapters.remove(id);
            }
        }
        self.document.chapters.retain(|c| c != id);
        if self.document.init_chapter.as_deref() == Some(id) {
            self.document.init_chapter = self.document.chapters.first().cloned();
        }
        Ok(())
    }

    /// 重命名章节，同时更新项目的初始章节
    pub fn rename_chapter(&mut self, old: &str, new: &str) -> ProjectResult<()> {
        check_chapter_id(new)?;
        if self.has_chapter(new) {
            return Err(ProjectError::ChapterExists(new.to_string()));
        }
        let mut chapter = self.load_chapter(old)?;
        chapter.id = new.to_string();
        let json = serde_json::to_string_pretty(&chapter)?;
        self.write_chapter_json(new, json)?;

        match &mut self.source {
            ChapterSource::Dir(root) => fs::remove_file(Self::chapter_path(root, old))?,
            ChapterSource::Memory(chapters) => {
                chapters.remove(old);
            }
        }
        for c in self.document.chapters.iter_mut().filter(|c| c.as_str() == old) {
            *c = new.to_string();
        }
        if self.document.init_chapter.as_deref() == Some(old) {
            self.document.init_chapter = Some(new.to_string());
        }
        tracing::info!(target: "editor", "Chapter '{}' renamed to '{}'", old, new);
        Ok(())
    }

    /// 保存项目文档（内存项目不做任何事）
    pub fn save(&self) -> ProjectResult<()> {
        if let ChapterSource::Dir(root) = &self.source {
            let json = serde_json::to_string_pretty(&self.document)?;
            fs::write(root.join(PROJECT_FILE), json)?;
        }
        Ok(())
    }

    /// 检查初始章节存在、每个章节都能解析并且初始场景存在
    pub fn validate(&self) -> ProjectResult<()> {
        if let Some(init) = self.document.init_chapter.as_deref() {
            if !self.has_chapter(init) {
                return Err(ProjectError::ChapterNotFound(init.to_string()));
            }
        }
        for id in &self.document.chapters {
            let chapter = self.load_chapter(id)?;
            if chapter.id != *id {
                return Err(ProjectError::Invalid(format!(
                    "chapter file '{}' declares id '{}'",
                    id, chapter.id
                )));
            }
            if let Some(init) = chapter.init_scene.as_deref() {
                if !chapter.has_scene(init) {
                    return Err(ProjectError::Invalid(format!(
                        "init scene '{}' not found in chapter '{}'",
                        init, id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        let mut project = Project::in_memory(ProjectDocument::new("Monkey"));
        project
            .save_chapter(
                &ChapterDocument::new("part1")
                    .with_scene(Scene::new("dock"))
                    .with_scene(Scene::new("bar")),
            )
            .unwrap();
        project
    }

    #[test]
    fn test_save_and_load_chapter() {
        let project = project();
        assert_eq!(project.document.init_chapter.as_deref(), Some("part1"));
        let chapter = project.load_chapter("part1").unwrap();
        assert_eq!(chapter.init_scene_id(), Some("dock"));
        assert!(chapter.has_scene("bar"));
        assert!(matches!(
            project.load_chapter("part9"),
            Err(ProjectError::ChapterNotFound(_))
        ));
    }

    #[test]
    fn test_rename_updates_init_chapter() {
        let mut project = project();
        project.rename_chapter("part1", "intro").unwrap();
        assert_eq!(project.document.init_chapter.as_deref(), Some("intro"));
        assert_eq!(project.document.chapters, vec!["intro".to_string()]);
        assert_eq!(project.load_chapter("intro").unwrap().id, "intro");
        assert!(project.load_chapter("part1").is_err());
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_create_existing_chapter_fails() {
        let mut project = project();
        assert!(matches!(
            project.create_chapter("part1"),
            Err(ProjectError::ChapterExists(_))
        ));
        assert!(matches!(
            project.create_chapter("a/b"),
            Err(ProjectError::Invalid(_))
        ));
    }

    #[test]
    fn test_delete_chapter() {
        let mut project = project();
        project.create_chapter("part2").unwrap();
        project.delete_chapter("part1").unwrap();
        assert_eq!(project.document.init_chapter.as_deref(), Some("part2"));
    }

    #[test]
    fn test_dir_project_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PROJECT_FILE),
            r#"{"title": "Monkey", "init_chapter": "part1", "chapters": ["part1"]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("part1.chapter.json"),
            r#"{"id": "part1", "init_scene": "dock", "scenes": [{"id": "dock"}]}"#,
        )
        .unwrap();

        let mut project = Project::load_dir(dir.path()).unwrap();
        assert!(project.validate().is_ok());
        project.rename_chapter("part1", "intro").unwrap();
        project.save().unwrap();

        let reloaded = Project::load_dir(dir.path()).unwrap();
        assert_eq!(reloaded.document.init_chapter.as_deref(), Some("intro"));
        assert!(dir.path().join("intro.chapter.json").exists());
        assert!(!dir.path().join("part1.chapter.json").exists());
    }
}
