//! 游戏存档
//!
//! 存档保存整个世界状态：章节和场景、背包、字幕、计时器、当前对话，以及挂起的
//! 动词执行器和尚未分发的回调。读档后等待中的动作会在原来的位置继续。

use crate::actions::callback::ResumeQueue;
use crate::core::utils::current_timestamp;
use crate::domain::actor::Inventory;
use crate::domain::errors::ActionError;
use crate::domain::scene::Scene;
use crate::domain::text::TextManager;
use crate::domain::timers::Timers;
use crate::domain::world::{DialogRef, World, WorldEvent};
use crate::verbs::{SavedRunner, VerbRunner, VerbRunnerId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 存档格式版本
pub const SAVE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Unsupported save version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    /// 动作执行期间不能存档
    #[error("Cannot save while verbs are being dispatched")]
    Busy,
}

pub type SaveResult<T> = Result<T, SaveError>;

/// 读取的存档
#[derive(Debug, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub saved_at: u64,
    pub chapter: Option<String>,
    pub current_scene: Option<String>,
    pub scenes: HashMap<String, Scene>,
    pub inventory: Inventory,
    pub text_manager: TextManager,
    pub timers: Timers,
    pub current_dialog: Option<DialogRef>,
    pub runners: Vec<SavedRunner>,
    pub resumes: ResumeQueue,
    pub starts: VecDeque<VerbRunnerId>,
    pub next_runner_id: u64,
}

/// 写入时借用世界状态
#[derive(Serialize)]
struct SaveGameRef<'a> {
    version: u32,
    saved_at: u64,
    chapter: Option<&'a str>,
    current_scene: Option<&'a str>,
    scenes: &'a HashMap<String, Scene>,
    inventory: &'a Inventory,
    text_manager: &'a TextManager,
    timers: &'a Timers,
    current_dialog: Option<&'a DialogRef>,
    runners: Vec<SavedRunner>,
    resumes: &'a ResumeQueue,
    starts: &'a VecDeque<VerbRunnerId>,
    next_runner_id: u64,
}

impl SaveGame {
    pub fn from_json_str(json: &str) -> SaveResult<Self> {
        let save: SaveGame = serde_json::from_str(json)?;
        if save.version != SAVE_VERSION {
            return Err(SaveError::Version {
                found: save.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(save)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SaveResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// 序列化世界状态
pub fn save_world(world: &World) -> SaveResult<String> {
    if world.verbs.pumping {
        return Err(SaveError::Busy);
    }

    let mut runners = world
        .verbs
        .runners
        .values()
        .map(VerbRunner::save)
        .collect::<Result<Vec<_>, _>>()?;
    runners.sort_by_key(|r| r.id);

    let save = SaveGameRef {
        version: SAVE_VERSION,
        saved_at: current_timestamp(),
        chapter: world.chapter.as_deref(),
        current_scene: world.current_scene.as_deref(),
        scenes: &world.scenes,
        inventory: &world.inventory,
        text_manager: &world.text_manager,
        timers: &world.timers,
        current_dialog: world.current_dialog.as_ref(),
        runners,
        resumes: &world.verbs.resumes,
        starts: &world.verbs.starts,
        next_runner_id: world.verbs.next_id,
    };
    let json = serde_json::to_string_pretty(&save)?;
    tracing::info!(
        target: "engine",
        "World saved ({} runners, {} bytes)",
        save.runners.len(),
        json.len()
    );
    Ok(json)
}

/// 用存档替换世界状态
///
/// 执行器先全部重建，任何一个失败时世界保持不变。
pub fn restore_world(world: &mut World, save: SaveGame) -> SaveResult<()> {
    if world.verbs.pumping {
        return Err(SaveError::Busy);
    }

    let runners = save
        .runners
        .iter()
        .map(|saved| VerbRunner::restore(saved, &world.registry).map(|r| (saved.id, r)))
        .collect::<Result<HashMap<_, _>, _>>()?;

    let text_config = world.text_manager.config();
    world.chapter = save.chapter;
    world.current_scene = save.current_scene;
    world.scenes = save.scenes;
    world.inventory = save.inventory;
    world.text_manager = save.text_manager;
    world.text_manager.set_config(text_config);
    world.timers = save.timers;
    world.current_dialog = save.current_dialog;
    world.verbs.runners = runners;
    world.verbs.resumes = save.resumes;
    world.verbs.starts = save.starts;
    world.verbs.next_id = save.next_runner_id;

    tracing::info!(
        target: "engine",
        "World restored (saved at {}, {} runners)",
        save.saved_at,
        world.verbs.len()
    );
    if let Some(scene) = world.current_scene.clone() {
        world.push_event(WorldEvent::SceneChanged { scene });
    }
    Ok(())
}

pub fn save_world_to_file<P: AsRef<Path>>(world: &World, path: P) -> SaveResult<()> {
    let json = save_world(world)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn restore_world_from_file<P: AsRef<Path>>(world: &mut World, path: P) -> SaveResult<()> {
    let save = SaveGame::load_from_file(path)?;
    restore_world(world, save)
}
