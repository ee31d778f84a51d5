//! 游戏世界
//!
//! `World` 是游戏状态的唯一根：项目、当前章节和场景、背包、字幕、对话、计时器、
//! 动词执行器和音频后端。它作为 `bevy_ecs` 资源由帧循环持有，而不是全局单例。
//!
//! ## 回调分发
//!
//! 子系统（字幕、相机、计时器、动画）完成时把回调推入 `ResumeQueue`，
//! `pump` 在同一帧内分发。`pump` 不可重入：分发期间启动的动词和触发的回调
//! 会进入队列，由外层的 `pump` 继续处理。

use crate::actions::callback::{ActionCallback, CallbackTarget, ResumeQueue};
use crate::actions::registry::ActionRegistry;
use crate::actions::Action;
use crate::animation::AnimationService;
use crate::audio::{AudioBackend, NullAudio};
use crate::config::AdventureConfig;
use crate::domain::actor::{Actor, Inventory};
use crate::domain::dialog::{Dialog, DialogNext, DialogOption};
use crate::domain::errors::{ActionError, ActionResult, SceneError, SceneResult};
use crate::domain::scene::Scene;
use crate::domain::text::{AnimationRestore, Color, TextManager, TextPosition, TextType};
use crate::domain::timers::Timers;
use crate::i18n::I18n;
use crate::project::serialization;
use crate::project::{Project, SaveGame, SaveResult};
use crate::verbs::{ActionSpec, RunnerState, Verb, VerbRunner, VerbRunnerId, VerbRunners, INIT_VERB};
use bevy_ecs::prelude::Resource;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 单次 `pump` 最多分发的回调/启动数，剩余的留到下一帧
pub const MAX_DISPATCH_PER_PUMP: usize = 10_000;

/// 选项没有动词时使用的执行器名
pub const DIALOG_OPTION_VERB: &str = "dialog_option";

/// 世界事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    /// 动词执行完毕（每个执行器恰好一次）
    VerbFinished { id: VerbRunnerId, verb: String },
    VerbCancelled { id: VerbRunnerId, verb: String },
    SceneChanged { scene: String },
    ChapterLoaded { chapter: String },
    DialogEnded { actor: String, dialog: String },
}

/// 当前对话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRef {
    pub actor: String,
    pub dialog: String,
}

/// 游戏世界
#[derive(Debug, Resource)]
pub struct World {
    pub(crate) project: Project,
    pub(crate) registry: ActionRegistry,
    pub(crate) chapter: Option<String>,
    pub(crate) scenes: HashMap<String, Scene>,
    pub(crate) current_scene: Option<String>,
    pub(crate) inventory: Inventory,
    pub(crate) text_manager: TextManager,
    pub(crate) current_dialog: Option<DialogRef>,
    pub(crate) timers: Timers,
    pub(crate) verbs: VerbRunners,
    audio: Box<dyn AudioBackend>,
    i18n: I18n,
    asset_scale: f32,
    paused: bool,
    events: Vec<WorldEvent>,
}

fn locate_actor_mut<'a>(
    scenes: &'a mut HashMap<String, Scene>,
    current: Option<&str>,
    inventory: &'a mut Inventory,
    id: &str,
    search_inventory: bool,
) -> Option<&'a mut Actor> {
    let in_scene = current
        .and_then(|s| scenes.get_mut(s))
        .and_then(|s| s.actor_mut(id));
    match in_scene {
        Some(actor) => Some(actor),
        None if search_inventory => inventory.get_mut(id),
        None => None,
    }
}

/// 离开场景时结束场景内的相机动画和角色动画，等待者被恢复
fn release_scene(scene: &mut Scene, resumes: &mut ResumeQueue) {
    scene.camera.stop(resumes);
    for actor in scene.actors_mut() {
        if let Some(renderer) = actor.renderer.as_mut() {
            AnimationService::stop(renderer, resumes);
        }
    }
}

/// 还没有动画的角色播放初始动画
fn start_initial_animations(scene: &mut Scene, resumes: &mut ResumeQueue) {
    for actor in scene.actors_mut() {
        let Some(renderer) = actor.renderer.as_mut() else {
            continue;
        };
        if renderer.current_animation_id.is_some() {
            continue;
        }
        if let Some(initial) = renderer.initial_animation.clone() {
            AnimationService::start(renderer, &initial, None, resumes);
        }
    }
}

impl World {
    pub fn new(project: Project, config: &AdventureConfig) -> Self {
        Self {
            project,
            registry: ActionRegistry::with_builtin(),
            chapter: None,
            scenes: HashMap::new(),
            current_scene: None,
            inventory: Inventory::new(),
            text_manager: TextManager::new(config.text),
            current_dialog: None,
            timers: Timers::new(),
            verbs: VerbRunners::default(),
            audio: Box::new(NullAudio),
            i18n: I18n::new(),
            asset_scale: config.assets.scale,
            paused: false,
            events: Vec::new(),
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioBackend>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_i18n(mut self, i18n: I18n) -> Self {
        self.i18n = i18n;
        self
    }

    // ------------------------------------------------------------------
    // 访问器
    // ------------------------------------------------------------------

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn asset_scale(&self) -> f32 {
        self.asset_scale
    }

    pub fn chapter(&self) -> Option<&str> {
        self.chapter.as_deref()
    }

    pub fn current_scene_id(&self) -> Option<&str> {
        self.current_scene.as_deref()
    }

    pub fn current_scene(&self) -> SceneResult<&Scene> {
        self.current_scene
            .as_deref()
            .and_then(|id| self.scenes.get(id))
            .ok_or(SceneError::NoCurrentScene)
    }

    pub fn current_scene_mut(&mut self) -> SceneResult<&mut Scene> {
        self.current_scene
            .as_deref()
            .and_then(|id| self.scenes.get_mut(id))
            .ok_or(SceneError::NoCurrentScene)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// 当前章节的场景ID（排序）
    pub fn scene_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn text_manager(&self) -> &TextManager {
        &self.text_manager
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn verbs(&self) -> &VerbRunners {
        &self.verbs
    }

    /// 回调队列，自定义动作触发回调时使用
    pub fn resumes_mut(&mut self) -> &mut ResumeQueue {
        &mut self.verbs.resumes
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn translate(&self, text: &str) -> String {
        self.i18n.translate(text)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// 存档为 JSON
    pub fn save(&self) -> SaveResult<String> {
        serialization::save_world(self)
    }

    /// 从 JSON 存档恢复
    pub fn restore(&mut self, json: &str) -> SaveResult<()> {
        let save = SaveGame::from_json_str(json)?;
        serialization::restore_world(self, save)
    }

    // ------------------------------------------------------------------
    // 角色
    // ------------------------------------------------------------------

    /// 在当前场景中查找角色，`search_inventory` 时也查找背包
    pub fn actor(&self, id: &str, search_inventory: bool) -> Option<&Actor> {
        self.current_scene()
            .ok()
            .and_then(|s| s.actor(id))
            .or_else(|| search_inventory.then(|| self.inventory.get(id)).flatten())
    }

    pub fn actor_mut(&mut self, id: &str, search_inventory: bool) -> Option<&mut Actor> {
        locate_actor_mut(
            &mut self.scenes,
            self.current_scene.as_deref(),
            &mut self.inventory,
            id,
            search_inventory,
        )
    }

    pub fn player(&self) -> SceneResult<&Actor> {
        self.current_scene()?.player()
    }

    /// 把场景中的角色移入背包
    pub fn pick_up(&mut self, id: &str) -> SceneResult<()> {
        let actor = self
            .current_scene_mut()?
            .remove_actor(id)
            .ok_or_else(|| SceneError::ActorNotFound(id.to_string()))?;
        self.inventory.add(actor);
        Ok(())
    }

    // ------------------------------------------------------------------
    // 章节与场景
    // ------------------------------------------------------------------

    /// 加载章节并进入指定场景（未指定时为章节的初始场景）
    pub fn load_chapter(&mut self, chapter: &str, scene: Option<&str>) -> SceneResult<()> {
        let doc = self.project.load_chapter(chapter).map_err(|e| {
            tracing::error!(target: "scene", "Failed to load chapter '{}': {}", chapter, e);
            SceneError::ChapterNotFound(chapter.to_string())
        })?;

        let target = scene
            .or_else(|| doc.init_scene_id())
            .map(str::to_string)
            .ok_or_else(|| SceneError::SceneNotFound(format!("{}/<init>", chapter)))?;
        if !doc.has_scene(&target) {
            return Err(SceneError::SceneNotFound(target));
        }

        tracing::info!(target: "scene", "Loading chapter '{}'", chapter);
        self.text_manager.reset(&mut self.verbs.resumes);
        self.apply_text_restores();
        self.timers.clear(&mut self.verbs.resumes);
        self.current_dialog = None;
        for scene in self.scenes.values_mut() {
            release_scene(scene, &mut self.verbs.resumes);
        }
        self.scenes = doc.scenes.into_iter().map(|s| (s.id.clone(), s)).collect();
        self.chapter = Some(chapter.to_string());
        self.current_scene = None;
        self.events.push(WorldEvent::ChapterLoaded {
            chapter: chapter.to_string(),
        });

        self.set_current_scene(&target)
    }

    /// 进入项目的初始章节
    pub fn load_init_chapter(&mut self) -> SceneResult<()> {
        let chapter = self
            .project
            .document
            .init_chapter
            .clone()
            .or_else(|| self.project.document.chapters.first().cloned())
            .ok_or_else(|| SceneError::ChapterNotFound("<init>".to_string()))?;
        self.load_chapter(&chapter, None)
    }

    /// 切换当前章节中的场景
    ///
    /// 清除字幕（触发等待中的回调）和当前对话，然后运行场景的 `init` 动词。
    pub fn set_current_scene(&mut self, id: &str) -> SceneResult<()> {
        if !self.scenes.contains_key(id) {
            return Err(SceneError::SceneNotFound(id.to_string()));
        }

        tracing::info!(target: "scene", "Entering scene '{}'", id);
        self.text_manager.reset(&mut self.verbs.resumes);
        self.apply_text_restores();
        if let Some(dialog) = self.current_dialog.take() {
            self.events.push(WorldEvent::DialogEnded {
                actor: dialog.actor,
                dialog: dialog.dialog,
            });
        }
        self.audio.stop_all();
        if let Some(old) = self
            .current_scene
            .as_deref()
            .and_then(|old| self.scenes.get_mut(old))
        {
            release_scene(old, &mut self.verbs.resumes);
        }
        self.current_scene = Some(id.to_string());
        if let Some(scene) = self.scenes.get_mut(id) {
            start_initial_animations(scene, &mut self.verbs.resumes);
        }

        let scale = self.asset_scale;
        let (music, has_init) = {
            let scene = self.current_scene_mut()?;
            if let Some(size) = scene.size {
                scene.camera.bounds = Some(size * scale);
            }
            let follow = scene
                .follow_actor
                .as_deref()
                .and_then(|f| scene.actor(f))
                .map(|a| a.position);
            if let Some(pos) = follow {
                scene.camera.update_pos(pos);
            }
            (scene.music.clone(), scene.verb(INIT_VERB).is_some())
        };

        if let Some(music) = music {
            if let Err(e) = self.audio.play("music", &music, 1.0, true) {
                tracing::warn!(target: "scene", "Failed to play music '{}': {}", music, e);
            }
        }

        self.events.push(WorldEvent::SceneChanged {
            scene: id.to_string(),
        });

        if has_init {
            self.run_verb(None, INIT_VERB);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 动词
    // ------------------------------------------------------------------

    /// 查找动词：角色动词 → 当前场景动词 → 项目默认动词
    pub fn resolve_verb(&self, actor: Option<&str>, verb: &str) -> Option<&Verb> {
        actor
            .and_then(|a| self.actor(a, true))
            .and_then(|a| a.verb(verb))
            .or_else(|| self.current_scene().ok().and_then(|s| s.verb(verb)))
            .or_else(|| self.project.document.verbs.iter().find(|v| v.id == verb))
    }

    /// 运行动词，找不到动词时返回 `None`
    pub fn run_verb(&mut self, actor: Option<&str>, verb: &str) -> Option<VerbRunnerId> {
        let Some(specs) = self.resolve_verb(actor, verb).map(|v| v.actions.clone()) else {
            tracing::warn!(target: "verb", "Verb '{}' not found for {:?}", verb, actor);
            return None;
        };
        Some(self.run_actions(actor, verb, &specs))
    }

    /// 用动作描述创建并启动执行器
    ///
    /// 无法创建的动作记录错误后跳过。角色动词中没有 `actor` 参数的动作以该角色为目标。
    pub fn run_actions(&mut self, actor: Option<&str>, verb: &str, specs: &[ActionSpec]) -> VerbRunnerId {
        let actions: Vec<Box<dyn Action>> = specs
            .iter()
            .filter_map(|spec| {
                let mut spec = spec.clone();
                if let Some(actor) = actor {
                    spec.params
                        .entry("actor".to_string())
                        .or_insert_with(|| actor.to_string());
                }
                self.registry
                    .instantiate(&spec)
                    .map_err(|e| {
                        tracing::error!(
                            target: "verb",
                            "Skipping action '{}' in verb '{}': {}",
                            spec.action,
                            verb,
                            e
                        );
                    })
                    .ok()
            })
            .collect();
        self.start_runner(actor, verb, actions)
    }

    /// 启动执行器
    pub fn start_runner(
        &mut self,
        actor: Option<&str>,
        verb: &str,
        actions: Vec<Box<dyn Action>>,
    ) -> VerbRunnerId {
        let id = self.verbs.allocate_id();
        tracing::debug!(
            target: "verb",
            "Starting {} '{}' ({} actions) on {:?}",
            id,
            verb,
            actions.len(),
            actor
        );
        let runner = VerbRunner::new(id, actor.map(str::to_string), verb, actions);
        self.verbs.runners.insert(id, runner);
        self.verbs.starts.push_back(id);
        self.pump();
        id
    }

    /// 执行器是否还在运行（包括等待中）
    pub fn is_running(&self, id: VerbRunnerId) -> bool {
        self.verbs.contains(id)
    }

    /// 取消执行器，指向它的回调被丢弃
    pub fn cancel_verb(&mut self, id: VerbRunnerId) -> bool {
        self.verbs.resumes.discard_runner(id);
        self.verbs.starts.retain(|s| *s != id);

        if self.verbs.active == Some(id) {
            self.verbs.active_cancelled = true;
            return true;
        }

        let Some(mut runner) = self.verbs.runners.remove(&id) else {
            return false;
        };
        runner.cancel();
        tracing::debug!(target: "verb", "Cancelled {} '{}'", id, runner.verb());
        self.events.push(WorldEvent::VerbCancelled {
            id,
            verb: runner.verb().to_string(),
        });
        true
    }

    /// 分发所有待处理的启动和回调
    pub fn pump(&mut self) {
        if self.verbs.pumping {
            return;
        }
        self.verbs.pumping = true;

        let mut dispatched = 0;
        loop {
            if dispatched >= MAX_DISPATCH_PER_PUMP {
                tracing::warn!(
                    target: "verb",
                    "Dispatch limit reached, {} callbacks left for the next frame",
                    self.verbs.resumes.len()
                );
                break;
            }
            if let Some(cb) = self.verbs.resumes.pop() {
                self.dispatch(cb);
            } else if let Some(id) = self.verbs.starts.pop_front() {
                self.with_runner(id, |runner, world| runner.run(world));
            } else {
                break;
            }
            dispatched += 1;
        }

        self.verbs.pumping = false;
    }

    fn dispatch(&mut self, cb: ActionCallback) {
        let step = cb.step();
        match cb.target() {
            CallbackTarget::Verb => {
                self.with_runner(cb.runner(), |runner, world| runner.resume(step, world))
            }
            CallbackTarget::Action => self.with_runner(cb.runner(), |runner, world| {
                runner.resume_action(step, world)
            }),
        }
    }

    /// 取出执行器运行 `f`，未结束时放回
    fn with_runner(&mut self, id: VerbRunnerId, f: impl FnOnce(&mut VerbRunner, &mut World)) {
        let Some(mut runner) = self.verbs.runners.remove(&id) else {
            tracing::debug!(target: "verb", "Dropping callback for finished or cancelled {}", id);
            return;
        };

        self.verbs.active = Some(id);
        f(&mut runner, self);
        self.verbs.active = None;

        if std::mem::take(&mut self.verbs.active_cancelled) {
            runner.cancel();
        }

        let verb = runner.verb().to_string();
        match runner.state() {
            RunnerState::Finished => self.events.push(WorldEvent::VerbFinished { id, verb }),
            RunnerState::Cancelled => {
                self.verbs.resumes.discard_runner(id);
                self.events.push(WorldEvent::VerbCancelled { id, verb });
            }
            RunnerState::Ready | RunnerState::Waiting { .. } => {
                self.verbs.runners.insert(id, runner);
            }
        }
    }

    // ------------------------------------------------------------------
    // 子系统
    // ------------------------------------------------------------------

    pub fn add_subtitle(
        &mut self,
        text: impl Into<String>,
        position: TextPosition,
        queue: bool,
        ty: TextType,
        color: Color,
        callback: Option<ActionCallback>,
    ) {
        self.text_manager
            .add_subtitle(text, position, queue, ty, color, callback, &mut self.verbs.resumes);
        self.apply_text_restores();
    }

    /// 最后添加的字幕结束（到时、跳过或被替换）时把角色动画恢复为 `animation`
    pub fn restore_animation_after_text(&mut self, actor: &str, animation: &str) {
        self.text_manager.restore_on_finish(AnimationRestore {
            actor: actor.to_string(),
            animation: animation.to_string(),
        });
        self.apply_text_restores();
    }

    fn apply_text_restores(&mut self) {
        for restore in self.text_manager.take_restores() {
            tracing::trace!(
                target: "text",
                "Restoring '{}' to '{}'",
                restore.actor,
                restore.animation
            );
            self.start_animation(&restore.actor, &restore.animation, None);
        }
    }

    /// 玩家点击：跳过当前字幕
    pub fn skip_text(&mut self) {
        self.text_manager.skip(&mut self.verbs.resumes);
        self.apply_text_restores();
        self.pump();
    }

    pub fn add_timer(&mut self, time: f32, callback: ActionCallback) {
        self.timers.add(time, callback);
    }

    /// 播放角色动画，找不到角色或动画时立即触发回调并返回 `false`
    ///
    /// 动画描述带有音效时同时播放该音效。
    pub fn start_animation(&mut self, actor_id: &str, anim: &str, callback: Option<ActionCallback>) -> bool {
        let resumes = &mut self.verbs.resumes;
        let actor = locate_actor_mut(
            &mut self.scenes,
            self.current_scene.as_deref(),
            &mut self.inventory,
            actor_id,
            true,
        );
        let Some(actor) = actor else {
            tracing::warn!(target: "scene", "Cannot animate missing actor '{}'", actor_id);
            if let Some(cb) = callback {
                cb.resume(resumes);
            }
            return false;
        };
        let Some(renderer) = actor.renderer.as_mut() else {
            tracing::warn!(target: "scene", "Actor '{}' has no animations", actor_id);
            if let Some(cb) = callback {
                cb.resume(resumes);
            }
            return false;
        };

        if !AnimationService::start(renderer, anim, callback, resumes) {
            return false;
        }

        let sound = renderer.current_animation().and_then(|d| d.sound.clone());
        if let Some(desc) = sound.and_then(|s| actor.sounds.get(&s)) {
            let name = format!("{}.{}", actor.id, desc.id);
            if let Err(e) = self.audio.play(&name, &desc.filename, desc.volume, desc.looping) {
                tracing::warn!(target: "scene", "Failed to play animation sound '{}': {}", name, e);
            }
        }
        true
    }

    pub fn play_actor_sound(&mut self, actor_id: &str, sound: &str) -> ActionResult<()> {
        let actor = self
            .actor(actor_id, true)
            .ok_or_else(|| SceneError::ActorNotFound(actor_id.to_string()))?;
        let Some(desc) = actor.sounds.get(sound) else {
            tracing::warn!(target: "action", "Sound '{}' not found in actor '{}'", sound, actor_id);
            return Ok(());
        };
        let name = actor.sound_name(sound);
        let (filename, volume, looping) = (desc.filename.clone(), desc.volume, desc.looping);
        if let Err(e) = self.audio.play(&name, &filename, volume, looping) {
            tracing::warn!(target: "action", "Failed to play sound '{}': {}", name, e);
        }
        Ok(())
    }

    pub fn stop_actor_sound(&mut self, actor_id: &str, sound: &str) -> ActionResult<()> {
        let name = self
            .actor(actor_id, true)
            .ok_or_else(|| SceneError::ActorNotFound(actor_id.to_string()))?
            .sound_name(sound);
        if let Err(e) = self.audio.stop(&name) {
            tracing::debug!(target: "action", "Failed to stop sound '{}': {}", name, e);
        }
        Ok(())
    }

    /// 立即设置相机
    pub fn set_camera(&mut self, position: Vec2, zoom: f32) -> SceneResult<()> {
        let scene = self
            .current_scene
            .as_deref()
            .and_then(|id| self.scenes.get_mut(id))
            .ok_or(SceneError::NoCurrentScene)?;
        scene.camera.set(position, zoom, &mut self.verbs.resumes);
        Ok(())
    }

    /// 开始相机动画；没有当前场景时回调立即触发
    pub fn start_camera_tween(
        &mut self,
        position: Vec2,
        zoom: f32,
        duration: f32,
        callback: Option<ActionCallback>,
    ) -> SceneResult<()> {
        let resumes = &mut self.verbs.resumes;
        match self
            .current_scene
            .as_deref()
            .and_then(|id| self.scenes.get_mut(id))
        {
            Some(scene) => {
                scene.camera.start_tween(position, zoom, duration, callback, resumes);
                Ok(())
            }
            None => {
                if let Some(cb) = callback {
                    cb.resume(resumes);
                }
                Err(SceneError::NoCurrentScene)
            }
        }
    }

    /// 设置相机跟随的角色并立即移动到该角色
    pub fn set_camera_follow(&mut self, actor: Option<&str>) -> SceneResult<()> {
        let scene = self.current_scene_mut()?;
        match actor {
            None => scene.follow_actor = None,
            Some(id) => {
                let pos = scene
                    .actor(id)
                    .map(|a| a.position)
                    .ok_or_else(|| SceneError::ActorNotFound(id.to_string()))?;
                scene.follow_actor = Some(id.to_string());
                scene.camera.update_pos(pos);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 对话
    // ------------------------------------------------------------------

    /// 开始角色的对话
    pub fn start_dialog(&mut self, actor: &str, dialog: &str) -> SceneResult<()> {
        let found = self
            .actor(actor, false)
            .ok_or_else(|| SceneError::ActorNotFound(actor.to_string()))?
            .dialogs
            .contains_key(dialog);
        if !found {
            return Err(SceneError::DialogNotFound {
                actor: actor.to_string(),
                dialog: dialog.to_string(),
            });
        }
        tracing::debug!(target: "dialog", "Starting dialog '{}' of '{}'", dialog, actor);
        self.current_dialog = Some(DialogRef {
            actor: actor.to_string(),
            dialog: dialog.to_string(),
        });
        Ok(())
    }

    pub fn current_dialog_ref(&self) -> Option<&DialogRef> {
        self.current_dialog.as_ref()
    }

    pub fn current_dialog(&self) -> Option<&Dialog> {
        let r = self.current_dialog.as_ref()?;
        self.actor(&r.actor, false)?.dialogs.get(&r.dialog)
    }

    /// 当前对话的可见选项
    pub fn dialog_options(&self) -> Vec<(usize, &DialogOption)> {
        self.current_dialog()
            .map(|d| {
                d.visible_options()
                    .into_iter()
                    .filter_map(|i| d.options.get(i).map(|o| (i, o)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 当前对话的回应者和选中的选项
    pub fn current_dialog_option(&self) -> ActionResult<(String, DialogOption)> {
        let r = self.current_dialog.as_ref().ok_or(ActionError::NoCurrentDialog)?;
        let dialog = self.current_dialog().ok_or(ActionError::NoCurrentDialog)?;
        let option = dialog
            .current_option()
            .ok_or_else(|| ActionError::NoCurrentOption(r.dialog.clone()))?;
        Ok((r.actor.clone(), option.clone()))
    }

    /// 选择对话选项
    ///
    /// 运行选项的动词（没有动词时运行只含 `say_dialog` 的执行器），然后按 `next`
    /// 留在对话、结束对话或切换到另一个对话。
    pub fn select_dialog_option(&mut self, index: usize) -> ActionResult<VerbRunnerId> {
        let r = self.current_dialog.clone().ok_or(ActionError::NoCurrentDialog)?;
        let option = self
            .actor_mut(&r.actor, false)
            .ok_or_else(|| SceneError::ActorNotFound(r.actor.clone()))?
            .dialogs
            .get_mut(&r.dialog)
            .ok_or_else(|| SceneError::DialogNotFound {
                actor: r.actor.clone(),
                dialog: r.dialog.clone(),
            })?
            .select(index)?
            .clone();

        let id = match option.verb.as_deref() {
            Some(verb) => self
                .run_verb(Some(&r.actor), verb)
                .unwrap_or_else(|| self.run_actions(Some(&r.actor), verb, &[])),
            None => self.run_actions(
                Some(&r.actor),
                DIALOG_OPTION_VERB,
                &[ActionSpec::new("say_dialog")],
            ),
        };

        match option.next {
            DialogNext::Stay => {}
            DialogNext::End => self.end_dialog(),
            DialogNext::Dialog(next) => {
                if let Err(e) = self.start_dialog(&r.actor, &next) {
                    tracing::warn!(
                        target: "dialog",
                        "Cannot continue with dialog '{}': {}",
                        next,
                        e
                    );
                    self.end_dialog();
                }
            }
        }
        Ok(id)
    }

    pub fn end_dialog(&mut self) {
        if let Some(r) = self.current_dialog.take() {
            tracing::debug!(target: "dialog", "Dialog '{}' of '{}' ended", r.dialog, r.actor);
            self.events.push(WorldEvent::DialogEnded {
                actor: r.actor,
                dialog: r.dialog,
            });
        }
    }

    // ------------------------------------------------------------------
    // 帧更新
    // ------------------------------------------------------------------

    /// 每帧更新：字幕、计时器、相机、动画，然后分发回调
    pub fn update(&mut self, delta: f32) {
        if self.paused {
            return;
        }
        self.text_manager.update(delta, &mut self.verbs.resumes);
        self.apply_text_restores();

        let resumes = &mut self.verbs.resumes;
        self.timers.update(delta, resumes);

        if let Some(scene) = self
            .current_scene
            .as_deref()
            .and_then(|id| self.scenes.get_mut(id))
        {
            scene.camera.update(delta, resumes);
            for actor in scene.actors_mut() {
                if let Some(renderer) = actor.renderer.as_mut() {
                    AnimationService::update(renderer, delta, resumes);
                }
            }
            if !scene.camera.is_moving() {
                let follow = scene
                    .follow_actor
                    .as_deref()
                    .and_then(|f| scene.actor(f))
                    .map(|a| a.position);
                if let Some(pos) = follow {
                    scene.camera.update_pos(pos);
                }
            }
        }

        for actor in self.inventory.items_mut() {
            if let Some(renderer) = actor.renderer.as_mut() {
                AnimationService::update(renderer, delta, resumes);
            }
        }

        self.pump();
    }
}
