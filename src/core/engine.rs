//! 引擎主入口
//!
//! 定义Engine结构和主运行循环

use bevy_ecs::schedule::{IntoSystemConfigs, Schedule};
use bevy_ecs::world::World as EcsWorld;
use std::path::{Path, PathBuf};

use crate::config::{AdventureConfig, LoggingConfig};
use crate::domain::world::{World as AdventureWorld, WorldEvent};
use crate::i18n::I18n;
use crate::project::Project;

use super::error::{EngineError, EngineResult};
use super::systems::{adventure_update_system, collect_world_events_system, FrameTime, WorldEvents};

/// 无头运行时的默认最大帧数（60 FPS 下十分钟）
pub const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 10;

/// 本地化文件名（`<root>/i18n/world[_lang].properties`）
pub const WORLD_STRINGS: &str = "world";

/// 命令行参数
///
/// `adventure_engine [PROJECT_DIR] [--chapter ID] [--frames N] [--config FILE]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineArgs {
    pub project_dir: Option<PathBuf>,
    pub chapter: Option<String>,
    pub max_frames: Option<u64>,
    pub config: Option<PathBuf>,
}

impl EngineArgs {
    pub fn parse<I>(args: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| EngineError::Init(format!("Missing value for {}", flag)))
            };
            match arg.as_str() {
                "--chapter" => parsed.chapter = Some(value("--chapter")?),
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--frames" => {
                    let frames = value("--frames")?;
                    parsed.max_frames = Some(
                        frames
                            .parse()
                            .map_err(|_| EngineError::Init(format!("Invalid frame count '{}'", frames)))?,
                    );
                }
                flag if flag.starts_with("--") => {
                    return Err(EngineError::Init(format!("Unknown option '{}'", flag)));
                }
                _ if parsed.project_dir.is_none() => parsed.project_dir = Some(PathBuf::from(&arg)),
                _ => return Err(EngineError::Init(format!("Unexpected argument '{}'", arg))),
            }
        }
        Ok(parsed)
    }
}

/// 冒险引擎主结构
///
/// `Engine` 持有 bevy 世界和更新调度器：冒险世界注册为资源，
/// 每个固定时间步运行一次 `adventure_update_system`。
///
/// # 示例
///
/// ```no_run
/// use adventure_engine::core::Engine;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     Engine::run()?;
///     Ok(())
/// }
/// ```
pub struct Engine {
    ecs: EcsWorld,
    update_schedule: Schedule,
    accumulator: f64,
}

impl Engine {
    /// 运行引擎：读取配置和命令行参数，加载项目并无头推进直到世界空闲
    pub fn run() -> EngineResult<()> {
        let args = EngineArgs::parse(std::env::args().skip(1))?;
        let mut config = match args.config.as_deref() {
            Some(path) => load_config_file(path)?,
            None => AdventureConfig::load_or_default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Self::initialize_logging(&config.logging);

        if let Some(dir) = args.project_dir.as_ref() {
            config.assets.root = dir.to_string_lossy().into_owned();
        }
        let world = Self::load_world(&config, args.chapter.as_deref())?;
        let mut engine = Self::new(world);

        let max_frames = args.max_frames.unwrap_or(DEFAULT_MAX_FRAMES);
        let step = engine.fixed_time_step() as f32;
        let mut frames = 0;
        while frames < max_frames {
            engine.step(step);
            frames += 1;
            for event in engine.take_events() {
                tracing::info!(target: "engine", "{:?}", event);
            }
            if engine.is_idle() {
                break;
            }
        }

        tracing::info!(target: "engine", "Engine shutting down after {} frames", frames);
        Ok(())
    }

    /// 初始化日志系统
    ///
    /// `RUST_LOG` 优先，未设置时使用配置中的级别。重复初始化会被忽略。
    pub fn initialize_logging(config: &LoggingConfig) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_directive()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .try_init();
        tracing::info!(target: "engine", "Engine starting");
    }

    /// 从资源目录加载项目、本地化文本并进入初始章节（或指定章节）
    pub fn load_world(config: &AdventureConfig, chapter: Option<&str>) -> EngineResult<AdventureWorld> {
        let root = Path::new(&config.assets.root);
        let project = Project::load_dir(root)?;
        project.validate()?;

        let locale = config.assets.locale.as_deref();
        let i18n = match I18n::load(&root.join("i18n"), WORLD_STRINGS, locale) {
            Ok(i18n) => i18n,
            Err(e) => {
                tracing::warn!(target: "engine", "No world strings loaded: {}", e);
                I18n::new()
            }
        };

        let mut world = AdventureWorld::new(project, config).with_i18n(i18n);
        match chapter {
            Some(id) => world.load_chapter(id, None)?,
            None => world.load_init_chapter()?,
        }
        Ok(world)
    }

    /// 用已构建的冒险世界创建引擎
    pub fn new(world: AdventureWorld) -> Self {
        let mut ecs = EcsWorld::new();
        ecs.insert_resource(FrameTime::default());
        ecs.insert_resource(WorldEvents::default());
        ecs.insert_resource(world);

        let mut update_schedule = Schedule::default();
        update_schedule.add_systems((adventure_update_system, collect_world_events_system).chain());

        Self {
            ecs,
            update_schedule,
            accumulator: 0.0,
        }
    }

    pub fn fixed_time_step(&self) -> f64 {
        self.ecs
            .get_resource::<FrameTime>()
            .map_or(1.0 / 60.0, |t| t.fixed_time_step)
    }

    /// 推进 `delta` 秒：累计时间按固定步长运行调度器
    pub fn step(&mut self, delta: f32) {
        let fixed_step = self.fixed_time_step();
        self.accumulator += delta as f64;
        while self.accumulator >= fixed_step {
            if let Some(mut time) = self.ecs.get_resource_mut::<FrameTime>() {
                time.delta_seconds = fixed_step as f32;
                time.elapsed_seconds += fixed_step;
                time.frame += 1;
            }
            self.update_schedule.run(&mut self.ecs);
            self.accumulator -= fixed_step;
        }
    }

    pub fn world(&self) -> Option<&AdventureWorld> {
        self.ecs.get_resource::<AdventureWorld>()
    }

    pub fn world_mut(&mut self) -> Option<bevy_ecs::world::Mut<'_, AdventureWorld>> {
        self.ecs.get_resource_mut::<AdventureWorld>()
    }

    pub fn frame_time(&self) -> FrameTime {
        self.ecs.get_resource::<FrameTime>().copied().unwrap_or_default()
    }

    /// 取出已收集的世界事件
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        self.ecs
            .get_resource_mut::<WorldEvents>()
            .map(|mut e| std::mem::take(&mut e.events))
            .unwrap_or_default()
    }

    /// 没有运行中的动词、字幕和对话
    pub fn is_idle(&self) -> bool {
        self.world().map_or(true, |w| {
            w.verbs().is_empty() && w.text_manager().is_empty() && w.current_dialog_ref().is_none()
        })
    }
}

fn load_config_file(path: &Path) -> EngineResult<AdventureConfig> {
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => AdventureConfig::from_json_file(path)?,
        _ => AdventureConfig::from_toml_file(path)?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scene::Scene;
    use crate::project::{ChapterDocument, ProjectDocument};
    use crate::verbs::{ActionSpec, Verb};

    fn args(list: &[&str]) -> EngineResult<EngineArgs> {
        EngineArgs::parse(list.iter().map(|s| s.to_string()))
    }

    fn world() -> AdventureWorld {
        let mut project = Project::in_memory(ProjectDocument::new("Monkey"));
        let dock = Scene::new("dock").with_verb(
            Verb::new("init").with_action(ActionSpec::new("wait").with_param("time", "0.5")),
        );
        project
            .save_chapter(&ChapterDocument::new("part1").with_scene(dock))
            .unwrap();
        let mut world = AdventureWorld::new(project, &AdventureConfig::default());
        world.load_init_chapter().unwrap();
        world
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["game", "--chapter", "part2", "--frames", "10"]).unwrap();
        assert_eq!(parsed.project_dir, Some(PathBuf::from("game")));
        assert_eq!(parsed.chapter.as_deref(), Some("part2"));
        assert_eq!(parsed.max_frames, Some(10));

        assert!(args(&["--frames", "ten"]).is_err());
        assert!(args(&["--chapter"]).is_err());
        assert!(args(&["--fullscreen"]).is_err());
        assert!(args(&["a", "b"]).is_err());
    }

    #[test]
    fn test_step_runs_fixed_updates() {
        let mut engine = Engine::new(world());
        let events = engine.take_events();
        assert!(events.is_empty());
        assert!(!engine.is_idle());

        engine.step(0.26);
        assert_eq!(engine.frame_time().frame, 15);
        assert!(!engine.is_idle());

        engine.step(0.3);
        assert!(engine.is_idle());
        let events = engine.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, WorldEvent::VerbFinished { verb, .. } if verb == "init")));
    }
}
