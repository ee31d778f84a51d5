//! # Adventure Engine
//!
//! A 2D point-and-click adventure game engine core built with Rust.
//!
//! ## Features
//!
//! - **Verb Scripting**: Verbs are action lists run by resumable runners
//! - **Callbacks**: Long actions (talk, wait, camera moves, animations) resume their verb when done
//! - **Dialogs**: Option trees with per-option verbs and `next` transitions
//! - **Subtitles**: Queued texts with reading-time based display
//! - **UI Logic**: Subtitle layout, pie menu and credits scroller
//! - **Editor Model**: Undoable chapter commands and animation preview
//!
//! ## Architecture Design
//!
//! This engine follows the **Anemic Domain Model (贫血模型)** pattern:
//! - **State**: Pure data structures (scenes, actors, animation renderers)
//! - **Service**: Business logic encapsulation with static methods
//! - **System**: ECS systems drive the adventure world each frame
//!
//! ### Example
//!
//! ```ignore
//! use adventure_engine::config::AdventureConfig;
//! use adventure_engine::domain::World;
//! use adventure_engine::project::Project;
//!
//! let project = Project::load_dir("game")?;
//! let mut world = World::new(project, &AdventureConfig::default());
//! world.load_init_chapter()?;
//! world.run_verb(Some("door"), "lookat");
//! world.update(1.0 / 60.0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Engine loop, ECS systems and errors
//! - [`domain`]: World, scenes, actors, dialogs, text and camera
//! - [`actions`]: Built-in actions and the callback protocol
//! - [`verbs`]: Verb definitions and runners
//! - [`animation`]: Actor animation state
//! - [`ui`]: Subtitle layout, pie menu and credits
//! - [`editor`]: Editor model

/// Core engine functionality including the main engine loop and initialization
pub mod core;
/// Adventure domain model
pub mod domain;
/// Built-in actions and verb callbacks
pub mod actions;
/// Verb definitions and runners
pub mod verbs;
/// Actor animation system
pub mod animation;
/// Audio command backends
pub mod audio;
/// Configuration system
pub mod config;
/// Localized strings
pub mod i18n;
/// Project documents and save games
pub mod project;
/// UI logic for subtitles, pie menu and credits
pub mod ui;
/// Editor model
pub mod editor;
