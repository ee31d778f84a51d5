//! 动画系统模块
//!
//! 提供角色的帧动画状态：动画描述、当前动画、镜像回退以及有限动画的完成回调。
//!
//! ## 功能特性
//!
//! - 动画ID的 `<state>.<direction>` 命名约定
//! - 找不到某个朝向时使用镜像动画
//! - 有限次数动画播放完成时恢复等待中的动词
//!
//! ## 使用示例
//!
//! ```rust
//! use adventure_engine::actions::callback::ResumeQueue;
//! use adventure_engine::animation::{desc, AnimationDesc, AnimationRenderer, AnimationService};
//!
//! let mut renderer = AnimationRenderer::new();
//! renderer.add_animation(AnimationDesc::new("talk.left", "guybrush").with_duration(0.5));
//!
//! let mut resumes = ResumeQueue::new();
//! AnimationService::start(&mut renderer, "talk.left", None, &mut resumes);
//! assert_eq!(desc::stand_pose(renderer.current_animation_id().unwrap()), "stand.left");
//! ```

pub mod desc;
pub mod renderer;
pub mod service;

pub use desc::{AnimationDesc, AnimationType};
pub use renderer::AnimationRenderer;
pub use service::AnimationService;
