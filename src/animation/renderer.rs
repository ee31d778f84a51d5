use super::desc::AnimationDesc;
use crate::actions::callback::ActionCallback;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 角色动画渲染器 (贫血模型 - 纯数据结构)
///
/// 遵循贫血模型设计原则：
/// - AnimationRenderer (State): 纯数据结构 ← 本文件
/// - AnimationService (Service): 业务逻辑封装 → service.rs
///
/// 业务逻辑请使用：
/// ```rust
/// use adventure_engine::actions::callback::ResumeQueue;
/// use adventure_engine::animation::{AnimationDesc, AnimationRenderer, AnimationService};
///
/// let mut renderer = AnimationRenderer::default();
/// renderer.add_animation(AnimationDesc::new("stand.left", "guybrush"));
///
/// let mut resumes = ResumeQueue::new();
/// AnimationService::start(&mut renderer, "stand.right", None, &mut resumes);
/// assert!(renderer.flip_x);
/// AnimationService::update(&mut renderer, 0.016, &mut resumes);
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnimationRenderer {
    /// 可用动画
    pub animations: HashMap<String, AnimationDesc>,
    /// 场景加载时播放的动画
    #[serde(default)]
    pub initial_animation: Option<String>,
    /// 当前动画ID（请求的逻辑ID，镜像回退时与实际播放的描述ID不同）
    #[serde(default)]
    pub current_animation_id: Option<String>,
    /// 实际播放的动画描述ID
    #[serde(default)]
    pub(crate) resolved_id: Option<String>,
    /// 水平镜像
    #[serde(default)]
    pub flip_x: bool,
    /// 当前周期内的时间 (秒)
    #[serde(default)]
    pub elapsed: f32,
    /// 已完成周期数
    #[serde(default)]
    pub cycles: u32,
    #[serde(default)]
    pub playing: bool,
    /// 往返动画当前是否在回放
    #[serde(default)]
    pub reversed: bool,
    /// 渲染尺寸
    #[serde(default)]
    pub size: Vec2,
    /// 有限动画播放结束时的回调
    #[serde(default)]
    pub(crate) callback: Option<ActionCallback>,
}

impl AnimationRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_animation(&mut self, desc: AnimationDesc) {
        self.animations.insert(desc.id.clone(), desc);
    }

    pub fn has_animation(&self, id: &str) -> bool {
        self.animations.contains_key(id)
    }

    pub fn current_animation_id(&self) -> Option<&str> {
        self.current_animation_id.as_deref()
    }

    /// 实际播放的动画描述
    pub fn current_animation(&self) -> Option<&AnimationDesc> {
        self.resolved_id
            .as_deref()
            .and_then(|id| self.animations.get(id))
    }

    /// 动画ID列表（排序后，编辑器使用）
    pub fn animation_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.animations.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
