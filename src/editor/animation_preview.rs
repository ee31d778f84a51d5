//! 动画预览
//!
//! 编辑器表单输入（ID、来源、速度、类型）构造动画描述，并在独立的渲染器上循环播放。

use crate::actions::callback::ResumeQueue;
use crate::animation::{AnimationDesc, AnimationRenderer, AnimationService};
use super::undo_redo::CommandError;

/// 动画预览面板状态
#[derive(Debug, Default)]
pub struct AnimationPreview {
    renderer: AnimationRenderer,
    resumes: ResumeQueue,
}

impl AnimationPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据表单输入开始预览；速度无法解析时返回错误，当前预览保持不变
    pub fn preview(&mut self, id: &str, source: &str, speed: &str, anim_type: &str) -> Result<(), CommandError> {
        let desc = AnimationDesc::from_editor_input(id, source, speed, anim_type)
            .map_err(|e| CommandError::InvalidState(format!("invalid speed '{}': {}", speed, e)))?;

        self.renderer = AnimationRenderer::new();
        self.renderer.add_animation(desc);
        AnimationService::start(&mut self.renderer, id, None, &mut self.resumes);
        tracing::debug!(target: "editor", "Previewing animation '{}' from '{}'", id, source);
        Ok(())
    }

    pub fn update(&mut self, delta: f32) {
        AnimationService::update(&mut self.renderer, delta, &mut self.resumes);
        // 预览不挂回调
        while self.resumes.pop().is_some() {}
    }

    pub fn renderer(&self) -> &AnimationRenderer {
        &self.renderer
    }

    pub fn progress(&self) -> f32 {
        AnimationService::progress(&self.renderer)
    }

    pub fn stop(&mut self) {
        AnimationService::stop(&mut self.renderer, &mut self.resumes);
    }
}
