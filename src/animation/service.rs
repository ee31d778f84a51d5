//! 动画服务层
//!
//! 遵循贫血模型，将动画业务逻辑封装在Service中

use super::desc::{self, AnimationType, INFINITY};
use super::renderer::AnimationRenderer;
use crate::actions::callback::{ActionCallback, ResumeQueue};

/// 动画服务 - 封装动画业务逻辑
pub struct AnimationService;

impl AnimationService {
    /// 播放动画
    ///
    /// 找不到 `walk.left` 时回退为镜像的 `walk.right`。动画不存在时记录警告并立即
    /// 触发回调，返回 `false`。被打断的有限动画的回调也会被触发。
    pub fn start(
        renderer: &mut AnimationRenderer,
        id: &str,
        callback: Option<ActionCallback>,
        resumes: &mut ResumeQueue,
    ) -> bool {
        let resolved = if renderer.animations.contains_key(id) {
            Some((id.to_string(), false))
        } else {
            desc::flipped(id)
                .filter(|f| renderer.animations.contains_key(f))
                .map(|f| (f, true))
        };

        if let Some(previous) = renderer.callback.take() {
            previous.resume(resumes);
        }

        let Some((resolved_id, flip_x)) = resolved else {
            tracing::warn!(target: "animation", "Animation not found: {}", id);
            if let Some(cb) = callback {
                cb.resume(resumes);
            }
            return false;
        };

        let delay = renderer
            .animations
            .get(&resolved_id)
            .map_or(0.0, |d| d.delay);

        renderer.current_animation_id = Some(id.to_string());
        renderer.resolved_id = Some(resolved_id);
        renderer.flip_x = flip_x;
        renderer.elapsed = -delay;
        renderer.cycles = 0;
        renderer.reversed = false;
        renderer.playing = true;
        renderer.callback = callback;
        true
    }

    /// 停止播放，挂起的回调会被触发
    pub fn stop(renderer: &mut AnimationRenderer, resumes: &mut ResumeQueue) {
        renderer.playing = false;
        if let Some(cb) = renderer.callback.take() {
            cb.resume(resumes);
        }
    }

    /// 更新动画状态 (每帧调用)
    pub fn update(renderer: &mut AnimationRenderer, delta: f32, resumes: &mut ResumeQueue) {
        if !renderer.playing {
            return;
        }
        let Some(desc) = renderer.current_animation() else {
            return;
        };
        let duration = desc.duration;
        let count = desc.effective_count();
        let anim_type = desc.anim_type;

        renderer.elapsed += delta;
        if renderer.elapsed < duration.max(0.0) {
            return;
        }

        renderer.cycles += 1;
        if anim_type == AnimationType::Yoyo {
            renderer.reversed = !renderer.reversed;
        }

        if count != INFINITY && renderer.cycles >= count.max(0) as u32 {
            renderer.playing = false;
            renderer.elapsed = duration;
            if let Some(cb) = renderer.callback.take() {
                cb.resume(resumes);
            }
        } else if duration > 0.0 {
            renderer.elapsed %= duration;
        } else {
            renderer.elapsed = 0.0;
        }
    }

    /// 当前周期的播放进度 (0.0 - 1.0)，考虑倒放和往返
    pub fn progress(renderer: &AnimationRenderer) -> f32 {
        let Some(desc) = renderer.current_animation() else {
            return 0.0;
        };
        if desc.duration <= 0.0 {
            return 0.0;
        }
        let t = (renderer.elapsed / desc.duration).clamp(0.0, 1.0);
        let backwards = desc.anim_type == AnimationType::Reverse || renderer.reversed;
        if backwards {
            1.0 - t
        } else {
            t
        }
    }

    /// 检查有限动画是否播放完成
    pub fn is_finished(renderer: &AnimationRenderer) -> bool {
        renderer
            .current_animation()
            .is_some_and(|d| d.is_finite() && !renderer.playing)
    }
}
