//! 场景相机
//!
//! `position` 是视口中心的场景坐标；`zoom > 1` 显示更大的范围。

use crate::actions::callback::{ActionCallback, ResumeQueue};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 相机动画
#[derive(Debug, Serialize, Deserialize)]
pub struct CameraTween {
    from_pos: Vec2,
    to_pos: Vec2,
    from_zoom: f32,
    to_zoom: f32,
    duration: f32,
    elapsed: f32,
    callback: Option<ActionCallback>,
}

impl CameraTween {
    pub fn target(&self) -> (Vec2, f32) {
        (self.to_pos, self.to_zoom)
    }
}

/// 场景相机
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneCamera {
    pub position: Vec2,
    pub zoom: f32,
    /// 视口尺寸（像素）
    pub viewport: Vec2,
    /// 场景尺寸；设置后相机不会移出场景
    #[serde(default)]
    pub bounds: Option<Vec2>,
    #[serde(default)]
    tween: Option<CameraTween>,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::new(Vec2::new(1920.0, 1080.0))
    }
}

impl SceneCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: viewport / 2.0,
            zoom: 1.0,
            viewport,
            bounds: None,
            tween: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Vec2) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// 立即设置位置和缩放，进行中的动画被取消并触发其回调
    pub fn set(&mut self, position: Vec2, zoom: f32, resumes: &mut ResumeQueue) {
        self.cancel_tween(resumes);
        self.zoom = zoom;
        self.position = self.clamp(position);
    }

    /// 开始相机动画；替换的旧动画回调立即触发
    pub fn start_tween(
        &mut self,
        position: Vec2,
        zoom: f32,
        duration: f32,
        callback: Option<ActionCallback>,
        resumes: &mut ResumeQueue,
    ) {
        self.cancel_tween(resumes);
        self.tween = Some(CameraTween {
            from_pos: self.position,
            to_pos: position,
            from_zoom: self.zoom,
            to_zoom: zoom,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
            callback,
        });
    }

    /// 停止动画并触发其回调，相机停在当前位置
    pub fn stop(&mut self, resumes: &mut ResumeQueue) {
        self.cancel_tween(resumes);
    }

    fn cancel_tween(&mut self, resumes: &mut ResumeQueue) {
        if let Some(cb) = self.tween.take().and_then(|t| t.callback) {
            tracing::debug!(target: "camera", "Camera animation replaced");
            cb.resume(resumes);
        }
    }

    pub fn is_moving(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tween(&self) -> Option<&CameraTween> {
        self.tween.as_ref()
    }

    pub fn update(&mut self, delta: f32, resumes: &mut ResumeQueue) {
        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        tween.elapsed += delta;
        let t = (tween.elapsed / tween.duration).min(1.0);
        let zoom = tween.from_zoom + (tween.to_zoom - tween.from_zoom) * t;
        let position = tween.from_pos.lerp(tween.to_pos, t);
        let done = t >= 1.0;

        self.zoom = zoom;
        self.position = self.clamp(position);

        if done {
            if let Some(cb) = self.tween.take().and_then(|t| t.callback) {
                cb.resume(resumes);
            }
        }
    }

    /// 以角色位置为中心（跟随角色时每帧调用）
    pub fn update_pos(&mut self, target: Vec2) {
        self.position = self.clamp(target);
    }

    /// 限制在场景范围内
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        let Some(bounds) = self.bounds else {
            return position;
        };
        let half = self.viewport * self.zoom / 2.0;
        let axis = |p: f32, half: f32, size: f32| {
            if size <= half * 2.0 {
                size / 2.0
            } else {
                p.clamp(half, size - half)
            }
        };
        Vec2::new(
            axis(position.x, half.x, bounds.x),
            axis(position.y, half.y, bounds.y),
        )
    }

    pub fn scene_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.position) / self.zoom + self.viewport / 2.0
    }

    pub fn screen_to_scene(&self, p: Vec2) -> Vec2 {
        (p - self.viewport / 2.0) * self.zoom + self.position
    }
}
