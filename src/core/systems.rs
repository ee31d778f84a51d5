//! 核心ECS系统
//!
//! 冒险世界作为 `Resource` 注册在 bevy 世界中，由这里的系统每帧推进。

use bevy_ecs::prelude::*;

use crate::domain::world::{World as AdventureWorld, WorldEvent};

/// 帧时间
#[derive(Resource, Debug, Clone, Copy)]
pub struct FrameTime {
    /// 本帧时长 (秒)
    pub delta_seconds: f32,
    /// 累计时间 (秒)
    pub elapsed_seconds: f64,
    /// 固定时间步长
    pub fixed_time_step: f64,
    /// 已运行帧数
    pub frame: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
            fixed_time_step: 1.0 / 60.0,
            frame: 0,
        }
    }
}

/// 本帧产生的世界事件（宿主读取后清空）
#[derive(Resource, Debug, Default)]
pub struct WorldEvents {
    pub events: Vec<WorldEvent>,
}

/// 冒险世界更新系统 - 推进字幕、计时器、相机、动画并分发动词回调
pub fn adventure_update_system(time: Res<FrameTime>, mut world: ResMut<AdventureWorld>) {
    world.update(time.delta_seconds);
}

/// 世界事件收集系统
pub fn collect_world_events_system(mut world: ResMut<AdventureWorld>, mut events: ResMut<WorldEvents>) {
    let drained = world.drain_events();
    for event in &drained {
        tracing::debug!(target: "engine", "World event: {:?}", event);
    }
    events.events.extend(drained);
}
