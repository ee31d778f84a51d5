//! 领域对象属性测试
//!
//! 使用proptest为动画ID约定、字幕时长和相机范围添加属性测试

#[cfg(test)]
mod tests {
    use crate::actions::callback::ResumeQueue;
    use crate::animation::desc::{direction_suffix, flipped, stand_pose, with_direction, LEFT, RIGHT};
    use crate::config::TextConfig;
    use crate::domain::camera::SceneCamera;
    use crate::domain::text::{Color, TextManager, TextPosition, TextType};
    use glam::Vec2;
    use proptest::prelude::*;

    fn anim_base() -> impl Strategy<Value = String> {
        "[a-z]{1,8}"
    }

    fn finite_f32() -> impl Strategy<Value = f32> {
        (-5000.0f32..5000.0).prop_filter("must be finite", |&x| x.is_finite())
    }

    // 动画ID约定
    proptest! {
        #[test]
        fn flipped_is_involution(base in anim_base(), left in any::<bool>()) {
            let dir = if left { LEFT } else { RIGHT };
            let id = with_direction(&base, dir);
            let other = flipped(&id).unwrap();
            prop_assert_ne!(&other, &id);
            prop_assert_eq!(flipped(&other), Some(id));
        }

        #[test]
        fn stand_pose_keeps_direction(base in anim_base(), dir in "[a-z]{1,6}") {
            let id = with_direction(&base, &dir);
            let stand = stand_pose(&id);
            prop_assert_eq!(direction_suffix(&stand), direction_suffix(&id));
            prop_assert!(stand.starts_with("stand."));
        }

        #[test]
        fn undirected_ids_have_no_flip(base in anim_base()) {
            prop_assert_eq!(direction_suffix(&base), "");
            prop_assert_eq!(flipped(&base), None);
        }
    }

    // 字幕时长
    proptest! {
        #[test]
        fn display_time_never_below_minimum(
            text in ".{0,200}",
            time_per_char in 0.0f32..1.0,
            min_time in 0.0f32..10.0
        ) {
            let manager = TextManager::new(TextConfig { time_per_char, min_time });
            let time = manager.display_time(&text);
            prop_assert!(time >= min_time);
            prop_assert!(time >= text.chars().count() as f32 * time_per_char - 1e-3);
        }

        #[test]
        fn queued_subtitles_show_in_order(texts in prop::collection::vec("[a-z]{1,10}", 1..8)) {
            let mut manager = TextManager::new(TextConfig::default());
            let mut resumes = ResumeQueue::new();
            for t in &texts {
                manager.add_subtitle(t.clone(), TextPosition::subtitle(), true, TextType::Plain, Color::WHITE, None, &mut resumes);
            }
            for t in &texts {
                prop_assert_eq!(manager.current_subtitle().map(|s| s.str.clone()), Some(t.clone()));
                manager.skip(&mut resumes);
            }
            prop_assert!(manager.is_empty());
        }
    }

    // 相机范围
    proptest! {
        #[test]
        fn camera_stays_in_bounds(
            x in finite_f32(),
            y in finite_f32(),
            width in 1920.0f32..6000.0,
            height in 1080.0f32..3000.0
        ) {
            let camera = SceneCamera::default().with_bounds(Vec2::new(width, height));
            let p = camera.clamp(Vec2::new(x, y));
            prop_assert!(p.x >= 960.0 - 1e-3 && p.x <= width - 960.0 + 1e-3);
            prop_assert!(p.y >= 540.0 - 1e-3 && p.y <= height - 540.0 + 1e-3);
        }

        #[test]
        fn screen_conversion_roundtrip(x in finite_f32(), y in finite_f32(), zoom in 0.25f32..4.0) {
            let mut camera = SceneCamera::default();
            camera.zoom = zoom;
            let p = Vec2::new(x, y);
            let back = camera.screen_to_scene(camera.scene_to_screen(p));
            prop_assert!((back - p).length() < 0.05);
        }
    }
}
