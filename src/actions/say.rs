use super::param::{self, Param, ParamType};
use super::{read_state, write_state, Action, ActionCallback};
use crate::domain::errors::ActionResult;
use crate::domain::text::{Color, TextPosition, TextType};
use crate::domain::world::World;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const INFO: &str = "Says a text. Above the actor if one is given, in the subtitle line otherwise";

const PARAMS: &[Param] = &[
    Param::new("text", "The text to show", ParamType::String).mandatory(),
    Param::new("type", "plain, rectangle or talk", ParamType::TextType),
    Param::new("color", "The text color", ParamType::Color),
    Param::new("animation", "The actor animation while talking", ParamType::String),
    Param::new(
        "wait",
        "If false the text is shown and the action continues immediately",
        ParamType::Boolean,
    )
    .with_default("true"),
];

/// 显示字幕
///
/// 说话动画在字幕结束（到时、跳过或被替换）后恢复为之前的动画，不论是否等待。
#[derive(Debug, Serialize, Deserialize)]
pub struct SayAction {
    actor: Option<String>,
    text: String,
    ty: Option<TextType>,
    color: Option<Color>,
    animation: Option<String>,
    wait: bool,
}

impl Default for SayAction {
    fn default() -> Self {
        Self {
            actor: None,
            text: String::new(),
            ty: None,
            color: None,
            animation: None,
            wait: true,
        }
    }
}

impl Action for SayAction {
    fn name(&self) -> &'static str {
        "say"
    }

    fn info(&self) -> &'static str {
        INFO
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()> {
        let name = self.name();
        self.actor = param::get_string(params, "actor");
        self.text = param::get_string(params, "text").unwrap_or_default();
        self.ty = param::get_string(params, "type")
            .map(|v| param::parse_text_type(name, "type", &v))
            .transpose()?;
        self.color = param::get_string(params, "color")
            .map(|v| param::parse_color(name, "color", &v))
            .transpose()?;
        self.animation = param::get_string(params, "animation");
        self.wait = param::get_string(params, "wait").map_or(true, |v| param::parse_bool(&v));
        Ok(())
    }

    fn run(&mut self, world: &mut World, cb: ActionCallback) -> ActionResult<bool> {
        let text = world.translate(&self.text);
        let anchor = self.actor.as_deref().and_then(|id| {
            world
                .actor(id, false)
                .map(|a| Vec2::new(a.position.x, a.position.y + a.height()))
        });

        let (position, default_ty, default_color) = match anchor {
            Some(pos) => (TextPosition::scene(pos), TextType::Talk, Color::BLACK),
            None => (TextPosition::subtitle(), TextType::Plain, Color::WHITE),
        };

        // 替换旧字幕会先恢复它的动画，之后才读取当前动画
        world.add_subtitle(
            text,
            position,
            false,
            self.ty.unwrap_or(default_ty),
            self.color.unwrap_or(default_color),
            self.wait.then_some(cb),
        );

        if let (Some(actor), Some(anim)) = (self.actor.as_deref(), self.animation.as_deref()) {
            let previous = world
                .actor(actor, false)
                .and_then(|a| a.current_animation())
                .map(str::to_string);
            if world.start_animation(actor, anim, None) {
                if let Some(previous) = previous {
                    world.restore_animation_after_text(actor, &previous);
                }
            }
        }

        Ok(self.wait)
    }

    fn write(&self) -> ActionResult<serde_json::Value> {
        write_state(self.name(), self)
    }

    fn read(&mut self, value: &serde_json::Value) -> ActionResult<()> {
        *self = read_state(self.name(), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationDesc, AnimationRenderer};
    use crate::config::{AdventureConfig, TextConfig};
    use crate::domain::actor::Actor;
    use crate::domain::scene::Scene;
    use crate::project::{ChapterDocument, Project, ProjectDocument};
    use crate::verbs::{ActionSpec, Verb};

    fn talk(wait: &str) -> Verb {
        Verb::new("talk").with_action(
            ActionSpec::new("say")
                .with_param("text", "Arr")
                .with_param("animation", "talk.right")
                .with_param("wait", wait),
        )
    }

    fn world(verbs: Vec<Verb>) -> World {
        let mut renderer = AnimationRenderer::new();
        renderer.add_animation(AnimationDesc::new("stand.right", "pirate"));
        renderer.add_animation(AnimationDesc::new("talk.right", "pirate"));
        renderer.initial_animation = Some("stand.right".to_string());
        let mut pirate = Actor::new("pirate").with_renderer(renderer);
        for verb in verbs {
            pirate = pirate.with_verb(verb);
        }

        let mut project = Project::in_memory(ProjectDocument::new("test"));
        project
            .save_chapter(&ChapterDocument::new("c1").with_scene(Scene::new("deck").with_actor(pirate)))
            .unwrap();
        let mut config = AdventureConfig::default();
        config.text = TextConfig {
            time_per_char: 0.0,
            min_time: 1.0,
        };
        let mut world = World::new(project, &config);
        world.load_chapter("c1", None).unwrap();
        world
    }

    fn pirate_anim(world: &World) -> Option<&str> {
        world.actor("pirate", false).and_then(|a| a.current_animation())
    }

    fn run_for(world: &mut World, seconds: f32) {
        for _ in 0..(seconds * 10.0) as usize {
            world.update(0.1);
        }
    }

    #[test]
    fn test_waiting_say_restores_animation() {
        let mut world = world(vec![talk("true")]);
        world.run_verb(Some("pirate"), "talk");
        world.pump();
        assert_eq!(pirate_anim(&world), Some("talk.right"));
        assert_eq!(world.verbs().len(), 1);

        run_for(&mut world, 2.0);
        assert!(world.verbs().is_empty());
        assert_eq!(pirate_anim(&world), Some("stand.right"));
    }

    #[test]
    fn test_say_without_wait_restores_animation() {
        let mut world = world(vec![talk("false")]);
        world.run_verb(Some("pirate"), "talk");
        world.pump();
        assert!(world.verbs().is_empty());
        assert_eq!(pirate_anim(&world), Some("talk.right"));

        run_for(&mut world, 2.0);
        assert!(world.text_manager().is_empty());
        assert_eq!(pirate_anim(&world), Some("stand.right"));
    }

    #[test]
    fn test_replaced_say_keeps_original_pose() {
        let mut world = world(vec![
            Verb::new("a").with_action(
                ActionSpec::new("say")
                    .with_param("text", "Arr")
                    .with_param("animation", "talk.right"),
            ),
            Verb::new("b").with_action(
                ActionSpec::new("say")
                    .with_param("text", "Yo ho")
                    .with_param("animation", "talk.right"),
            ),
        ]);
        world.run_verb(Some("pirate"), "a");
        world.run_verb(Some("pirate"), "b");
        world.pump();
        assert_eq!(pirate_anim(&world), Some("talk.right"));
        assert_eq!(
            world.text_manager().current_subtitle().map(|t| t.str.as_str()),
            Some("Yo ho")
        );

        run_for(&mut world, 2.0);
        assert!(world.verbs().is_empty());
        assert_eq!(pirate_anim(&world), Some("stand.right"));
    }

    #[test]
    fn test_set_params() {
        let mut params = HashMap::new();
        params.insert("text".to_string(), "Hello".to_string());
        params.insert("type".to_string(), "rectangle".to_string());
        params.insert("wait".to_string(), "no".to_string());

        let mut action = SayAction::default();
        action.set_params(&params).unwrap();
        assert_eq!(action.ty, Some(TextType::Rectangle));
        assert!(!action.wait);

        params.insert("color".to_string(), "purple-ish".to_string());
        assert!(action.set_params(&params).is_err());
    }
}
