//! 对话选项动作
//!
//! 依次执行：玩家说话动画 + 玩家台词 → 恢复玩家动画 → 回应者说话动画 + 回应台词
//! → 恢复回应者动画 → 恢复动词。

use super::param::{self, Param, ParamType};
use super::{read_state, write_state, Action, ActionCallback, CallbackSlot};
use crate::animation::desc::{self, LEFT, RIGHT, TALK_ANIM};
use crate::domain::errors::ActionResult;
use crate::domain::text::{Color, TextPosition, TextType};
use crate::domain::world::World;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const INFO: &str = "Says the selected option from the current dialog. This action does the next steps:\n\
\n- Sets the player 'talk' animation and say the player text\
\n- Restore the previous player animation and set the target actor 'talk' animation and say the response text\
\n- Restore the target actor animation";

const PARAMS: &[Param] = &[
    Param::new(
        "player_talk_animation",
        "The player animation for talking instead of the default talk animation",
        ParamType::String,
    )
    .with_default(TALK_ANIM),
    Param::new(
        "character_talk_animation",
        "The character animation for talking instead of the default talk animation",
        ParamType::String,
    )
    .with_default(TALK_ANIM),
];

/// 对话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogState {
    #[default]
    Idle,
    TalkingPlayer,
    TalkingCharacter,
}

/// 说出当前对话选项
#[derive(Debug, Serialize, Deserialize)]
pub struct SayDialogAction {
    talk_anim: String,
    char_talk_anim: String,
    state: DialogState,
    /// 回应者（对话所属角色）
    character: Option<String>,
    response_text: Option<String>,
    /// 开始说话动画前的动画
    previous_anim: Option<String>,
    slot: CallbackSlot,
}

impl Default for SayDialogAction {
    fn default() -> Self {
        Self {
            talk_anim: TALK_ANIM.to_string(),
            char_talk_anim: TALK_ANIM.to_string(),
            state: DialogState::Idle,
            character: None,
            response_text: None,
            previous_anim: None,
            slot: CallbackSlot::default(),
        }
    }
}

impl SayDialogAction {
    pub fn state(&self) -> DialogState {
        self.state
    }

    /// 正在说话的角色恢复为同朝向的站立动画
    fn restore_stand_pose(world: &mut World, actor: &str, talk_anim: &str) {
        let current = world
            .actor(actor, false)
            .and_then(|a| a.current_animation())
            .filter(|fa| fa.starts_with(talk_anim))
            .map(desc::stand_pose);
        if let Some(stand) = current {
            world.start_animation(actor, &stand, None);
        }
    }

    /// 开始说话动画，按之前动画的朝向选择 `talk.left` / `talk.right`
    fn start_talk_anim(&mut self, world: &mut World, actor: &str, talk_anim: &str) {
        let Some(a) = world.actor(actor, false) else {
            return;
        };
        let Some(renderer) = a.renderer.as_ref() else {
            return;
        };

        let previous = renderer.current_animation_id().map(str::to_string);
        let left = desc::with_direction(talk_anim, LEFT);
        let right = desc::with_direction(talk_anim, RIGHT);
        let has_directional = renderer.has_animation(&left) || renderer.has_animation(&right);

        let anim = match previous.as_deref() {
            Some(p) if p.ends_with(LEFT) && has_directional => left,
            Some(p) if p.ends_with(RIGHT) && has_directional => right,
            _ => talk_anim.to_string(),
        };

        self.previous_anim = previous;
        world.start_animation(actor, &anim, None);
    }

    fn restore_previous(&mut self, world: &mut World, actor: &str) {
        if let Some(previous) = self.previous_anim.take() {
            world.start_animation(actor, &previous, None);
        }
    }
}

impl Action for SayDialogAction {
    fn name(&self) -> &'static str {
        "say_dialog"
    }

    fn info(&self) -> &'static str {
        INFO
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn set_params(&mut self, params: &HashMap<String, String>) -> ActionResult<()> {
        self.talk_anim =
            param::get_string(params, "player_talk_animation").unwrap_or_else(|| TALK_ANIM.to_string());
        self.char_talk_anim = param::get_string(params, "character_talk_animation")
            .unwrap_or_else(|| TALK_ANIM.to_string());
        Ok(())
    }

    fn run(&mut self, world: &mut World, cb: ActionCallback) -> ActionResult<bool> {
        let (character, option) = world.current_dialog_option()?;
        let player = world.player()?;
        let player_id = player.id.clone();
        let player_text_pos = Vec2::new(player.position.x, player.position.y + player.height());

        self.slot.set(cb);
        self.character = Some(character.clone());
        self.response_text = option.response_text.clone();
        self.previous_anim = None;
        self.state = DialogState::TalkingPlayer;

        let talk_anim = self.talk_anim.clone();
        let char_talk_anim = self.char_talk_anim.clone();
        Self::restore_stand_pose(world, &player_id, &talk_anim);
        Self::restore_stand_pose(world, &character, &char_talk_anim);

        match option.text {
            Some(text) => {
                tracing::debug!(target: "dialog", "{}: {}", player_id, text);
                world.add_subtitle(
                    text,
                    TextPosition::scene(player_text_pos),
                    false,
                    TextType::Talk,
                    Color::BLACK,
                    self.slot.action_callback(),
                );
                self.start_talk_anim(world, &player_id, &talk_anim);
            }
            None => self.resume(world)?,
        }

        Ok(true)
    }

    fn resume(&mut self, world: &mut World) -> ActionResult<()> {
        let character = self.character.clone().unwrap_or_default();

        match self.state {
            DialogState::TalkingPlayer => {
                if let Ok(player) = world.player() {
                    let player_id = player.id.clone();
                    self.restore_previous(world, &player_id);
                }

                let response = self.response_text.take();
                let actor_pos = world
                    .actor(&character, false)
                    .map(|a| Vec2::new(a.position.x, a.position.y + a.bbox.y));

                match (response, actor_pos) {
                    (Some(text), Some(pos)) => {
                        tracing::debug!(target: "dialog", "{}: {}", character, text);
                        self.state = DialogState::TalkingCharacter;
                        world.add_subtitle(
                            text,
                            TextPosition::scene(pos),
                            false,
                            TextType::Talk,
                            Color::BLACK,
                            self.slot.action_callback(),
                        );
                        let char_talk_anim = self.char_talk_anim.clone();
                        self.start_talk_anim(world, &character, &char_talk_anim);
                    }
                    (Some(_), None) => {
                        tracing::warn!(
                            target: "dialog",
                            "Dialog actor '{}' not found, skipping response",
                            character
                        );
                        self.state = DialogState::Idle;
                        self.slot.resume_verb(world.resumes_mut());
                    }
                    (None, _) => {
                        self.state = DialogState::Idle;
                        self.slot.resume_verb(world.resumes_mut());
                    }
                }
            }
            DialogState::TalkingCharacter => {
                self.restore_previous(world, &character);
                self.state = DialogState::Idle;
                self.slot.resume_verb(world.resumes_mut());
            }
            DialogState::Idle => {
                tracing::warn!(target: "dialog", "say_dialog resumed while idle");
            }
        }
        Ok(())
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

    #[test]
    fn test_default_talk_animations() {
        let mut action = SayDialogAction::default();
        action.set_params(&HashMap::new()).unwrap();
        assert_eq!(action.talk_anim, "talk");
        assert_eq!(action.char_talk_anim, "talk");
        assert_eq!(action.state(), DialogState::Idle);

        let mut params = HashMap::new();
        params.insert("player_talk_animation".to_string(), "shout".to_string());
        action.set_params(&params).unwrap();
        assert_eq!(action.talk_anim, "shout");
    }

    #[test]
    fn test_state_roundtrip() {
        let action = SayDialogAction {
            state: DialogState::TalkingCharacter,
            character: Some("pirate".to_string()),
            previous_anim: Some("stand.left".to_string()),
            ..Default::default()
        };
        let state = action.write().unwrap();
        let mut restored = SayDialogAction::default();
        restored.read(&state).unwrap();
        assert_eq!(restored.state(), DialogState::TalkingCharacter);
        assert_eq!(restored.previous_anim.as_deref(), Some("stand.left"));
    }
}
