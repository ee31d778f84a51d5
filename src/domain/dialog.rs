//! 对话数据

use crate::domain::errors::{SceneError, SceneResult};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// 选项执行后的对话走向
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogNext {
    /// 留在当前对话
    #[default]
    Stay,
    /// 结束对话
    End,
    /// 切换到同一角色的另一个对话
    Dialog(String),
}

/// 对话选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogOption {
    /// 玩家台词
    #[serde(default)]
    pub text: Option<String>,
    /// 回应台词
    #[serde(default)]
    pub response_text: Option<String>,
    /// 选中时运行的动词（所属角色的动词）
    #[serde(default)]
    pub verb: Option<String>,
    #[serde(default)]
    pub next: DialogNext,
    /// 只能选择一次
    #[serde(default)]
    pub once: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl DialogOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            visible: true,
            ..Default::default()
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response_text = Some(response.into());
        self
    }

    pub fn with_next(mut self, next: DialogNext) -> Self {
        self.next = next;
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// 对话，属于某个角色（回应者）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub id: String,
    #[serde(default)]
    pub options: Vec<DialogOption>,
    #[serde(default)]
    pub current_option: Option<usize>,
}

impl Dialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_option(mut self, option: DialogOption) -> Self {
        self.options.push(option);
        self
    }

    /// 可见选项的序号
    pub fn visible_options(&self) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.visible)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn current_option(&self) -> Option<&DialogOption> {
        self.current_option.and_then(|i| self.options.get(i))
    }

    /// 选择选项；`once` 选项在选择后隐藏
    pub fn select(&mut self, index: usize) -> SceneResult<&DialogOption> {
        let dialog = self.id.clone();
        let option = self
            .options
            .get_mut(index)
            .filter(|o| o.visible)
            .ok_or(SceneError::OptionNotAvailable { dialog, index })?;

        if option.once {
            option.visible = false;
        }
        self.current_option = Some(index);
        Ok(&self.options[index])
    }

    /// 重置 `once` 选项
    pub fn reset(&mut self) {
        for option in self.options.iter_mut().filter(|o| o.once) {
            option.visible = true;
        }
        self.current_option = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> Dialog {
        Dialog::new("intro")
            .with_option(DialogOption::new("Hello").with_response("Arr"))
            .with_option(DialogOption::new("Who are you?").once())
            .with_option(DialogOption::new("Bye").with_next(DialogNext::End))
    }

    #[test]
    fn test_select_once_hides_option() {
        let mut d = dialog();
        assert_eq!(d.visible_options(), vec![0, 1, 2]);
        assert_eq!(d.select(1).map(|o| o.text.clone()), Ok(Some("Who are you?".to_string())));
        assert_eq!(d.visible_options(), vec![0, 2]);
        assert_eq!(d.current_option().and_then(|o| o.text.as_deref()), Some("Who are you?"));
        assert_eq!(
            d.select(1).map(|_| ()),
            Err(SceneError::OptionNotAvailable {
                dialog: "intro".to_string(),
                index: 1
            })
        );

        d.reset();
        assert_eq!(d.visible_options(), vec![0, 1, 2]);
        assert!(d.current_option().is_none());
    }

    #[test]
    fn test_next_json() {
        let json = r#"{"text": "Bye", "next": "end"}"#;
        let option: DialogOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.next, DialogNext::End);
        assert!(option.visible);

        let json = r#"{"text": "Tell me more", "next": {"dialog": "story"}}"#;
        let option: DialogOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.next, DialogNext::Dialog("story".to_string()));
    }
}
