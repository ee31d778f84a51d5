//! 动作注册表

use super::{param, Action, CameraAction, LeaveAction, SayAction, SayDialogAction, SoundAction, WaitAction};
use crate::domain::errors::{ActionError, ActionResult};
use crate::verbs::ActionSpec;
use std::collections::HashMap;
use std::fmt;

type ActionFactory = Box<dyn Fn() -> Box<dyn Action> + Send + Sync>;

/// 动作注册表
///
/// 按名称创建动作实例；读档时也通过它重建执行器中的动作。
pub struct ActionRegistry {
    factories: HashMap<String, ActionFactory>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ActionRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// 注册所有内置动作
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("camera", || Box::new(CameraAction::default()));
        registry.register("say_dialog", || Box::new(SayDialogAction::default()));
        registry.register("say", || Box::new(SayAction::default()));
        registry.register("sound", || Box::new(SoundAction::default()));
        registry.register("leave", || Box::new(LeaveAction::default()));
        registry.register("wait", || Box::new(WaitAction::default()));
        registry
    }

    /// 注册动作，同名的旧注册被替换
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Action> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            tracing::debug!(target: "action", "Action '{}' re-registered", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// 已注册的动作名（排序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 创建未设置参数的动作
    pub fn create(&self, name: &str) -> ActionResult<Box<dyn Action>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))
    }

    /// 根据文档描述创建动作：检查必填参数并设置参数
    pub fn instantiate(&self, spec: &ActionSpec) -> ActionResult<Box<dyn Action>> {
        let mut action = self.create(&spec.action)?;
        param::validate(action.name(), action.params(), &spec.params)?;
        action.set_params(&spec.params)?;
        Ok(action)
    }

    /// 动作说明和参数声明（编辑器使用）
    pub fn describe(&self, name: &str) -> ActionResult<(&'static str, &'static [param::Param])> {
        let action = self.create(name)?;
        Ok((action.info(), action.params()))
    }
}
