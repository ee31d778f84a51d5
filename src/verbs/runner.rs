use super::VerbRunnerId;
use crate::actions::callback::ActionCallback;
use crate::actions::registry::ActionRegistry;
use crate::actions::Action;
use crate::domain::errors::ActionResult;
use crate::domain::world::World;
use serde::{Deserialize, Serialize};

/// 执行器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerState {
    /// 可以执行（尚未开始或刚被恢复）
    Ready,
    /// 等待第 `step` 个动作的回调
    Waiting { step: usize },
    Finished,
    Cancelled,
}

/// 动词执行器
///
/// 顺序执行动作；动作请求等待时挂起，直到对应 `step` 的回调到达。
/// 过期的回调（不是当前等待的 `step`）被忽略。
#[derive(Debug)]
pub struct VerbRunner {
    id: VerbRunnerId,
    actor: Option<String>,
    verb: String,
    actions: Vec<Box<dyn Action>>,
    ip: usize,
    state: RunnerState,
}

impl VerbRunner {
    pub fn new(
        id: VerbRunnerId,
        actor: Option<String>,
        verb: impl Into<String>,
        actions: Vec<Box<dyn Action>>,
    ) -> Self {
        Self {
            id,
            actor,
            verb: verb.into(),
            actions,
            ip: 0,
            state: RunnerState::Ready,
        }
    }

    pub fn id(&self) -> VerbRunnerId {
        self.id
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// 下一个要执行的动作序号
    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, RunnerState::Finished | RunnerState::Cancelled)
    }

    pub(crate) fn cancel(&mut self) {
        self.state = RunnerState::Cancelled;
    }

    /// 从 `ip` 开始执行，直到某个动作请求等待或全部完成
    pub fn run(&mut self, world: &mut World) {
        if self.state != RunnerState::Ready {
            tracing::warn!(
                target: "verb",
                "{} '{}' is not ready ({:?})",
                self.id,
                self.verb,
                self.state
            );
            return;
        }

        while self.ip < self.actions.len() {
            let step = self.ip;
            let cb = ActionCallback::for_verb(self.id, step);
            let action = &mut self.actions[step];

            match action.run(world, cb) {
                Ok(true) => {
                    tracing::trace!(
                        target: "verb",
                        "{} '{}' waiting on '{}' (step {})",
                        self.id,
                        self.verb,
                        action.name(),
                        step
                    );
                    self.state = RunnerState::Waiting { step };
                    return;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        target: "verb",
                        "Action '{}' (step {}) of verb '{}' failed: {}",
                        action.name(),
                        step,
                        self.verb,
                        e
                    );
                }
            }
            self.ip += 1;
        }

        tracing::debug!(target: "verb", "{} '{}' finished", self.id, self.verb);
        self.state = RunnerState::Finished;
    }

    /// 动词回调：继续执行下一个动作
    pub fn resume(&mut self, step: usize, world: &mut World) {
        match self.state {
            RunnerState::Waiting { step: waiting } if waiting == step => {
                self.ip = step + 1;
                self.state = RunnerState::Ready;
                self.run(world);
            }
            state => {
                tracing::warn!(
                    target: "verb",
                    "Stale callback for {} '{}' step {} ({:?})",
                    self.id,
                    self.verb,
                    step,
                    state
                );
            }
        }
    }

    /// 动作回调：交给动作自身处理
    ///
    /// 动作处理失败时视为该动作已完成，继续执行动词。
    pub fn resume_action(&mut self, step: usize, world: &mut World) {
        let Some(action) = self.actions.get_mut(step) else {
            tracing::warn!(target: "verb", "Callback for missing step {} of {}", step, self.id);
            return;
        };
        if let Err(e) = action.resume(world) {
            tracing::error!(
                target: "verb",
                "Action '{}' (step {}) of verb '{}' failed on resume: {}",
                action.name(),
                step,
                self.verb,
                e
            );
            self.resume(step, world);
        }
    }

    /// 存档
    pub fn save(&self) -> ActionResult<SavedRunner> {
        let actions = self
            .actions
            .iter()
            .map(|a| {
                Ok(SavedAction {
                    action: a.name().to_string(),
                    state: a.write()?,
                })
            })
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(SavedRunner {
            id: self.id,
            actor: self.actor.clone(),
            verb: self.verb.clone(),
            ip: self.ip,
            state: self.state,
            actions,
        })
    }

    /// 读档：通过注册表重建动作并恢复状态
    pub fn restore(saved: &SavedRunner, registry: &ActionRegistry) -> ActionResult<Self> {
        let actions = saved
            .actions
            .iter()
            .map(|s| {
                let mut action = registry.create(&s.action)?;
                action.read(&s.state)?;
                Ok(action)
            })
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Self {
            id: saved.id,
            actor: saved.actor.clone(),
            verb: saved.verb.clone(),
            actions,
            ip: saved.ip,
            state: saved.state,
        })
    }
}

/// 存档中的执行器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRunner {
    pub id: VerbRunnerId,
    pub actor: Option<String>,
    pub verb: String,
    pub ip: usize,
    pub state: RunnerState,
    pub actions: Vec<SavedAction>,
}

/// 存档中的动作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAction {
    pub action: String,
    pub state: serde_json::Value,
}
