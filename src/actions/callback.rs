//! 动作回调（续延）协议
//!
//! 异步动作在 `run` 返回 `true` 后必须且只能触发一次回调。回调令牌不可克隆，
//! 触发时被消耗，推入 `ResumeQueue`，由 `World::pump` 在同一帧或之后的帧分发。
//!
//! ```text
//! VerbRunner ──run(cb)──► Action ──cb──► TextManager / SceneCamera / Timers
//!     ▲                                          │ (完成时)
//!     └──────────── ResumeQueue ◄────────────────┘
//! ```

use crate::verbs::VerbRunnerId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 回调目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallbackTarget {
    /// 恢复动词执行（继续下一个动作）
    Verb,
    /// 回到动作本身（`Action::resume`），用于多阶段动作
    Action,
}

/// 回调令牌
///
/// 标识发起等待的执行器和动作序号。只能通过 `resume` 消耗一次。
#[must_use = "a callback must be fired or handed to a subsystem that fires it"]
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCallback {
    runner: VerbRunnerId,
    step: usize,
    target: CallbackTarget,
}

impl ActionCallback {
    /// 创建恢复动词执行的回调
    pub(crate) fn for_verb(runner: VerbRunnerId, step: usize) -> Self {
        Self {
            runner,
            step,
            target: CallbackTarget::Verb,
        }
    }

    /// 创建指向同一动作自身的回调
    ///
    /// 多阶段动作（如对话）把它交给子系统，完成时回到 `Action::resume`。
    pub fn for_action(&self) -> Self {
        Self {
            runner: self.runner,
            step: self.step,
            target: CallbackTarget::Action,
        }
    }

    pub fn runner(&self) -> VerbRunnerId {
        self.runner
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn target(&self) -> CallbackTarget {
        self.target
    }

    /// 触发回调
    pub fn resume(self, queue: &mut ResumeQueue) {
        tracing::trace!(
            target: "verb",
            "Callback fired: {:?} step {} ({:?})",
            self.runner,
            self.step,
            self.target
        );
        queue.push(self);
    }
}

/// 待分发的回调队列
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResumeQueue {
    pending: VecDeque<ActionCallback>,
}

impl ResumeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, cb: ActionCallback) {
        self.pending.push_back(cb);
    }

    pub(crate) fn pop(&mut self) -> Option<ActionCallback> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 丢弃指向某个执行器的所有回调（执行器被取消时）
    pub(crate) fn discard_runner(&mut self, runner: VerbRunnerId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|cb| cb.runner != runner);
        before - self.pending.len()
    }
}

/// 等待型动作持有的动词回调
///
/// 相当于"带回调的动作"基类：保存 `run` 收到的回调，在动作完成时恢复动词。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CallbackSlot {
    verb_cb: Option<ActionCallback>,
}

impl CallbackSlot {
    /// 保存动词回调
    pub fn set(&mut self, cb: ActionCallback) {
        if let Some(old) = self.verb_cb.replace(cb) {
            tracing::warn!(target: "verb", "Replacing a verb callback that never fired: {:?}", old);
        }
    }

    /// 为动作自身创建回调（需要先 `set`）
    pub fn action_callback(&self) -> Option<ActionCallback> {
        self.verb_cb.as_ref().map(ActionCallback::for_action)
    }

    /// 恢复动词执行
    ///
    /// 返回 `false` 表示回调已经触发过（重复恢复被忽略）。
    pub fn resume_verb(&mut self, queue: &mut ResumeQueue) -> bool {
        match self.verb_cb.take() {
            Some(cb) => {
                cb.resume(queue);
                true
            }
            None => {
                tracing::warn!(target: "verb", "Verb callback already fired, ignoring resume");
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.verb_cb.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_targets() {
        let cb = ActionCallback::for_verb(VerbRunnerId(7), 2);
        let child = cb.for_action();
        assert_eq!(cb.target(), CallbackTarget::Verb);
        assert_eq!(child.target(), CallbackTarget::Action);
        assert_eq!(child.runner(), VerbRunnerId(7));
        assert_eq!(child.step(), 2);

        let mut queue = ResumeQueue::new();
        child.resume(&mut queue);
        cb.resume(&mut queue);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().map(|c| c.target()), Some(CallbackTarget::Action));
        assert_eq!(queue.pop().map(|c| c.target()), Some(CallbackTarget::Verb));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_slot_fires_once() {
        let mut queue = ResumeQueue::new();
        let mut slot = CallbackSlot::default();
        slot.set(ActionCallback::for_verb(VerbRunnerId(1), 0));
        assert!(slot.is_pending());
        assert!(slot.action_callback().is_some());

        assert!(slot.resume_verb(&mut queue));
        assert!(!slot.resume_verb(&mut queue));
        assert_eq!(queue.len(), 1);
        assert!(slot.action_callback().is_none());
    }

    #[test]
    fn test_discard_runner() {
        let mut queue = ResumeQueue::new();
        ActionCallback::for_verb(VerbRunnerId(1), 0).resume(&mut queue);
        ActionCallback::for_verb(VerbRunnerId(2), 0).resume(&mut queue);
        ActionCallback::for_verb(VerbRunnerId(1), 3).resume(&mut queue);

        assert_eq!(queue.discard_runner(VerbRunnerId(1)), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop().map(|c| c.runner()), Some(VerbRunnerId(2)));
    }
}
