//! 动词与动词执行器
//!
//! 动词是玩家触发的命名动作序列（`lookat`、`talkto`、`pickup`、场景的 `init` 等）。
//! 运行动词时创建一个 `VerbRunner`，由 `World::pump` 驱动。

pub mod runner;

pub use runner::{RunnerState, SavedAction, SavedRunner, VerbRunner};

use crate::actions::callback::ResumeQueue;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// 场景初始化动词
pub const INIT_VERB: &str = "init";
pub const LOOKAT_VERB: &str = "lookat";
pub const TALKTO_VERB: &str = "talkto";
pub const PICKUP_VERB: &str = "pickup";

/// 执行器ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerbRunnerId(pub u64);

impl fmt::Display for VerbRunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runner#{}", self.0)
    }
}

/// 文档中的动作描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub action: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl ActionSpec {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// 动词
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verb {
    pub id: String,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl Verb {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.actions.push(action);
        self
    }
}

/// 按ID查找动词
pub fn find_verb<'a>(verbs: &'a [Verb], id: &str) -> Option<&'a Verb> {
    verbs.iter().find(|v| v.id == id)
}

/// 世界持有的执行器集合
#[derive(Debug, Default)]
pub struct VerbRunners {
    pub(crate) runners: HashMap<VerbRunnerId, VerbRunner>,
    pub(crate) next_id: u64,
    /// 等待首次执行的执行器
    pub(crate) starts: VecDeque<VerbRunnerId>,
    pub(crate) resumes: ResumeQueue,
    pub(crate) pumping: bool,
    /// 正在执行（已从表中取出）的执行器
    pub(crate) active: Option<VerbRunnerId>,
    /// 执行期间被取消
    pub(crate) active_cancelled: bool,
}

impl VerbRunners {
    pub(crate) fn allocate_id(&mut self) -> VerbRunnerId {
        self.next_id += 1;
        VerbRunnerId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.runners.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: VerbRunnerId) -> Option<&VerbRunner> {
        self.runners.get(&id)
    }

    pub fn contains(&self, id: VerbRunnerId) -> bool {
        self.runners.contains_key(&id) || self.active == Some(id)
    }

    /// 所有执行器ID（排序）
    pub fn ids(&self) -> Vec<VerbRunnerId> {
        let mut ids: Vec<VerbRunnerId> = self.runners.keys().copied().collect();
        ids.extend(self.active);
        ids.sort_unstable();
        ids
    }

    pub fn pending_resumes(&self) -> usize {
        self.resumes.len()
    }
}
