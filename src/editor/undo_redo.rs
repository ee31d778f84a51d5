//! 撤销/重做系统
//!
//! 提供编辑器操作的撤销和重做功能，基于命令模式实现。
//!
//! # 架构设计
//!
//! - `Command` trait: 定义可撤销操作的接口，`C` 是命令操作的编辑器上下文
//! - `CommandManager`: 管理命令历史和执行
//! - `CompositeCommand`: 组合多个命令为一个原子操作
//!
//! # 示例
//!
//! ```ignore
//! let mut manager = CommandManager::new(100);
//! manager.execute(Box::new(CreateChapterCommand::new("part2")), &mut editor)?;
//! manager.undo(&mut editor)?;
//! manager.redo(&mut editor)?;
//! ```

use crate::project::ProjectError;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// 命令 trait - 定义可撤销操作的接口
pub trait Command<C>: fmt::Debug + Send {
    /// 执行命令
    fn execute(&mut self, context: &mut C) -> Result<(), CommandError>;

    /// 撤销命令
    fn undo(&mut self, context: &mut C) -> Result<(), CommandError>;

    /// 获取命令描述 (用于显示)
    fn description(&self) -> &str;
}

/// 命令错误
#[derive(Error, Debug)]
pub enum CommandError {
    /// 执行失败
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
    /// 撤销失败
    #[error("Undo failed: {0}")]
    UndoFailed(String),
    /// 无效状态
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// 项目文档操作失败
    #[error(transparent)]
    Project(#[from] ProjectError),
}

impl CommandError {
    /// 错误类别名
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::ExecutionFailed(_) => "ExecutionFailed",
            CommandError::UndoFailed(_) => "UndoFailed",
            CommandError::InvalidState(_) => "InvalidState",
            CommandError::Project(e) => e.kind(),
        }
    }
}

type Listener = Box<dyn Fn(&str, bool) + Send>;

/// 命令管理器
///
/// 管理命令历史，支持撤销/重做操作
pub struct CommandManager<C> {
    /// 撤销栈
    undo_stack: VecDeque<Box<dyn Command<C>>>,
    /// 重做栈
    redo_stack: VecDeque<Box<dyn Command<C>>>,
    /// 最大历史长度
    max_history: usize,
    /// 变更监听器（命令描述，是否为执行/重做）
    change_listeners: Vec<Listener>,
}

impl<C> fmt::Debug for CommandManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("undo_stack", &self.undo_stack)
            .field("redo_stack", &self.redo_stack)
            .field("max_history", &self.max_history)
            .field("listeners", &self.change_listeners.len())
            .finish()
    }
}

impl<C> CommandManager<C> {
    /// 创建命令管理器
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::with_capacity(max_history / 2),
            max_history,
            change_listeners: Vec::new(),
        }
    }

    /// 添加变更监听器
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&str, bool) + Send + 'static,
    {
        self.change_listeners.push(Box::new(listener));
    }

    fn notify(&self, command: &dyn Command<C>, forward: bool) {
        for listener in &self.change_listeners {
            listener(command.description(), forward);
        }
    }

    /// 执行命令
    ///
    /// 失败的命令不进入历史，重做栈保持不变。
    pub fn execute(&mut self, mut command: Box<dyn Command<C>>, context: &mut C) -> Result<(), CommandError> {
        command.execute(context)?;
        tracing::debug!(target: "editor", "Executed '{}'", command.description());

        self.notify(&*command, true);
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        Ok(())
    }

    /// 撤销
    pub fn undo(&mut self, context: &mut C) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = command.undo(context) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        tracing::debug!(target: "editor", "Undone '{}'", command.description());
        self.notify(&*command, false);
        self.redo_stack.push_back(command);
        Ok(true)
    }

    /// 重做
    pub fn redo(&mut self, context: &mut C) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = command.execute(context) {
            self.redo_stack.push_back(command);
            return Err(e);
        }
        tracing::debug!(target: "editor", "Redone '{}'", command.description());
        self.notify(&*command, true);
        self.undo_stack.push_back(command);
        Ok(true)
    }

    /// 检查是否可以撤销
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// 检查是否可以重做
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// 获取下一个撤销命令的描述
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    /// 获取下一个重做命令的描述
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|c| c.description())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// 清空历史
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// 获取所有撤销命令的描述（最近的在前）
    pub fn get_undo_history(&self) -> Vec<&str> {
        self.undo_stack.iter().rev().map(|c| c.description()).collect()
    }
}

impl<C> Default for CommandManager<C> {
    fn default() -> Self {
        Self::new(100)
    }
}

// ============================================================================
// 组合命令
// ============================================================================

/// 组合命令 - 将多个命令作为一个原子操作
#[derive(Debug)]
pub struct CompositeCommand<C> {
    commands: Vec<Box<dyn Command<C>>>,
    description: String,
}

impl<C> CompositeCommand<C> {
    pub fn new(description: &str) -> Self {
        Self {
            commands: Vec::new(),
            description: description.to_string(),
        }
    }

    /// 添加子命令
    pub fn add(&mut self, command: Box<dyn Command<C>>) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<C: fmt::Debug> Command<C> for CompositeCommand<C> {
    /// 任何子命令失败时撤销已执行的部分
    fn execute(&mut self, context: &mut C) -> Result<(), CommandError> {
        for i in 0..self.commands.len() {
            if let Err(e) = self.commands[i].execute(context) {
                for done in self.commands[..i].iter_mut().rev() {
                    if let Err(undo) = done.undo(context) {
                        tracing::error!(
                            target: "editor",
                            "Rollback of '{}' failed: {}",
                            done.description(),
                            undo
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn undo(&mut self, context: &mut C) -> Result<(), CommandError> {
        // 逆序撤销
        for cmd in self.commands.iter_mut().rev() {
            cmd.undo(context)?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct Push(i32);

    impl Command<Vec<i32>> for Push {
        fn execute(&mut self, context: &mut Vec<i32>) -> Result<(), CommandError> {
            if self.0 < 0 {
                return Err(CommandError::ExecutionFailed("negative".into()));
            }
            context.push(self.0);
            Ok(())
        }

        fn undo(&mut self, context: &mut Vec<i32>) -> Result<(), CommandError> {
            context
                .pop()
                .map(|_| ())
                .ok_or_else(|| CommandError::UndoFailed("empty".into()))
        }

        fn description(&self) -> &str {
            "Push"
        }
    }

    #[test]
    fn test_command_manager() {
        let mut manager = CommandManager::new(10);
        let mut context = Vec::new();

        assert!(!manager.can_undo());
        assert!(!manager.can_redo());

        manager.execute(Box::new(Push(1)), &mut context).unwrap();
        manager.execute(Box::new(Push(2)), &mut context).unwrap();
        assert_eq!(context, vec![1, 2]);
        assert_eq!(manager.undo_count(), 2);

        assert!(manager.undo(&mut context).unwrap());
        assert_eq!(context, vec![1]);
        assert_eq!(manager.redo_description(), Some("Push"));

        assert!(manager.redo(&mut context).unwrap());
        assert_eq!(context, vec![1, 2]);
        assert!(!manager.redo(&mut context).unwrap());
    }

    #[test]
    fn test_failed_command_not_recorded() {
        let mut manager = CommandManager::new(10);
        let mut context = Vec::new();
        assert!(manager.execute(Box::new(Push(-1)), &mut context).is_err());
        assert!(!manager.can_undo());
    }

    #[test]
    fn test_history_limit() {
        let mut manager = CommandManager::new(2);
        let mut context = Vec::new();
        for i in 0..5 {
            manager.execute(Box::new(Push(i)), &mut context).unwrap();
        }
        assert_eq!(manager.undo_count(), 2);
    }

    #[test]
    fn test_composite_rolls_back() {
        let mut composite = CompositeCommand::new("Batch");
        composite.add(Box::new(Push(1)));
        composite.add(Box::new(Push(2)));
        composite.add(Box::new(Push(-1)));

        let mut context = Vec::new();
        assert!(composite.execute(&mut context).is_err());
        assert!(context.is_empty());
    }

    #[test]
    fn test_listeners() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut manager = CommandManager::new(10);
        manager.add_listener(move |desc, forward| sink.lock().unwrap().push(format!("{}:{}", desc, forward)));

        let mut context = Vec::new();
        manager.execute(Box::new(Push(1)), &mut context).unwrap();
        manager.undo(&mut context).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["Push:true", "Push:false"]);
    }
}
