//! 音频系统模块
//!
//! 引擎逻辑只通过 `AudioBackend` 发出播放/停止命令，具体的混音与解码由宿主提供。
//!
//! - `NullAudio` - 无声后端（无头运行）
//! - `MemoryAudio` - 记录所有命令的后端（测试、回放）

use crate::core::error::{AudioError, AudioResult};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

/// 音频后端
pub trait AudioBackend: fmt::Debug + Send + Sync {
    fn play(&mut self, name: &str, path: &str, volume: f32, looped: bool) -> AudioResult<()>;
    fn stop(&mut self, name: &str) -> AudioResult<()>;
    fn is_playing(&self, name: &str) -> bool;
    /// 停止所有声音（切换场景时）
    fn stop_all(&mut self);
}

/// 音频命令
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    Play {
        name: String,
        path: String,
        volume: f32,
        looped: bool,
    },
    Stop {
        name: String,
    },
    StopAll,
}

/// 无声后端
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, name: &str, _path: &str, _volume: f32, _looped: bool) -> AudioResult<()> {
        tracing::trace!(target: "audio", "play {} (muted)", name);
        Ok(())
    }

    fn stop(&mut self, _name: &str) -> AudioResult<()> {
        Ok(())
    }

    fn is_playing(&self, _name: &str) -> bool {
        false
    }

    fn stop_all(&mut self) {}
}

#[derive(Debug, Default)]
struct MemoryAudioState {
    commands: Vec<AudioCommand>,
    playing: HashSet<String>,
}

/// 记录命令的后端
///
/// 克隆共享同一份记录，测试可以在把后端交给 `World` 之后继续检查。
#[derive(Debug, Clone, Default)]
pub struct MemoryAudio {
    state: Arc<Mutex<MemoryAudioState>>,
}

impl MemoryAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的命令
    pub fn commands(&self) -> Vec<AudioCommand> {
        self.state
            .lock()
            .map(|s| s.commands.clone())
            .unwrap_or_default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MemoryAudioState) -> R) -> AudioResult<R> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        Ok(f(&mut state))
    }
}

impl AudioBackend for MemoryAudio {
    fn play(&mut self, name: &str, path: &str, volume: f32, looped: bool) -> AudioResult<()> {
        self.with_state(|s| {
            s.playing.insert(name.to_string());
            s.commands.push(AudioCommand::Play {
                name: name.to_string(),
                path: path.to_string(),
                volume,
                looped,
            });
        })
    }

    fn stop(&mut self, name: &str) -> AudioResult<()> {
        let was_playing = self.with_state(|s| {
            s.commands.push(AudioCommand::Stop {
                name: name.to_string(),
            });
            s.playing.remove(name)
        })?;
        if was_playing {
            Ok(())
        } else {
            Err(AudioError::NotPlaying(name.to_string()))
        }
    }

    fn is_playing(&self, name: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.playing.contains(name))
            .unwrap_or(false)
    }

    fn stop_all(&mut self) {
        let _ = self.with_state(|s| {
            s.playing.clear();
            s.commands.push(AudioCommand::StopAll);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_audio_records_commands() {
        let recorder = MemoryAudio::new();
        let mut backend: Box<dyn AudioBackend> = Box::new(recorder.clone());

        backend.play("door", "sfx/door.ogg", 1.0, false).unwrap();
        assert!(backend.is_playing("door"));
        backend.stop("door").unwrap();
        assert!(!backend.is_playing("door"));
        assert!(matches!(backend.stop("door"), Err(AudioError::NotPlaying(_))));

        let commands = recorder.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[0], AudioCommand::Play { name, .. } if name == "door"));
    }

    #[test]
    fn test_null_audio() {
        let mut backend = NullAudio;
        assert!(backend.play("music", "music.ogg", 0.5, true).is_ok());
        assert!(!backend.is_playing("music"));
    }
}
