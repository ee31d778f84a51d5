use crate::actions::callback::{ActionCallback, ResumeQueue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Timer {
    remaining: f32,
    callback: ActionCallback,
}

/// 计时器：到期时触发回调
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Timers {
    timers: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, time: f32, callback: ActionCallback) {
        self.timers.push(Timer {
            remaining: time,
            callback,
        });
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn update(&mut self, delta: f32, resumes: &mut ResumeQueue) {
        for timer in &mut self.timers {
            timer.remaining -= delta;
        }
        let (expired, pending): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.remaining <= 0.0);
        self.timers = pending;
        for timer in expired {
            timer.callback.resume(resumes);
        }
    }

    /// 取消所有计时器，回调立即触发
    pub fn clear(&mut self, resumes: &mut ResumeQueue) {
        for timer in self.timers.drain(..) {
            timer.callback.resume(resumes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verbs::VerbRunnerId;

    #[test]
    fn test_timers_expire_in_order() {
        let mut timers = Timers::new();
        let mut resumes = ResumeQueue::new();
        timers.add(0.5, ActionCallback::for_verb(VerbRunnerId(1), 0));
        timers.add(1.0, ActionCallback::for_verb(VerbRunnerId(2), 0));

        timers.update(0.6, &mut resumes);
        assert_eq!(resumes.len(), 1);
        assert_eq!(timers.len(), 1);

        timers.update(0.6, &mut resumes);
        assert_eq!(resumes.len(), 2);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_clear_fires_callbacks() {
        let mut timers = Timers::new();
        let mut resumes = ResumeQueue::new();
        timers.add(10.0, ActionCallback::for_verb(VerbRunnerId(1), 0));
        timers.clear(&mut resumes);
        assert_eq!(resumes.len(), 1);
    }
}
