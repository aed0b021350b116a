use std::time::{Duration, Instant};

use crate::timer::TimerQueue;
use crate::types::TimerEvent;

/// Periodic refresh driver.
///
/// At most one `TimerEvent::Refresh` is pending at any time, and none is
/// scheduled once `stop` has been called.
#[derive(Debug)]
pub struct RefreshLoop {
    interval: Duration,
    running: bool,
    scheduled: bool,
}

impl RefreshLoop {
    pub fn new(interval: Duration) -> Self {
        Self { interval, running: true, scheduled: false }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queue the next tick unless stopped or one is already pending.
    pub fn schedule(&mut self, now: Instant, timers: &mut TimerQueue<TimerEvent>) -> bool {
        if !self.running || self.scheduled {
            return false;
        }
        self.scheduled = true;
        timers.schedule(now, self.interval, TimerEvent::Refresh);
        true
    }

    /// Consume a delivered tick. Returns whether the caller should refresh.
    pub fn begin_tick(&mut self) -> bool {
        self.scheduled = false;
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}
