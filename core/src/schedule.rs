//! Pacing between poll cycles.

use std::ops::ControlFlow;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Decides how the poll loop waits between cycles, and whether it goes on.
pub trait Scheduler {
    /// Wait out `interval`. Returning `Break` ends the loop.
    fn wait(&mut self, interval: Duration) -> ControlFlow<()>;
}

/// Sleeps the calling thread and never stops the loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Scheduler for ThreadSleep {
    fn wait(&mut self, interval: Duration) -> ControlFlow<()> {
        std::thread::sleep(interval);
        ControlFlow::Continue(())
    }
}

/// Current wall-clock time in unix seconds.
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
