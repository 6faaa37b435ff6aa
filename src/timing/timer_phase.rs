use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes which lifecycle state a timer currently is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerPhase {
    /// The timer has been created, but never started.
    NotStarted,
    /// The timer is actively accumulating elapsed time.
    Running,
    /// The timer is halted. It can be resumed, which excludes the time spent
    /// in this state from the elapsed time.
    Paused,
    /// The timer has been stopped for good. This state is terminal.
    Stopped,
}

impl TimerPhase {
    /// Every state a timer can be in.
    pub const ALL: [TimerPhase; 4] = [
        TimerPhase::NotStarted,
        TimerPhase::Running,
        TimerPhase::Paused,
        TimerPhase::Stopped,
    ];

    /// Whether the phase is `Running`.
    pub fn is_running(self) -> bool {
        self == TimerPhase::Running
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerPhase::NotStarted => "not started",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Stopped => "stopped",
        })
    }
}
