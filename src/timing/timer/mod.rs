use crate::{
    event::{Handler, Notifier, SubscriptionKey, TimerData},
    timing::{TimeBreakdown, TimerPhase},
};
use log::{info, warn};
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

/// Ways in which constructing a timer can fail.
#[derive(Debug, Copy, Clone, snafu::Snafu)]
pub enum Error {
    /// The separator can not be a dot
    InvalidConfiguration,
}

/// The Result type for constructing timers.
pub type Result<T> = std::result::Result<T, Error>;

/// A timer that can be shared across threads, guarded by a lock.
pub type SharedTimer = Arc<RwLock<Timer>>;

/// The settings a timer is created with. Every field has a default, so a
/// partial configuration deserializes fine.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TimerOptions {
    /// The breakdown the timer shows until the first recomputation
    /// overwrites it.
    pub initial_time: TimeBreakdown,
    /// Marks the timer as a countdown. Reserved; the arithmetic never
    /// consults it.
    pub is_count_down: bool,
    /// The character joining the fields of the textual breakdown. A dot is
    /// rejected.
    pub separator: char,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            initial_time: TimeBreakdown::ZERO,
            is_count_down: false,
            separator: ':',
        }
    }
}

/// A timer's state machine: the status, the elapsed-time accounting and the
/// status-change notifications.
///
/// The timer itself never looks at a clock. Every operation that accounts
/// time takes the current wall-clock timestamp in milliseconds since the
/// Unix epoch, which is what makes the state machine fully deterministic
/// under test. [`TimerEngine`](crate::TimerEngine) owns a `Timer`, feeds it
/// timestamps from a [`Clock`](crate::platform::Clock) and drives the
/// periodic recomputation while the timer is running.
///
/// All state is per instance; two timers never share any accounting.
pub struct Timer {
    breakdown: TimeBreakdown,
    phase: TimerPhase,
    separator: char,
    is_count_down: bool,
    start_epoch: Option<u64>,
    end_epoch: Option<u64>,
    paused_at: Option<u64>,
    idle_ms: u64,
    notifier: Notifier,
}

impl Timer {
    /// Creates a timer with the default options.
    pub fn new() -> Self {
        Self::from_valid_options(TimerOptions::default())
    }

    /// Creates a timer from `options`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the separator is a dot.
    pub fn with_options(options: TimerOptions) -> Result<Self> {
        if options.separator == '.' {
            return Err(Error::InvalidConfiguration);
        }
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: TimerOptions) -> Self {
        Self {
            breakdown: options.initial_time,
            phase: TimerPhase::NotStarted,
            separator: options.separator,
            is_count_down: options.is_count_down,
            start_epoch: None,
            end_epoch: None,
            paused_at: None,
            idle_ms: 0,
            notifier: Notifier::new(),
        }
    }

    /// Starts or resumes the timer at wall-clock time `now`. Returns whether
    /// a transition into `Running` happened.
    ///
    /// The first start captures the start epoch. Resuming after a pause
    /// folds the idle gap into the accounting, so the paused interval never
    /// shows up as elapsed time. Starting a running timer does nothing and a
    /// stopped timer can't be started again.
    pub fn start(&mut self, now: u64) -> bool {
        match self.phase {
            TimerPhase::NotStarted => {
                self.start_epoch = Some(now);
            }
            TimerPhase::Paused => {
                if let Some(paused_at) = self.paused_at.take() {
                    self.idle_ms += now.saturating_sub(paused_at);
                }
            }
            TimerPhase::Running => return false,
            TimerPhase::Stopped => {
                warn!(target: "Timer", "Attempted to start a stopped timer");
                return false;
            }
        }
        self.transition_to(TimerPhase::Running);
        true
    }

    /// Pauses the timer at wall-clock time `now`, recording the pause epoch
    /// so a later [`start`](Timer::start) can exclude the idle gap. Returns
    /// whether a transition happened; anything but a running timer is left
    /// alone.
    pub fn pause(&mut self, now: u64) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.paused_at = Some(now);
        self.transition_to(TimerPhase::Paused);
        true
    }

    /// Stops the timer for good at wall-clock time `now`, capturing the end
    /// epoch. Only a running or paused timer can be stopped; the transition
    /// is terminal.
    pub fn stop(&mut self, now: u64) -> bool {
        match self.phase {
            TimerPhase::Running | TimerPhase::Paused => {
                self.end_epoch = Some(now);
                self.paused_at = None;
                self.transition_to(TimerPhase::Stopped);
                true
            }
            TimerPhase::NotStarted | TimerPhase::Stopped => false,
        }
    }

    /// Recomputes the breakdown from the elapsed time at `now`. This is the
    /// tick body; it only does anything while the timer is running.
    pub fn refresh(&mut self, now: u64) {
        if self.phase != TimerPhase::Running {
            return;
        }
        if let Some(start_epoch) = self.start_epoch {
            let elapsed_ms = now.saturating_sub(start_epoch).saturating_sub(self.idle_ms);
            self.breakdown = TimeBreakdown::from_elapsed_ms(elapsed_ms);
        }
    }

    /// The current breakdown as text: the fields joined with the separator,
    /// most significant unit first, or the unit-named pretty form.
    ///
    /// Reading never mutates the timer; between two recomputations repeated
    /// calls return the same text.
    pub fn formatted(&self, pretty: bool) -> String {
        if pretty {
            self.breakdown.to_pretty()
        } else {
            self.breakdown.to_joined(self.separator)
        }
    }

    /// The current breakdown fields.
    pub const fn breakdown(&self) -> TimeBreakdown {
        self.breakdown
    }

    /// The status the timer currently is in.
    pub const fn current_phase(&self) -> TimerPhase {
        self.phase
    }

    /// Whether the timer is currently running.
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Whether the timer was created as a countdown. Reserved; the
    /// arithmetic never consults it.
    pub const fn is_count_down(&self) -> bool {
        self.is_count_down
    }

    /// The character the joined text form uses.
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// The lifecycle epochs delivered with every notification.
    pub const fn timer_data(&self) -> TimerData {
        TimerData {
            start_epoch: self.start_epoch,
            end_epoch: self.end_epoch,
        }
    }

    /// Registers `handler` for transitions into `phase`. Handlers run
    /// synchronously inside the transition, in subscription order.
    pub fn subscribe(&mut self, phase: TimerPhase, handler: Handler) -> SubscriptionKey {
        self.notifier.subscribe(phase, handler)
    }

    /// Removes a previous registration. Returns whether the subscription was
    /// still live.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.notifier.unsubscribe(key)
    }

    fn transition_to(&mut self, phase: TimerPhase) {
        self.phase = phase;
        info!(target: "Timer", "Timer is now {}", phase);
        let data = self.timer_data();
        self.notifier.emit(phase, &data);
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
