//! The engine that owns a timer, its wall-clock source and the periodic
//! recomputation.

use crate::{
    event::{Handler, SubscriptionKey},
    platform::{Clock, SystemClock},
    timing::{Result, SharedTimer, TimeBreakdown, Timer, TimerOptions, TimerPhase},
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

/// The cadence the periodic recomputation defaults to, one tenth of a
/// second.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// A timer together with the machinery that keeps it ticking.
///
/// The engine owns the shared timer, a wall-clock source and, while the
/// timer is running, the background thread that periodically recomputes the
/// breakdown. The ticker is the engine's only recurring resource: it is
/// acquired on a start transition, released on pause and stop, and
/// re-acquired on resume, so nothing leaks across repeated cycles. All
/// public operations are synchronous and return immediately.
pub struct TimerEngine {
    timer: SharedTimer,
    clock: Arc<dyn Clock>,
    ticker: Option<Ticker>,
}

impl TimerEngine {
    /// Creates an engine with the default options, reading time from the
    /// system clock.
    pub fn new() -> Self {
        Self::from_timer(Timer::new(), Arc::new(SystemClock))
    }

    /// Creates an engine from `options`, reading time from the system clock.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the options name a dot separator.
    pub fn with_options(options: TimerOptions) -> Result<Self> {
        Ok(Self::from_timer(
            Timer::with_options(options)?,
            Arc::new(SystemClock),
        ))
    }

    /// Creates an engine that reads time from a caller-supplied clock.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the options name a dot separator.
    pub fn with_clock(options: TimerOptions, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self::from_timer(Timer::with_options(options)?, clock))
    }

    fn from_timer(timer: Timer, clock: Arc<dyn Clock>) -> Self {
        Self {
            timer: Arc::new(RwLock::new(timer)),
            clock,
            ticker: None,
        }
    }

    /// Starts or resumes the timer with the default recomputation cadence.
    pub fn start(&mut self) {
        self.start_with_interval(DEFAULT_UPDATE_INTERVAL);
    }

    /// Starts or resumes the timer, recomputing the breakdown every
    /// `interval`.
    ///
    /// Resuming a paused timer folds the idle gap into the accounting, so
    /// the paused interval never shows up as elapsed time. Starting a
    /// running timer does nothing and a stopped timer can't be started
    /// again.
    pub fn start_with_interval(&mut self, interval: Duration) {
        let now = self.clock.now_ms();
        let started = self.timer.write().start(now);
        if started && self.ticker.is_none() {
            self.ticker = Some(Ticker::spawn(
                self.timer.clone(),
                self.clock.clone(),
                interval,
            ));
        }
    }

    /// Pauses the timer and returns the current joined text form. Does
    /// nothing unless the timer is running; the ticker is released either
    /// way.
    pub fn pause(&mut self) -> String {
        let now = self.clock.now_ms();
        let text = {
            let mut timer = self.timer.write();
            timer.pause(now);
            timer.formatted(false)
        };
        self.ticker = None;
        text
    }

    /// Stops the timer for good and returns the current joined text form.
    /// The ticker is released permanently; a later
    /// [`start`](TimerEngine::start) is a no-op.
    pub fn stop(&mut self) -> String {
        let now = self.clock.now_ms();
        let text = {
            let mut timer = self.timer.write();
            timer.stop(now);
            timer.formatted(false)
        };
        self.ticker = None;
        text
    }

    /// The current breakdown as text: the fields joined with the separator,
    /// most significant unit first, or the unit-named pretty form.
    pub fn formatted(&self, pretty: bool) -> String {
        self.timer.read().formatted(pretty)
    }

    /// The current breakdown fields.
    pub fn breakdown(&self) -> TimeBreakdown {
        self.timer.read().breakdown()
    }

    /// The status the timer currently is in.
    pub fn current_phase(&self) -> TimerPhase {
        self.timer.read().current_phase()
    }

    /// Whether the timer is currently running.
    pub fn is_running(&self) -> bool {
        self.timer.read().is_running()
    }

    /// Whether the timer was created as a countdown. Reserved; the
    /// arithmetic never consults it.
    pub fn is_count_down(&self) -> bool {
        self.timer.read().is_count_down()
    }

    /// Registers `handler` for transitions into `phase`. Handlers run
    /// synchronously inside the transition, in subscription order.
    pub fn subscribe(&mut self, phase: TimerPhase, handler: Handler) -> SubscriptionKey {
        self.timer.write().subscribe(phase, handler)
    }

    /// Removes a previous registration. Returns whether the subscription was
    /// still live.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.timer.write().unsubscribe(key)
    }

    /// A shared handle to the underlying timer.
    pub fn shared_timer(&self) -> SharedTimer {
        self.timer.clone()
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The periodic recomputation, running on its own thread until told to shut
/// down. Dropping the handle signals the thread and joins it.
struct Ticker {
    sender: Sender<()>,
    join_handle: Option<JoinHandle<()>>,
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.sender.send(()).ok();
        self.join_handle.take().unwrap().join().ok();
    }
}

impl Ticker {
    fn spawn(timer: SharedTimer, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (sender, receiver) = bounded(1);
        let join_handle = thread::spawn(move || loop {
            match receiver.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let now = clock.now_ms();
                    timer.write().refresh(now);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            }
        });

        Self {
            sender,
            join_handle: Some(join_handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// A clock tests advance by hand.
    #[derive(Default)]
    struct TestClock(AtomicU64);

    impl TestClock {
        fn advance(&self, ms: u64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn engine_on_test_clock() -> (TimerEngine, Arc<TestClock>) {
        let clock = Arc::new(TestClock::default());
        let engine = TimerEngine::with_clock(TimerOptions::default(), clock.clone()).unwrap();
        (engine, clock)
    }

    #[test]
    fn pause_and_stop_report_the_breakdown() {
        let (mut engine, clock) = engine_on_test_clock();
        engine.start();
        clock.advance(2_500);
        // The state machine only recomputes on ticks; drive one by hand
        // through the shared handle instead of sleeping.
        let shared = engine.shared_timer();
        shared.write().refresh(clock.now_ms());

        assert_eq!(engine.pause(), "0:0:0:2:5");
        assert_eq!(engine.current_phase(), TimerPhase::Paused);

        clock.advance(10_000);
        assert_eq!(engine.stop(), "0:0:0:2:5");
        assert_eq!(engine.current_phase(), TimerPhase::Stopped);
    }

    #[test]
    fn resume_excludes_the_idle_gap() {
        let (mut engine, clock) = engine_on_test_clock();
        engine.start();
        clock.advance(300);
        engine.pause();
        clock.advance(500);
        engine.start();
        clock.advance(200);

        let shared = engine.shared_timer();
        shared.write().refresh(clock.now_ms());
        assert_eq!(engine.breakdown().total_ms(), 500);
    }

    #[test]
    fn a_stopped_engine_never_restarts() {
        let (mut engine, clock) = engine_on_test_clock();
        engine.start();
        clock.advance(100);
        engine.stop();
        engine.start();
        assert_eq!(engine.current_phase(), TimerPhase::Stopped);
        assert!(!engine.is_running());
    }

    #[test]
    fn engines_reject_a_dot_separator() {
        let options = TimerOptions {
            separator: '.',
            ..Default::default()
        };
        assert!(TimerEngine::with_options(options).is_err());
    }
}
