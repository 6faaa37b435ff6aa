#![warn(missing_docs)]

//! lapse-core is a library that provides the core functionality for tracking
//! the elapsed time of a stopwatch or countdown timer. A timer can be
//! started, paused, resumed and stopped, exposes its elapsed time as a
//! breakdown of tenths of a second, seconds, minutes, hours and days, and
//! notifies observers whenever its status changes. While a timer is running,
//! a background thread periodically recomputes the breakdown; time spent
//! paused never shows up as elapsed time.
//!
//! # Example
//!
//! ```
//! use lapse_core::{TimerEngine, TimerPhase};
//! use std::{thread, time::Duration};
//!
//! let mut engine = TimerEngine::new();
//! engine.start();
//! assert_eq!(engine.current_phase(), TimerPhase::Running);
//!
//! thread::sleep(Duration::from_millis(250));
//!
//! let at_pause = engine.pause();
//! // Reads are idempotent between recomputations.
//! assert_eq!(engine.formatted(false), at_pause);
//!
//! engine.stop();
//! assert_eq!(engine.current_phase(), TimerPhase::Stopped);
//! ```

pub mod engine;
pub mod event;
pub mod platform;
pub mod timing;

pub use crate::{
    engine::{TimerEngine, DEFAULT_UPDATE_INTERVAL},
    event::{Handler, SubscriptionKey, TimerData},
    timing::{Error, Result, SharedTimer, TimeBreakdown, Timer, TimerOptions, TimerPhase},
};
