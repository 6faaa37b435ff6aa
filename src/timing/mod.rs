//! The timer state machine and its elapsed-time model.

mod time_breakdown;
mod timer;
mod timer_phase;

pub use self::{
    time_breakdown::TimeBreakdown,
    timer::{Error, Result, SharedTimer, Timer, TimerOptions},
    timer_phase::TimerPhase,
};
