//! Tests that drive the engine against the real wall clock and ticker
//! thread. Timing assertions use generous one-tick-plus tolerances, so they
//! hold on a loaded machine too.

use lapse_core::{TimeBreakdown, TimerEngine, TimerOptions, TimerPhase};
use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

fn sleep_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

/// Reverses a joined breakdown back into storage order and reconstructs the
/// milliseconds it represents.
fn reconstructed_ms(text: &str, separator: char) -> u64 {
    let mut fields: Vec<u64> = text
        .split(separator)
        .map(|field| field.parse().unwrap())
        .collect();
    fields.reverse();
    assert_eq!(fields.len(), 5);
    TimeBreakdown::new(fields[0], fields[1], fields[2], fields[3], fields[4]).total_ms()
}

#[test]
fn elapsed_time_tracks_the_wall_clock() {
    let mut engine = TimerEngine::new();
    engine.start();
    sleep_ms(550);

    let total = reconstructed_ms(&engine.formatted(false), ':');
    assert!((400..=900).contains(&total), "accounted {} ms", total);
}

#[test]
fn paused_intervals_are_excluded() {
    let mut engine = TimerEngine::new();
    engine.start();
    sleep_ms(300);
    engine.pause();
    sleep_ms(500);
    engine.start();
    sleep_ms(250);

    let total = reconstructed_ms(&engine.pause(), ':');
    assert!((400..=800).contains(&total), "accounted {} ms", total);
}

#[test]
fn a_resumed_timer_keeps_recomputing() {
    let mut engine = TimerEngine::new();
    engine.start();
    sleep_ms(150);
    let at_pause = engine.pause();

    engine.start();
    assert_eq!(engine.current_phase(), TimerPhase::Running);
    sleep_ms(350);

    let later = engine.formatted(false);
    assert!(
        reconstructed_ms(&later, ':') > reconstructed_ms(&at_pause, ':'),
        "{:?} should have advanced past {:?}",
        later,
        at_pause,
    );
}

#[test]
fn stop_is_terminal_and_freezes_the_breakdown() {
    let mut engine = TimerEngine::new();
    engine.start();
    sleep_ms(150);
    let at_stop = engine.stop();

    engine.start();
    assert_eq!(engine.current_phase(), TimerPhase::Stopped);

    sleep_ms(200);
    assert_eq!(engine.formatted(false), at_stop);
}

#[test]
fn custom_separator_and_pretty_form() {
    let options = TimerOptions {
        separator: '-',
        ..Default::default()
    };
    let mut engine = TimerEngine::with_options(options).unwrap();
    engine.start();
    sleep_ms(150);

    let text = engine.pause();
    assert_eq!(text.matches('-').count(), 4, "unexpected text {:?}", text);
    assert_eq!(
        engine.formatted(true),
        "0 seconds, 0 minutes, 0 hours, 0 days",
    );
}

#[test]
fn lifecycle_notifications_fire_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut engine = TimerEngine::new();
    for phase in [TimerPhase::Running, TimerPhase::Paused, TimerPhase::Stopped] {
        let seen = seen.clone();
        engine.subscribe(
            phase,
            Box::new(move |data| {
                seen.lock()
                    .unwrap()
                    .push((phase, data.start_epoch.is_some(), data.end_epoch.is_some()))
            }),
        );
    }

    engine.start();
    sleep_ms(120);
    engine.pause();
    engine.start();
    engine.stop();

    assert_eq!(
        *seen.lock().unwrap(),
        [
            (TimerPhase::Running, true, false),
            (TimerPhase::Paused, true, false),
            (TimerPhase::Running, true, false),
            (TimerPhase::Stopped, true, true),
        ],
    );
}

#[test]
fn engines_started_apart_account_independently() {
    let mut early = TimerEngine::new();
    let mut late = TimerEngine::new();

    early.start();
    sleep_ms(300);
    late.start();
    sleep_ms(300);

    let early_ms = reconstructed_ms(&early.pause(), ':');
    let late_ms = reconstructed_ms(&late.pause(), ':');
    assert!(
        early_ms > late_ms,
        "started-earlier engine accounted {} ms, later one {} ms",
        early_ms,
        late_ms,
    );
    assert!((100..=500).contains(&late_ms), "accounted {} ms", late_ms);
}

#[test]
fn dropping_a_running_engine_shuts_the_ticker_down() {
    let mut engine = TimerEngine::new();
    engine.start();
    sleep_ms(120);
    drop(engine);
}
