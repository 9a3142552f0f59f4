//! Integration tests for the dial path
//!
//! Plan → execute through a recording driver → check the exact key events
//! and the believed code, without any real waiting.

use std::time::Duration;

use codeopener::core::{KeyEvent, RecordingDriver, Resetter, TransitionEngine};
use codeopener::types::{simulate, Action, Code, LockState, TimingProfile};
use codeopener::SCANCODE_DIAL;
use pretty_assertions::assert_eq;

fn code(s: &str) -> Code {
    s.parse().unwrap()
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// Expand a hold into its four driver events
fn hold(held: Duration, after: Duration) -> Vec<KeyEvent> {
    vec![
        KeyEvent::Press(SCANCODE_DIAL),
        KeyEvent::Wait(held),
        KeyEvent::Release(SCANCODE_DIAL),
        KeyEvent::Wait(after),
    ]
}

/// One slot switch followed by the runner's inter-slot pause
fn switch_runner() -> Vec<KeyEvent> {
    let mut events = hold(secs(0.05), secs(0.10));
    events.push(KeyEvent::Wait(secs(0.10)));
    events
}

/// Exact event stream for 120 → 340 with runner timing
#[test]
fn test_exact_events_for_three_digit_transition() {
    let engine = TransitionEngine::new(TimingProfile::runner());
    let mut driver = RecordingDriver::new();

    let next = engine.execute(&mut driver, &code("120"), &code("340")).unwrap();
    assert_eq!(next, code("340"));

    let mut expected = Vec::new();
    expected.extend(hold(secs(2.00), secs(0.65)));
    expected.extend(switch_runner());
    expected.extend(hold(secs(2.00), secs(0.65)));
    expected.extend(switch_runner());
    expected.extend(hold(secs(6.20), secs(0.65)));
    expected.extend(switch_runner());
    assert_eq!(driver.events(), expected.as_slice());
}

/// Consecutive transitions chain through the believed code
#[test]
fn test_chained_transitions_track_belief() {
    let engine = TransitionEngine::new(TimingProfile::instant());
    let mut driver = RecordingDriver::new();

    let mut current = code("000");
    for target in ["010", "020", "030", "990", "000"] {
        current = engine.execute(&mut driver, &current, &code(target)).unwrap();
        assert_eq!(current, code(target));
    }
}

/// Wraparound: lowering a digit costs the long way round
#[test]
fn test_decrement_wraps_forward() {
    let actions = TransitionEngine::plan(&code("5000"), &code("4000")).unwrap();
    assert_eq!(actions[0], Action::Rotate { slot: 0, from: 5, to: 4, rotations: 9 });
}

/// Descending runs cost more hold time than ascending ones
#[test]
fn test_descending_step_is_slower_than_ascending() {
    let engine = TransitionEngine::new(TimingProfile::runner());

    let mut up = RecordingDriver::new();
    engine.execute(&mut up, &code("120"), &code("130")).unwrap();

    let mut down = RecordingDriver::new();
    engine.execute(&mut down, &code("130"), &code("120")).unwrap();

    assert!(down.total_wait() > up.total_wait());
}

/// Reset then run: the resetter's end state is the runner's assumed start
#[test]
fn test_reset_hands_off_to_runner() {
    let resetter = Resetter::new(TimingProfile::instant());
    let mut driver = RecordingDriver::new();

    let observed = LockState::new(code("4172"), 3);
    let start = code("1230");
    let after = resetter.execute(&mut driver, &observed, &start).unwrap();
    assert_eq!(after, LockState::at_home(start.clone()));

    let actions = TransitionEngine::plan(&after.code, &code("1240")).unwrap();
    let model = simulate(&after, &actions);
    assert_eq!(model, LockState::at_home(code("1240")));
}

/// The resetter uses its own slower delays
#[test]
fn test_resetter_profile_delays() {
    let resetter = Resetter::default();
    let mut driver = RecordingDriver::new();
    resetter
        .execute(&mut driver, &LockState::new(code("100"), 0), &code("000"))
        .unwrap();

    // 9 rotations on slot 0, then settle 1.0s; already on slot 0 afterwards
    assert_eq!(driver.events(), hold(secs(5.65), secs(1.00)).as_slice());
}
