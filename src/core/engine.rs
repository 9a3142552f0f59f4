//! Transition Engine: moves the dial from one believed code to the next
//!
//! Per combination, starting and ending on slot 0:
//! - for each position but the last: rotate forward to the target digit,
//!   then step to the next slot (except after the second-to-last)
//! - step onto the last slot and do a full circle, which always lands on 0
//! - step once more, wrapping back to slot 0
//!
//! The last digit is never dialled to a value, only forced to 0. The
//! enumerator only produces targets ending in 0 for that reason.
//! Nothing is read back from the game.

use tracing::debug;
use crate::core::dial::Dial;
use crate::core::input::InputDriver;
use crate::types::{forward_rotations, simulate, Action, Code, LockState, OpenerError, Result, TimingProfile};

/// Runner-side engine with its injected timing
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    timing: TimingProfile,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(TimingProfile::runner())
    }
}

impl TransitionEngine {
    pub fn new(timing: TimingProfile) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    /// Actions that take the dial from `current` (slot 0) to `target`
    /// with its last digit forced to 0, ending back on slot 0.
    pub fn plan(current: &Code, target: &Code) -> Result<Vec<Action>> {
        if current.len() != target.len() {
            return Err(OpenerError::InvalidCode(format!(
                "cannot move {} to {}: lengths differ",
                current, target
            )));
        }
        let len = target.len();
        if len < 2 {
            return Err(OpenerError::InvalidCode(format!("{} is too short to dial", target)));
        }

        let mut actions = Vec::with_capacity(2 * len + 1);
        for slot in 0..len - 1 {
            let from = current.digit(slot);
            let to = target.digit(slot);
            let rotations = forward_rotations(from, to);
            if rotations != 0 {
                actions.push(Action::Rotate { slot, from, to, rotations });
            }
            if slot < len - 2 {
                actions.push(Action::SwitchSlot { count: 1, pause: true });
            }
        }

        actions.push(Action::SwitchSlot { count: 1, pause: true });
        actions.push(Action::FullCircle { slot: len - 1 });
        actions.push(Action::SwitchSlot { count: 1, pause: true });
        Ok(actions)
    }

    /// Dial `target` and return the new believed code.
    ///
    /// The returned code equals `target` with its last digit set to 0.
    pub fn execute<D: InputDriver + ?Sized>(&self, driver: &mut D, current: &Code, target: &Code) -> Result<Code> {
        let actions = Self::plan(current, target)?;
        debug!(from = %current, to = %target, steps = actions.len(), "transition");

        Dial::new(driver, &self.timing).perform_all(&actions)?;

        let after = simulate(&LockState::at_home(current.clone()), &actions);
        debug_assert_eq!(after.slot, 0);
        Ok(after.code)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyEvent, RecordingDriver};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::time::Duration;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn test_plan_three_digit_scenario() {
        // 120 -> 340: two rotations on each of the first two slots
        let actions = TransitionEngine::plan(&code("120"), &code("340")).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Rotate { slot: 0, from: 1, to: 3, rotations: 2 },
                Action::SwitchSlot { count: 1, pause: true },
                Action::Rotate { slot: 1, from: 2, to: 4, rotations: 2 },
                Action::SwitchSlot { count: 1, pause: true },
                Action::FullCircle { slot: 2 },
                Action::SwitchSlot { count: 1, pause: true },
            ]
        );
    }

    #[test]
    fn test_plan_skips_unchanged_digits() {
        let actions = TransitionEngine::plan(&code("350"), &code("350")).unwrap();
        assert!(actions.iter().all(|a| !matches!(a, Action::Rotate { .. })));
        // Full circle happens regardless
        assert!(actions.contains(&Action::FullCircle { slot: 2 }));
    }

    #[test]
    fn test_plan_four_digit_returns_home() {
        let actions = TransitionEngine::plan(&code("9990"), &code("0000")).unwrap();
        let taps: usize = actions.iter().map(Action::taps).sum();
        assert_eq!(taps, 4);
        let rotations: Vec<u8> = actions
            .iter()
            .filter_map(|a| match a {
                Action::Rotate { rotations, .. } => Some(*rotations),
                _ => None,
            })
            .collect();
        assert_eq!(rotations, vec![1, 1, 1]);
    }

    #[test]
    fn test_plan_rejects_mismatched_lengths() {
        assert!(TransitionEngine::plan(&code("120"), &code("1200")).is_err());
    }

    #[test]
    fn test_execute_returns_target_with_zero_tail() {
        let engine = TransitionEngine::new(TimingProfile::instant());
        let mut driver = RecordingDriver::new();
        let next = engine.execute(&mut driver, &code("127"), &code("345")).unwrap();
        assert_eq!(next, code("340"));
    }

    #[test]
    fn test_execute_hold_sequence_with_runner_timing() {
        let engine = TransitionEngine::default();
        let mut driver = RecordingDriver::new();
        engine.execute(&mut driver, &code("120"), &code("340")).unwrap();

        let holds = driver.hold_times();
        let tap = Duration::from_secs_f64(0.05);
        assert_eq!(
            holds,
            vec![
                Duration::from_secs_f64(2.00),
                tap,
                Duration::from_secs_f64(2.00),
                tap,
                Duration::from_secs_f64(6.20),
                tap,
            ]
        );
        assert_eq!(driver.events().last(), Some(&KeyEvent::Wait(Duration::from_secs_f64(0.10))));
    }

    fn arb_code(len: usize) -> impl Strategy<Value = Code> {
        proptest::collection::vec(0u8..10, len).prop_map(|d| Code::new(d).unwrap())
    }

    proptest! {
        #[test]
        fn prop_round_trip_three(current in arb_code(3), target in arb_code(3)) {
            let actions = TransitionEngine::plan(&current, &target).unwrap();
            let after = simulate(&LockState::at_home(current), &actions);
            prop_assert_eq!(after.slot, 0);
            prop_assert_eq!(after.code, target.with_last_zeroed());
        }

        #[test]
        fn prop_round_trip_four(current in arb_code(4), target in arb_code(4)) {
            let actions = TransitionEngine::plan(&current, &target).unwrap();
            let after = simulate(&LockState::at_home(current), &actions);
            prop_assert_eq!(after.slot, 0);
            prop_assert_eq!(after.code, target.with_last_zeroed());
        }

        #[test]
        fn prop_rotations_are_forward_and_bounded(current in arb_code(4), target in arb_code(4)) {
            for action in TransitionEngine::plan(&current, &target).unwrap() {
                if let Action::Rotate { rotations, from, to, .. } = action {
                    prop_assert!((1..=9).contains(&rotations));
                    prop_assert_eq!((from + rotations) % 10, to);
                }
            }
        }
    }
}
