//! Resetter: one-shot move from an observed dial state to the start code
//!
//! Unlike the runner it may start on any slot, may touch every position
//! (including the last) and finishes on slot 0. It has its own, slower
//! timing profile.

use tracing::{debug, info};
use crate::core::dial::Dial;
use crate::core::input::InputDriver;
use crate::types::{forward_rotations, simulate, Action, Code, LockState, OpenerError, Result, TimingProfile};

/// Forward taps from slot `from` to slot `to` on a `len`-slot dial
pub fn slot_delta(from: usize, to: usize, len: usize) -> usize {
    (to + len - from % len) % len
}

#[derive(Debug, Clone)]
pub struct Resetter {
    timing: TimingProfile,
}

impl Default for Resetter {
    fn default() -> Self {
        Self::new(TimingProfile::resetter())
    }
}

impl Resetter {
    pub fn new(timing: TimingProfile) -> Self {
        Self { timing }
    }

    /// Actions taking `observed` to `start` on slot 0
    pub fn plan(observed: &LockState, start: &Code) -> Result<Vec<Action>> {
        let len = observed.code.len();
        if start.len() != len {
            return Err(OpenerError::InvalidCode(format!(
                "cannot reset {} to {}: lengths differ",
                observed.code, start
            )));
        }
        if observed.slot >= len {
            return Err(OpenerError::ConfigInvalid(format!("slot {} out of range", observed.slot)));
        }

        let mut actions = Vec::new();

        // Digits already right: only walk back to slot 0, no trailing pause
        if observed.code == *start {
            let delta = slot_delta(observed.slot, 0, len);
            if delta != 0 {
                actions.push(Action::SwitchSlot { count: delta, pause: false });
            }
            return Ok(actions);
        }

        let mut slot = observed.slot;
        for target_slot in 0..len {
            let from = observed.code.digit(target_slot);
            let to = start.digit(target_slot);
            if from == to {
                continue;
            }
            let delta = slot_delta(slot, target_slot, len);
            if delta != 0 {
                actions.push(Action::SwitchSlot { count: delta, pause: true });
                slot = target_slot;
            }
            let rotations = forward_rotations(from, to);
            actions.push(Action::Rotate { slot: target_slot, from, to, rotations });
        }

        let delta = slot_delta(slot, 0, len);
        if delta != 0 {
            actions.push(Action::SwitchSlot { count: delta, pause: true });
        }
        Ok(actions)
    }

    /// Drive the dial to `start` and return the resulting believed state
    pub fn execute<D: InputDriver + ?Sized>(&self, driver: &mut D, observed: &LockState, start: &Code) -> Result<LockState> {
        let actions = Self::plan(observed, start)?;
        if actions.is_empty() {
            info!(code = %start, "dial already at start position");
        } else {
            info!(from = %observed.code, slot = observed.slot, to = %start, "resetting");
        }

        let mut dial = Dial::new(driver, &self.timing);
        for action in &actions {
            debug!(%action, "reset step");
            dial.perform(action)?;
        }

        Ok(simulate(observed, &actions))
    }
}

// =============================================================================
// TESTS
// =============================================================================
