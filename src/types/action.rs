//! Dial actions and the local lock model they act on

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::types::{rotate_forward, Code};

/// Believed state of the physical lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    /// Digits the dial is believed to show
    pub code: Code,
    /// Active slot
    pub slot: usize,
}

impl LockState {
    pub fn new(code: Code, slot: usize) -> Self {
        Self { code, slot }
    }

    /// State with the active slot at 0
    pub fn at_home(code: Code) -> Self {
        Self { code, slot: 0 }
    }
}

/// One discrete thing done to the dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Tap the dial key `count` times; each tap moves the slot forward by one.
    /// `pause` adds the profile's slot-switch delay afterwards.
    SwitchSlot { count: usize, pause: bool },
    /// Hold the dial key so the active digit turns `rotations` steps forward
    Rotate { slot: usize, from: u8, to: u8, rotations: u8 },
    /// Longest hold; the active digit always ends on 0
    FullCircle { slot: usize },
}

impl Action {
    /// Update the model as if the action landed exactly as timed
    pub fn apply(&self, state: &mut LockState) {
        match *self {
            Action::SwitchSlot { count, .. } => {
                state.slot = (state.slot + count) % state.code.len();
            }
            Action::Rotate { rotations, .. } => {
                let slot = state.slot;
                let landed = rotate_forward(state.code.digit(slot), rotations);
                state.code.set_digit(slot, landed);
            }
            Action::FullCircle { .. } => {
                let slot = state.slot;
                state.code.set_digit(slot, 0);
            }
        }
    }

    /// Number of slot-switch taps this action produces
    pub fn taps(&self) -> usize {
        match self {
            Action::SwitchSlot { count, .. } => *count,
            _ => 0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SwitchSlot { count, .. } => write!(f, "switch x{}", count),
            Action::Rotate { slot, from, to, rotations } => {
                write!(f, "slot {}: {} -> {} ({} rotations)", slot, from, to, rotations)
            }
            Action::FullCircle { slot } => write!(f, "slot {}: full circle -> 0", slot),
        }
    }
}

/// Apply a whole plan to a model
pub fn simulate(start: &LockState, actions: &[Action]) -> LockState {
    let mut state = start.clone();
    for action in actions {
        action.apply(&mut state);
    }
    state
}

// =============================================================================
// TESTS
// =============================================================================
