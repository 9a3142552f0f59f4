//! Dial primitives: taps, timed holds, the full circle
//!
//! Every hold is press → wait(calibrated) → release → wait(settle).
//! Every tap is press → wait(key_press) → release → wait(key_release).

use std::time::Duration;
use tracing::debug;
use crate::core::input::InputDriver;
use crate::types::{Action, Result, TimingProfile};
use crate::SCANCODE_DIAL;

/// A driver bound to one key and one timing profile
pub struct Dial<'a, D: InputDriver + ?Sized> {
    driver: &'a mut D,
    timing: &'a TimingProfile,
    scancode: u16,
}

impl<'a, D: InputDriver + ?Sized> Dial<'a, D> {
    /// Dial on the default key
    pub fn new(driver: &'a mut D, timing: &'a TimingProfile) -> Self {
        Self::with_scancode(driver, timing, SCANCODE_DIAL)
    }

    pub fn with_scancode(driver: &'a mut D, timing: &'a TimingProfile, scancode: u16) -> Self {
        Self { driver, timing, scancode }
    }

    /// One short tap: moves the active slot forward by one
    pub fn tap(&mut self) {
        self.driver.press(self.scancode);
        self.driver.wait(self.timing.key_press());
        self.driver.release(self.scancode);
        self.driver.wait(self.timing.key_release());
    }

    /// `count` taps; zero does nothing
    pub fn switch_slot(&mut self, count: usize) {
        for _ in 0..count {
            self.tap();
        }
    }

    /// The calibrated pause that follows a slot switch
    pub fn slot_switch_pause(&mut self) {
        self.driver.wait(self.timing.slot_switch());
    }

    /// Hold for `duration`, release, settle
    fn hold(&mut self, duration: Duration) {
        self.driver.press(self.scancode);
        self.driver.wait(duration);
        self.driver.release(self.scancode);
        self.driver.wait(self.timing.settle());
    }

    /// Turn the active digit `rotations` steps forward; zero does nothing
    pub fn rotate(&mut self, rotations: u8) -> Result<()> {
        if rotations == 0 {
            return Ok(());
        }
        let duration = self.timing.hold_duration(rotations)?;
        self.hold(duration);
        Ok(())
    }

    /// Longest hold: the active digit ends on 0 whatever it showed
    pub fn full_circle(&mut self) {
        self.hold(self.timing.full_circle());
    }

    /// Execute one planned action
    pub fn perform(&mut self, action: &Action) -> Result<()> {
        debug!(%action, "dial");
        match *action {
            Action::SwitchSlot { count, pause } => {
                self.switch_slot(count);
                if pause {
                    self.slot_switch_pause();
                }
            }
            Action::Rotate { rotations, .. } => self.rotate(rotations)?,
            Action::FullCircle { .. } => self.full_circle(),
        }
        Ok(())
    }

    /// Execute a whole plan in order
    pub fn perform_all(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            self.perform(action)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
