//! Calibrated timing, injected into the engine and resetter
//!
//! Everything is stored in seconds (the unit the dial was calibrated in)
//! and handed out as `Duration`.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::types::{OpenerError, Result};
use crate::{
    DIGIT_HOLD_SECS, KEY_PRESS_SECS, KEY_RELEASE_SECS, MAX_TIMING_SECS,
    RESETTER_SETTLE_SECS, RESETTER_SLOT_SWITCH_SECS,
    RUNNER_SETTLE_SECS, RUNNER_SLOT_SWITCH_SECS,
    START_DEBOUNCE_SECS, START_POLL_SECS,
};

/// One immutable set of timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingProfile {
    /// Hold time per rotation count; index 0 is the full circle
    pub digit_hold: [f64; 10],
    /// Wait after releasing a rotation hold
    pub settle: f64,
    /// Extra wait after a slot switch
    pub slot_switch: f64,
    /// Key-down time of a slot-switch tap
    pub key_press: f64,
    /// Key-up time after a slot-switch tap
    pub key_release: f64,
    /// Poll interval for the start key
    #[serde(default = "default_start_poll")]
    pub start_poll: f64,
    /// Grace period after the start key is detected
    #[serde(default = "default_start_debounce")]
    pub start_debounce: f64,
}

fn default_start_poll() -> f64 {
    START_POLL_SECS
}

fn default_start_debounce() -> f64 {
    START_DEBOUNCE_SECS
}

impl TimingProfile {
    /// Profile used while iterating combinations
    pub fn runner() -> Self {
        Self {
            digit_hold: DIGIT_HOLD_SECS,
            settle: RUNNER_SETTLE_SECS,
            slot_switch: RUNNER_SLOT_SWITCH_SECS,
            key_press: KEY_PRESS_SECS,
            key_release: KEY_RELEASE_SECS,
            start_poll: START_POLL_SECS,
            start_debounce: START_DEBOUNCE_SECS,
        }
    }

    /// Profile used by the one-shot reset; slower settle and slot switch
    pub fn resetter() -> Self {
        Self {
            settle: RESETTER_SETTLE_SECS,
            slot_switch: RESETTER_SLOT_SWITCH_SECS,
            ..Self::runner()
        }
    }

    /// All-zero profile for tests and dry runs
    pub fn instant() -> Self {
        Self {
            digit_hold: [0.0; 10],
            settle: 0.0,
            slot_switch: 0.0,
            key_press: 0.0,
            key_release: 0.0,
            start_poll: 0.0,
            start_debounce: 0.0,
        }
    }

    /// Hold needed to rotate the active digit `rotations` steps.
    ///
    /// `0` means a full circle, the longest hold.
    pub fn hold_duration(&self, rotations: u8) -> Result<Duration> {
        self.digit_hold
            .get(usize::from(rotations))
            .map(|secs| Duration::from_secs_f64(*secs))
            .ok_or(OpenerError::InvalidDigit(u32::from(rotations)))
    }

    /// Hold for one full circle
    pub fn full_circle(&self) -> Duration {
        Duration::from_secs_f64(self.digit_hold[0])
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs_f64(self.settle)
    }

    pub fn slot_switch(&self) -> Duration {
        Duration::from_secs_f64(self.slot_switch)
    }

    pub fn key_press(&self) -> Duration {
        Duration::from_secs_f64(self.key_press)
    }

    pub fn key_release(&self) -> Duration {
        Duration::from_secs_f64(self.key_release)
    }

    pub fn start_poll(&self) -> Duration {
        Duration::from_secs_f64(self.start_poll)
    }

    pub fn start_debounce(&self) -> Duration {
        Duration::from_secs_f64(self.start_debounce)
    }

    /// Check the physical constraints of the dial.
    ///
    /// Every value must lie in `0..=MAX_TIMING_SECS`. A profile whose holds
    /// are all zero is accepted (test/dry-run form).
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("settle", self.settle),
            ("slot_switch", self.slot_switch),
            ("key_press", self.key_press),
            ("key_release", self.key_release),
            ("start_poll", self.start_poll),
            ("start_debounce", self.start_debounce),
        ];
        let holds = self.digit_hold.iter().map(|v| ("digit_hold", *v));
        for (name, value) in scalars.into_iter().chain(holds) {
            if !value.is_finite() || value < 0.0 {
                return Err(OpenerError::TimingInvalid(format!("{} must be a non-negative number, got {}", name, value)));
            }
            if value > MAX_TIMING_SECS || Duration::try_from_secs_f64(value).is_err() {
                return Err(OpenerError::TimingInvalid(format!(
                    "{} must not exceed {}s, got {}",
                    name, MAX_TIMING_SECS, value
                )));
            }
        }

        if self.digit_hold.iter().all(|v| *v == 0.0) {
            return Ok(());
        }

        for rotations in 2..10 {
            if self.digit_hold[rotations] <= self.digit_hold[rotations - 1] {
                return Err(OpenerError::TimingInvalid(format!(
                    "hold for {} rotations ({}s) must exceed hold for {} ({}s)",
                    rotations,
                    self.digit_hold[rotations],
                    rotations - 1,
                    self.digit_hold[rotations - 1]
                )));
            }
        }
        if self.digit_hold[0] <= self.digit_hold[9] {
            return Err(OpenerError::TimingInvalid(format!(
                "full circle ({}s) must be the longest hold",
                self.digit_hold[0]
            )));
        }
        Ok(())
    }

    /// Load and validate a profile from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)
            .map_err(|e| OpenerError::TimingInvalid(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        TimingProfile::runner().validate().unwrap();
        TimingProfile::resetter().validate().unwrap();
        TimingProfile::instant().validate().unwrap();
    }

    #[test]
    fn test_holds_strictly_increase_with_rotations() {
        let profile = TimingProfile::runner();
        let mut previous = Duration::ZERO;
        // Full circle behaves as the tenth rotation
        for rotations in (1..10).chain(std::iter::once(0)) {
            let hold = profile.hold_duration(rotations).unwrap();
            assert!(hold > previous, "hold for {} not above previous", rotations);
            previous = hold;
        }
        assert_eq!(profile.full_circle(), previous);
    }

    #[test]
    fn test_hold_out_of_range() {
        assert!(TimingProfile::runner().hold_duration(10).is_err());
    }

    #[test]
    fn test_profiles_differ_only_in_delays() {
        let runner = TimingProfile::runner();
        let resetter = TimingProfile::resetter();
        assert_eq!(runner.digit_hold, resetter.digit_hold);
        assert!(resetter.settle > runner.settle);
        assert!(resetter.slot_switch > runner.slot_switch);
    }

    #[test]
    fn test_rejects_non_monotonic_table() {
        let mut profile = TimingProfile::runner();
        profile.digit_hold[5] = 1.0;
        assert!(matches!(profile.validate(), Err(OpenerError::TimingInvalid(_))));
    }

    #[test]
    fn test_rejects_negative_delay() {
        let mut profile = TimingProfile::runner();
        profile.settle = -0.1;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_delay() {
        let mut profile = TimingProfile::runner();
        profile.settle = 1e300;
        assert!(matches!(profile.validate(), Err(OpenerError::TimingInvalid(_))));

        let mut profile = TimingProfile::runner();
        profile.start_debounce = MAX_TIMING_SECS + 1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_json_with_huge_settle_is_rejected() {
        let json = r#"{
            "digit_hold": [6.2, 1.35, 2.0, 2.5, 3.0, 3.55, 4.0, 4.6, 5.15, 5.65],
            "settle": 1e300, "slot_switch": 0.1, "key_press": 0.05, "key_release": 0.1
        }"#;
        assert!(matches!(TimingProfile::from_json(json), Err(OpenerError::TimingInvalid(_))));
    }

    #[test]
    fn test_json_defaults_start_timing() {
        let json = r#"{
            "digit_hold": [6.2, 1.35, 2.0, 2.5, 3.0, 3.55, 4.0, 4.6, 5.15, 5.65],
            "settle": 0.7, "slot_switch": 0.1, "key_press": 0.05, "key_release": 0.1
        }"#;
        let profile = TimingProfile::from_json(json).unwrap();
        assert_eq!(profile.start_poll, START_POLL_SECS);
        assert_eq!(profile.settle, 0.7);
    }
}
