//! Codeopener: open-loop driver for in-game combination dials
//!
//! The dial is worked through a single key: a short tap moves the active
//! slot forward, a long hold rotates the active digit forward by an amount
//! that depends on how long the key stays down. Nothing is read back from
//! the game, so every module here keeps a local model of the lock and
//! assumes each timed action lands exactly as calibrated.
//!
//! Stages: generate → reset → run (see `core`).

pub mod core;
pub mod types;

// =============================================================================
// KEYS
// =============================================================================

/// Hardware scan code of the dial key (F)
pub const SCANCODE_DIAL: u16 = 0x21;

/// Virtual key polled as the operator's start signal (Backspace)
pub const VK_START_SIGNAL: u16 = 0x08;

// =============================================================================
// HOLD TABLE [C] - Empirically calibrated seconds per rotation count
// =============================================================================

/// Index = rotation count, index 0 = full circle (back to 0).
/// Rotations 1..=9 are strictly increasing; the full circle is the longest hold.
pub const DIGIT_HOLD_SECS: [f64; 10] = [6.20, 1.35, 2.00, 2.50, 3.00, 3.55, 4.00, 4.60, 5.15, 5.65];

/// Key-down time for a slot-switch tap
pub const KEY_PRESS_SECS: f64 = 0.05;

/// Key-up time after a slot-switch tap
pub const KEY_RELEASE_SECS: f64 = 0.10;

// =============================================================================
// PROFILES [C] - Runner and resetter were calibrated separately
// =============================================================================

/// Settle after each rotation (runner)
pub const RUNNER_SETTLE_SECS: f64 = 0.65;

/// Pause after each slot switch (runner)
pub const RUNNER_SLOT_SWITCH_SECS: f64 = 0.10;

/// Settle after each rotation (resetter)
pub const RESETTER_SETTLE_SECS: f64 = 1.00;

/// Pause after each slot switch (resetter)
pub const RESETTER_SLOT_SWITCH_SECS: f64 = 0.50;

/// Ceiling for any single hold or delay in a timing profile
pub const MAX_TIMING_SECS: f64 = 60.0;

// =============================================================================
// START SIGNAL
// =============================================================================

/// Poll interval while waiting for the start key
pub const START_POLL_SECS: f64 = 0.10;

/// Grace period after the start key is seen, so the keypress itself settles
pub const START_DEBOUNCE_SECS: f64 = 0.50;

// =============================================================================
// RUN LOOP
// =============================================================================

/// Rolling window size for ETA averaging
pub const ETA_WINDOW: usize = 100;

/// Samples needed before the rolling average replaces the fixed estimate
pub const ETA_MIN_SAMPLES: usize = 5;

/// Fixed per-combination estimate used until enough samples exist
pub const ESTIMATED_SECS_PER_COMBINATION: f64 = 6.0;

// =============================================================================
// FILES
// =============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Subdirectory (next to the config) holding generated combination lists
pub const CODES_SUBDIR: &str = "codes";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
