//! The three stages, each driven from a loaded config
//!
//! generate → reset → run. Each stage is independent; `pipeline` in the CLI
//! runs them back to back in one process.

use std::path::{Path, PathBuf};
use tracing::info;
use crate::core::engine::TransitionEngine;
use crate::core::enumerator::{generate, load_combinations, save_combinations};
use crate::core::input::InputDriver;
use crate::core::resetter::Resetter;
use crate::core::runner::{wait_for_start, RunLoop};
use crate::types::{LockConfig, LockState, ProgressReport, Result, RunSummary, TimingProfile};
use crate::VK_START_SIGNAL;

/// Generate the list for the configured strategy and save it
pub fn generate_stage(config: &LockConfig, codes_dir: &Path) -> Result<(PathBuf, usize)> {
    let length = config.validate()?;
    let strategy = config.strategy();
    let combinations = generate(strategy, length, &config.start_code)?;
    let path = save_combinations(codes_dir, strategy, &combinations)?;
    Ok((path, combinations.len()))
}

/// Wait for the operator, then drive the observed dial to the start code.
///
/// The resetter waits for the same start signal as the run loop.
pub fn reset_stage<D: InputDriver + ?Sized>(
    config: &LockConfig,
    driver: &mut D,
    timing: TimingProfile,
) -> Result<LockState> {
    config.validate()?;
    let observed = LockState::new(config.current_code.clone(), config.slot);
    info!(target_code = %config.start_code, "reset waiting for start signal");
    wait_for_start(driver, &timing, VK_START_SIGNAL);
    Resetter::new(timing).execute(driver, &observed, &config.start_code)
}

/// Load the saved list for the configured strategy and enter it
pub fn run_stage<D, F>(
    config: &LockConfig,
    codes_dir: &Path,
    driver: &mut D,
    timing: TimingProfile,
    on_progress: F,
) -> Result<RunSummary>
where
    D: InputDriver + ?Sized,
    F: FnMut(&ProgressReport),
{
    let length = config.validate()?;
    let combinations = load_combinations(codes_dir, config.strategy())?;
    RunLoop::new(TransitionEngine::new(timing)).run(driver, length, &combinations, on_progress)
}

// =============================================================================
// TESTS
// =============================================================================
