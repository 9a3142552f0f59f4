//! Core modules for Codeopener

pub mod config;
pub mod dial;
pub mod engine;
pub mod enumerator;
pub mod input;
pub mod pipeline;
pub mod resetter;
pub mod runner;

pub use config::{codes_dir, load_config, load_timing, save_config, ConfigBuilder, StartPosition};
pub use dial::Dial;
pub use engine::TransitionEngine;
pub use enumerator::{ascending_range, descending_range, generate, load_combinations, save_combinations};
pub use input::{system_driver, DryRunDriver, InputDriver, KeyEvent, RecordingDriver};
pub use pipeline::{generate_stage, reset_stage, run_stage};
pub use resetter::{slot_delta, Resetter};
pub use runner::{initial_code, wait_for_start, EtaEstimator, RunLoop};
