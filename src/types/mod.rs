//! Core types for Codeopener

mod action;
mod code;
mod config;
mod error;
mod progress;
mod timing;

pub use action::{simulate, Action, LockState};
pub use code::{forward_rotations, rotate_forward, Code, CodeLength, DIGIT_BASE};
pub use config::{ContinueDirection, Direction, LockConfig, Strategy};
pub use error::{OpenerError, Result};
pub use progress::{format_duration, ProgressReport, RunSummary};
pub use timing::TimingProfile;
