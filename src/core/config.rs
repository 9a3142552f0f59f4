//! Configuration loading, building and saving
//!
//! The config file is the hand-off between stages: `configure` writes it,
//! `generate`, `reset` and `run` read it. Final dial state is never written
//! back; resuming means observing the dial again.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::types::{Code, CodeLength, ContinueDirection, Direction, LockConfig, OpenerError, Result, TimingProfile};
use crate::CODES_SUBDIR;

/// Read, parse and validate the config at `path`
pub fn load_config(path: &Path) -> Result<LockConfig> {
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => OpenerError::ConfigMissing { path: path.to_path_buf() },
        _ => OpenerError::ConfigUnreadable { path: path.to_path_buf(), reason: e.to_string() },
    })?;
    let config: LockConfig = serde_json::from_str(&json).map_err(|e| OpenerError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    config.validate()?;
    info!(
        path = %path.display(),
        length = config.length,
        strategy = %config.strategy(),
        "configuration loaded"
    );
    Ok(config)
}

/// Validate and write `config` as pretty JSON
pub fn save_config(path: &Path, config: &LockConfig) -> Result<()> {
    config.validate()?;
    let unreadable = |reason: String| OpenerError::ConfigUnreadable { path: path.to_path_buf(), reason };
    let json = serde_json::to_string_pretty(config).map_err(|e| unreadable(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| unreadable(e.to_string()))?;
    }
    fs::write(path, json).map_err(|e| unreadable(e.to_string()))?;
    info!(path = %path.display(), "configuration saved");
    Ok(())
}

/// Timing profile from a JSON file, or `fallback` when no file is given
pub fn load_timing(path: Option<&Path>, fallback: TimingProfile) -> Result<TimingProfile> {
    match path {
        None => Ok(fallback),
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| OpenerError::TimingInvalid(format!("{}: {}", path.display(), e)))?;
            TimingProfile::from_json(&json)
        }
    }
}

/// Codes directory: explicit override, else `codes/` next to the config
pub fn codes_dir(config_path: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(CODES_SUBDIR),
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Where the search begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPosition {
    /// All zeros, ascending
    FromStart,
    /// All nines, descending
    FromEnd,
    /// A known code, stepping the given way
    Continue { code: Code, direction: ContinueDirection },
}

/// Collects the operator's answers into a validated `LockConfig`
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    length: Option<CodeLength>,
    observed: Option<(Code, usize)>,
    start: Option<StartPosition>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, length: CodeLength) -> Self {
        self.length = Some(length);
        self
    }

    /// Code currently shown and the active slot
    pub fn observed(mut self, code: Code, slot: usize) -> Self {
        self.observed = Some((code, slot));
        self
    }

    pub fn start(mut self, start: StartPosition) -> Self {
        self.start = Some(start);
        self
    }

    pub fn build(self) -> Result<LockConfig> {
        let (current_code, slot) = self
            .observed
            .ok_or_else(|| OpenerError::ConfigInvalid("observed code and slot are required".to_string()))?;
        let length = match self.length {
            Some(length) => length,
            None => CodeLength::try_from(current_code.len())?,
        };
        let start = self
            .start
            .ok_or_else(|| OpenerError::ConfigInvalid("start position is required".to_string()))?;

        let (start_code, direction, continue_direction) = match start {
            StartPosition::FromStart => (Code::zeros(length), Direction::FromStart, ContinueDirection::default()),
            StartPosition::FromEnd => (Code::nines(length), Direction::FromEnd, ContinueDirection::default()),
            StartPosition::Continue { code, direction } => (code, Direction::Continue, direction),
        };

        let config = LockConfig {
            length: length.digits(),
            current_code,
            start_code,
            slot,
            direction,
            continue_direction,
        };
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
