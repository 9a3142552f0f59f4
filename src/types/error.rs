//! Error taxonomy
//!
//! Every failure is fatal-but-graceful: the CLI reports it and waits for
//! the operator. Nothing here is retried. There is deliberately no variant
//! for a key action that did not land; the dial is driven open-loop.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, OpenerError>;

/// All errors surfaced by loading, generating and driving
#[derive(Debug, Error)]
pub enum OpenerError {
    /// Configuration file does not exist
    #[error("configuration not found: {}", .path.display())]
    ConfigMissing { path: PathBuf },

    /// Configuration file exists but could not be read or parsed
    #[error("configuration unreadable ({}): {reason}", .path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    /// Configuration parsed but is inconsistent
    #[error("configuration invalid: {0}")]
    ConfigInvalid(String),

    /// Only 3- and 4-digit locks exist
    #[error("unsupported code length {0} (expected 3 or 4)")]
    UnsupportedLength(usize),

    /// Combination list for the selected strategy does not exist
    #[error("combination list not found: {}", .path.display())]
    CombinationsMissing { path: PathBuf },

    /// Combination list exists but could not be read or parsed
    #[error("combination list unreadable ({}): {reason}", .path.display())]
    CombinationsUnreadable { path: PathBuf, reason: String },

    /// Combination list could not be written
    #[error("combination list not saved ({}): {reason}", .path.display())]
    CombinationsWrite { path: PathBuf, reason: String },

    /// A digit outside 0-9
    #[error("invalid digit {0} (expected 0-9)")]
    InvalidDigit(u32),

    /// A code string or array that is not a code
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// Timing profile violates its invariants
    #[error("timing profile invalid: {0}")]
    TimingInvalid(String),

    /// No way to synthesize key events on this platform
    #[error("keyboard input unavailable: {0}")]
    InputUnavailable(String),
}

impl OpenerError {
    /// Stable code string (for logs and JSON output)
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigMissing { .. } => "E101_CONFIG_MISSING",
            Self::ConfigUnreadable { .. } => "E102_CONFIG_UNREADABLE",
            Self::ConfigInvalid(_) => "E103_CONFIG_INVALID",
            Self::UnsupportedLength(_) => "E104_UNSUPPORTED_LENGTH",
            Self::CombinationsMissing { .. } => "E201_COMBINATIONS_MISSING",
            Self::CombinationsUnreadable { .. } => "E202_COMBINATIONS_UNREADABLE",
            Self::CombinationsWrite { .. } => "E203_COMBINATIONS_WRITE",
            Self::InvalidDigit(_) => "E301_INVALID_DIGIT",
            Self::InvalidCode(_) => "E302_INVALID_CODE",
            Self::TimingInvalid(_) => "E401_TIMING_INVALID",
            Self::InputUnavailable(_) => "E501_INPUT_UNAVAILABLE",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            OpenerError::ConfigMissing { path: "a".into() },
            OpenerError::ConfigUnreadable { path: "a".into(), reason: String::new() },
            OpenerError::ConfigInvalid(String::new()),
            OpenerError::UnsupportedLength(5),
            OpenerError::CombinationsMissing { path: "a".into() },
            OpenerError::CombinationsUnreadable { path: "a".into(), reason: String::new() },
            OpenerError::CombinationsWrite { path: "a".into(), reason: String::new() },
            OpenerError::InvalidDigit(10),
            OpenerError::InvalidCode(String::new()),
            OpenerError::TimingInvalid(String::new()),
            OpenerError::InputUnavailable(String::new()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_mentions_path() {
        let err = OpenerError::ConfigMissing { path: "lock/config.json".into() };
        assert!(err.to_string().contains("lock/config.json"));
    }
}
