//! Lock configuration record and traversal strategies

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::types::{Code, CodeLength, OpenerError, Result};

/// Where the search starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From all zeros, ascending
    #[serde(alias = "С начала")]
    FromStart,
    /// From all nines, descending
    #[serde(alias = "С конца")]
    FromEnd,
    /// From a user-supplied code, see `ContinueDirection`
    #[serde(alias = "Продолжить")]
    Continue,
}

/// Which way a resumed search steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinueDirection {
    #[default]
    Increase,
    Decrease,
}

/// The four traversal strategies of the enumerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Ascending,
    Descending,
    ResumeAscending,
    ResumeDescending,
}

impl Strategy {
    /// Combine the two config labels
    pub fn from_direction(direction: Direction, continue_direction: ContinueDirection) -> Self {
        match (direction, continue_direction) {
            (Direction::FromStart, _) => Strategy::Ascending,
            (Direction::FromEnd, _) => Strategy::Descending,
            (Direction::Continue, ContinueDirection::Increase) => Strategy::ResumeAscending,
            (Direction::Continue, ContinueDirection::Decrease) => Strategy::ResumeDescending,
        }
    }

    /// Persisted list name under the codes directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Strategy::Ascending => "combinations_forward.json",
            Strategy::Descending => "combinations_reverse.json",
            Strategy::ResumeAscending => "combinations_continue_forward.json",
            Strategy::ResumeDescending => "combinations_continue_reverse.json",
        }
    }

    /// Whether the enumerator steps the prefix downward
    pub fn is_descending(&self) -> bool {
        matches!(self, Strategy::Descending | Strategy::ResumeDescending)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Ascending => "ASCENDING",
            Strategy::Descending => "DESCENDING",
            Strategy::ResumeAscending => "RESUME_ASCENDING",
            Strategy::ResumeDescending => "RESUME_DESCENDING",
        };
        write!(f, "{}", name)
    }
}

/// Persisted configuration, as written by `configure` and read by every stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// 3 or 4; kept raw so an unsupported value gets its own error
    pub length: usize,
    /// Digits the operator observed on the dial
    pub current_code: Code,
    /// Code the resetter drives to; resume point for `continue`
    pub start_code: Code,
    /// Active slot the operator observed
    pub slot: usize,
    /// Search start
    pub direction: Direction,
    /// Only meaningful with `direction = continue`
    #[serde(default)]
    pub continue_direction: ContinueDirection,
}

impl LockConfig {
    /// Validated lock length
    pub fn code_length(&self) -> Result<CodeLength> {
        CodeLength::try_from(self.length)
    }

    /// Strategy selected by the two direction labels
    pub fn strategy(&self) -> Strategy {
        Strategy::from_direction(self.direction, self.continue_direction)
    }

    /// Check lengths and slot against the lock variant
    pub fn validate(&self) -> Result<CodeLength> {
        let length = self.code_length()?;
        self.current_code
            .ensure_length(length)
            .map_err(|e| OpenerError::ConfigInvalid(format!("current_code: {}", e)))?;
        self.start_code
            .ensure_length(length)
            .map_err(|e| OpenerError::ConfigInvalid(format!("start_code: {}", e)))?;
        if self.slot >= length.digits() {
            return Err(OpenerError::ConfigInvalid(format!(
                "slot {} out of range for a {} lock",
                self.slot, length
            )));
        }
        Ok(length)
    }
}

// =============================================================================
// TESTS
// =============================================================================
