//! Progress output for the run loop

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use crate::types::Code;

/// Render seconds as `42s`, `3m 5s` or `1h 2m 3s`; negatives clamp to `0s`
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "0s".to_string();
    }
    let total = seconds as u64;
    if total < 60 {
        format!("{}s", total)
    } else if total < 3600 {
        format!("{}m {}s", total / 60, total % 60)
    } else {
        format!("{}h {}m {}s", total / 3600, (total % 3600) / 60, total % 60)
    }
}

/// One line of progress, emitted after every combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// 1-based position in the list
    pub index: usize,
    /// List length
    pub total: usize,
    /// index / total * 100
    pub percent: f64,
    /// Code just entered
    pub code: Code,
    /// Estimated seconds remaining
    pub eta_secs: f64,
    /// Wall time this combination took
    pub elapsed_secs: f64,
}

impl ProgressReport {
    pub fn new(index: usize, total: usize, code: Code, eta_secs: f64, elapsed_secs: f64) -> Self {
        let percent = if total == 0 { 100.0 } else { index as f64 / total as f64 * 100.0 };
        Self {
            timestamp: Utc::now(),
            index,
            total,
            percent,
            code,
            eta_secs,
            elapsed_secs,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{} {} Code: {} | ETA: {}",
            format!("[{}/{}]", self.index, self.total).bold(),
            format!("({:.1}%)", self.percent).cyan(),
            self.code.to_string().yellow().bold(),
            format_duration(self.eta_secs).green()
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "[{}/{}] ({:.1}%) code={} | eta={}",
            self.index,
            self.total,
            self.percent,
            self.code,
            format_duration(self.eta_secs)
        )
    }
}

/// End-of-run totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Combinations entered
    pub processed: usize,
    /// Wall time of the whole run
    pub total_secs: f64,
    /// Believed code when the run ended
    pub final_code: Option<Code>,
}

impl RunSummary {
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{} Finished in {} - {} combinations entered",
            "✓".green().bold(),
            format_duration(self.total_secs).bold(),
            self.processed
        )
    }

    pub fn to_parseable_string(&self) -> String {
        format!(
            "done in {} | processed={}",
            format_duration(self.total_secs),
            self.processed
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
