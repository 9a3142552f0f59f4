//! Run Loop: feeds every combination to the engine and reports progress
//!
//! The run assumes the dial already sits in the post-full-circle state of
//! the first entry (last digit 0, slot 0). The operator aligns the dial and
//! holds the start key; from then on the loop is open-loop.

use std::collections::VecDeque;
use std::time::Instant;
use chrono::Utc;
use tracing::{info, warn};
use crate::core::engine::TransitionEngine;
use crate::core::input::InputDriver;
use crate::types::{Code, CodeLength, ProgressReport, Result, RunSummary, TimingProfile};
use crate::{ESTIMATED_SECS_PER_COMBINATION, ETA_MIN_SAMPLES, ETA_WINDOW, VK_START_SIGNAL};

// =============================================================================
// ETA
// =============================================================================

/// Rolling-average ETA with a fixed fallback while samples are few
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    samples: VecDeque<f64>,
    window: usize,
    min_samples: usize,
    fallback_secs: f64,
}

impl Default for EtaEstimator {
    fn default() -> Self {
        Self::new(ETA_WINDOW, ETA_MIN_SAMPLES, ESTIMATED_SECS_PER_COMBINATION)
    }
}

impl EtaEstimator {
    pub fn new(window: usize, min_samples: usize, fallback_secs: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(window),
            window: window.max(1),
            min_samples,
            fallback_secs,
        }
    }

    /// Add one iteration time; the oldest falls out past the window
    pub fn record(&mut self, secs: f64) {
        self.samples.push_back(secs);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Mean of the window, once enough samples exist
    pub fn average(&self) -> Option<f64> {
        if self.samples.len() < self.min_samples || self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Seconds left for `remaining` combinations
    pub fn estimate(&self, remaining: usize) -> f64 {
        self.average().unwrap_or(self.fallback_secs) * remaining as f64
    }
}

// =============================================================================
// START SIGNAL
// =============================================================================

/// Poll until `virtual_key` is held, then wait out the debounce.
///
/// Returns the number of polls. There is no timeout; the operator ends a
/// stuck wait by killing the process.
pub fn wait_for_start<D: InputDriver + ?Sized>(driver: &mut D, timing: &TimingProfile, virtual_key: u16) -> usize {
    let mut polls = 0;
    loop {
        polls += 1;
        if driver.is_key_down(virtual_key) {
            break;
        }
        driver.wait(timing.start_poll());
    }
    driver.wait(timing.start_debounce());
    polls
}

// =============================================================================
// RUN LOOP
// =============================================================================

/// Believed dial state at the start of a run
pub fn initial_code(combinations: &[Code], length: CodeLength) -> Code {
    combinations
        .first()
        .map(Code::with_last_zeroed)
        .unwrap_or_else(|| Code::zeros(length))
}

#[derive(Debug, Clone, Default)]
pub struct RunLoop {
    engine: TransitionEngine,
}

impl RunLoop {
    pub fn new(engine: TransitionEngine) -> Self {
        Self { engine }
    }

    /// Enter every combination in order, calling `on_progress` after each.
    ///
    /// Waits for the start key first, even when the list is empty. Between
    /// consecutive combinations the loop settles once more; not after the
    /// last one.
    pub fn run<D, F>(
        &self,
        driver: &mut D,
        length: CodeLength,
        combinations: &[Code],
        mut on_progress: F,
    ) -> Result<RunSummary>
    where
        D: InputDriver + ?Sized,
        F: FnMut(&ProgressReport),
    {
        for code in combinations {
            code.ensure_length(length)?;
        }
        if let Some(odd) = combinations.iter().find(|c| c.digit(c.last_index()) != 0) {
            warn!(code = %odd, "list contains codes not ending in 0; the last digit will be forced to 0");
        }

        let total = combinations.len();
        info!(total, "waiting for start signal");
        wait_for_start(driver, self.engine.timing(), VK_START_SIGNAL);

        let started_at = Utc::now();
        if total == 0 {
            warn!("nothing to enter: combination list is empty");
            return Ok(RunSummary {
                started_at,
                finished_at: Utc::now(),
                processed: 0,
                total_secs: 0.0,
                final_code: None,
            });
        }

        let mut current = initial_code(combinations, length);
        info!(assumed = %current, "run started");

        let run_start = Instant::now();
        let mut eta = EtaEstimator::default();

        for (i, target) in combinations.iter().enumerate() {
            let iteration_start = Instant::now();
            current = self.engine.execute(driver, &current, target)?;
            let elapsed = iteration_start.elapsed().as_secs_f64();

            // The first iteration is unrepresentative (dial was pre-aligned)
            if i > 0 {
                eta.record(elapsed);
            }
            let remaining = total - (i + 1);
            let report = ProgressReport::new(i + 1, total, target.clone(), eta.estimate(remaining), elapsed);
            on_progress(&report);

            if i + 1 < total {
                driver.wait(self.engine.timing().settle());
            }
        }

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            processed: total,
            total_secs: run_start.elapsed().as_secs_f64(),
            final_code: Some(current),
        };
        info!(processed = summary.processed, secs = summary.total_secs, "run finished");
        Ok(summary)
    }
}

// =============================================================================
// TESTS
// =============================================================================
