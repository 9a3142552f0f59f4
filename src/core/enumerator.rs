//! Combination Enumerator: ordered target lists, persisted as JSON
//!
//! Only the prefix (all digits but the last) is searched; the last digit is
//! always 0 because the full circle cannot land anywhere else. Consecutive
//! entries differ by exactly one in prefix value.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::types::{Code, CodeLength, OpenerError, Result, Strategy};

/// Prefixes `from..=to` ascending; empty (with a warning) if `from > to`
pub fn ascending_range(length: CodeLength, from: u32, to: u32) -> Vec<Code> {
    if from > to {
        warn!(from, to, "ascending range is empty: start is above the end");
        return Vec::new();
    }
    (from..=to).map(|prefix| Code::from_prefix(prefix, length)).collect()
}

/// Prefixes `from` down to `to` inclusive; empty (with a warning) if `from < to`
pub fn descending_range(length: CodeLength, from: u32, to: u32) -> Vec<Code> {
    if from < to {
        warn!(from, to, "descending range is empty: start is below the end");
        return Vec::new();
    }
    (to..=from).rev().map(|prefix| Code::from_prefix(prefix, length)).collect()
}

/// Full target list for a strategy.
///
/// `start` is only read by the resume strategies; its last digit is ignored.
pub fn generate(strategy: Strategy, length: CodeLength, start: &Code) -> Result<Vec<Code>> {
    let max = length.max_prefix();
    let combinations = match strategy {
        Strategy::Ascending => ascending_range(length, 0, max),
        Strategy::Descending => descending_range(length, max, 0),
        Strategy::ResumeAscending => {
            start.ensure_length(length)?;
            ascending_range(length, start.prefix_value(), max)
        }
        Strategy::ResumeDescending => {
            start.ensure_length(length)?;
            descending_range(length, start.prefix_value(), 0)
        }
    };
    info!(%strategy, %length, count = combinations.len(), "combinations generated");
    Ok(combinations)
}

/// Path of the list for `strategy` inside `dir`
pub fn list_path(dir: &Path, strategy: Strategy) -> PathBuf {
    dir.join(strategy.file_name())
}

/// Write the list as pretty JSON, replacing any previous file
pub fn save_combinations(dir: &Path, strategy: Strategy, combinations: &[Code]) -> Result<PathBuf> {
    let path = list_path(dir, strategy);
    let write_err = |reason: String| OpenerError::CombinationsWrite { path: path.clone(), reason };

    let json = serde_json::to_string_pretty(combinations).map_err(|e| write_err(e.to_string()))?;
    fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
    if path.exists() {
        // A failed delete is not fatal; the write below truncates anyway
        if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "could not remove previous list");
        }
    }
    fs::write(&path, json).map_err(|e| write_err(e.to_string()))?;

    info!(path = %path.display(), count = combinations.len(), "combinations saved");
    Ok(path)
}

/// Read the list for `strategy` back from `dir`
pub fn load_combinations(dir: &Path, strategy: Strategy) -> Result<Vec<Code>> {
    let path = list_path(dir, strategy);
    let json = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OpenerError::CombinationsMissing { path: path.clone() }
        } else {
            OpenerError::CombinationsUnreadable { path: path.clone(), reason: e.to_string() }
        }
    })?;
    let combinations: Vec<Code> = serde_json::from_str(&json)
        .map_err(|e| OpenerError::CombinationsUnreadable { path: path.clone(), reason: e.to_string() })?;

    info!(file = strategy.file_name(), count = combinations.len(), "combinations loaded");
    Ok(combinations)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(codes: &[Code]) -> Vec<String> {
        codes.iter().map(Code::to_string).collect()
    }

    #[test]
    fn test_three_digit_ascending_from_zero() {
        let list = generate(Strategy::Ascending, CodeLength::Three, &Code::zeros(CodeLength::Three)).unwrap();
        assert_eq!(list.len(), 100);
        assert_eq!(list[0].to_string(), "000");
        assert_eq!(list[1].to_string(), "010");
        assert_eq!(list[99].to_string(), "990");
    }

    #[test]
    fn test_four_digit_descending_from_nines() {
        let list = generate(Strategy::Descending, CodeLength::Four, &Code::nines(CodeLength::Four)).unwrap();
        assert_eq!(list.len(), 1000);
        assert_eq!(list[0].to_string(), "9990");
        assert_eq!(list[1].to_string(), "9980");
        assert_eq!(list[999].to_string(), "0000");
    }

    #[test]
    fn test_resume_descending_from_05() {
        let start: Code = "050".parse().unwrap();
        let list = generate(Strategy::ResumeDescending, CodeLength::Three, &start).unwrap();
        assert_eq!(strings(&list), vec!["050", "040", "030", "020", "010", "000"]);
    }

    #[test]
    fn test_resume_ascending_ignores_last_digit() {
        let start: Code = "1237".parse().unwrap();
        let list = generate(Strategy::ResumeAscending, CodeLength::Four, &start).unwrap();
        assert_eq!(list.len(), 999 - 123 + 1);
        assert_eq!(list[0].to_string(), "1230");
        assert_eq!(list.last().unwrap().to_string(), "9990");
    }

    #[test]
    fn test_resume_at_boundary_yields_single_entry() {
        let start: Code = "999".parse().unwrap();
        let list = generate(Strategy::ResumeAscending, CodeLength::Three, &start).unwrap();
        assert_eq!(strings(&list), vec!["990"]);
    }

    #[test]
    fn test_inverted_ranges_are_empty() {
        assert!(ascending_range(CodeLength::Three, 50, 49).is_empty());
        assert!(descending_range(CodeLength::Three, 3, 4).is_empty());
    }

    #[test]
    fn test_resume_rejects_wrong_length_start() {
        let start: Code = "0500".parse().unwrap();
        assert!(generate(Strategy::ResumeAscending, CodeLength::Three, &start).is_err());
    }

    #[test]
    fn test_monotonic_unit_step_no_duplicates() {
        for strategy in [Strategy::Ascending, Strategy::Descending] {
            let list = generate(strategy, CodeLength::Four, &Code::zeros(CodeLength::Four)).unwrap();
            for pair in list.windows(2) {
                let (a, b) = (pair[0].prefix_value() as i64, pair[1].prefix_value() as i64);
                let step = if strategy.is_descending() { -1 } else { 1 };
                assert_eq!(b - a, step);
            }
            assert!(list.iter().all(|c| c.digit(3) == 0));
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let codes_dir = dir.path().join("codes");
        let list = generate(Strategy::ResumeDescending, CodeLength::Three, &"020".parse().unwrap()).unwrap();

        let path = save_combinations(&codes_dir, Strategy::ResumeDescending, &list).unwrap();
        assert!(path.ends_with("combinations_continue_reverse.json"));
        // Second save replaces the first
        save_combinations(&codes_dir, Strategy::ResumeDescending, &list).unwrap();

        let loaded = load_combinations(&codes_dir, Strategy::ResumeDescending).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_combinations(dir.path(), Strategy::Ascending).unwrap_err();
        assert!(matches!(err, OpenerError::CombinationsMissing { .. }));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(Strategy::Ascending.file_name()), "{not json").unwrap();
        let err = load_combinations(dir.path(), Strategy::Ascending).unwrap_err();
        assert!(matches!(err, OpenerError::CombinationsUnreadable { .. }));
    }
}
