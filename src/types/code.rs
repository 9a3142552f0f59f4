//! Codes, lock lengths and the forward-only digit arithmetic

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::types::{OpenerError, Result};

/// Digits on one wheel (0-9)
pub const DIGIT_BASE: u8 = 10;

/// Number of forward steps that take `from` to `to`.
///
/// The wheel only turns forward, so decreasing a digit wraps through 0:
/// 9 → 0 is one step, 0 → 9 is nine. Always in 0..=9.
pub fn forward_rotations(from: u8, to: u8) -> u8 {
    (to % DIGIT_BASE + DIGIT_BASE - from % DIGIT_BASE) % DIGIT_BASE
}

/// Where the wheel lands after `rotations` forward steps from `digit`
pub fn rotate_forward(digit: u8, rotations: u8) -> u8 {
    (digit % DIGIT_BASE + rotations % DIGIT_BASE) % DIGIT_BASE
}

// =============================================================================
// LOCK LENGTH
// =============================================================================

/// Supported lock variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum CodeLength {
    Three,
    Four,
}

impl CodeLength {
    /// Number of digit positions
    pub fn digits(self) -> usize {
        match self {
            CodeLength::Three => 3,
            CodeLength::Four => 4,
        }
    }

    /// Number of digits that the enumerator steps (all but the last)
    pub fn prefix_digits(self) -> usize {
        self.digits() - 1
    }

    /// Largest prefix value (99 for 3-digit, 999 for 4-digit)
    pub fn max_prefix(self) -> u32 {
        10u32.pow(self.prefix_digits() as u32) - 1
    }
}

impl TryFrom<usize> for CodeLength {
    type Error = OpenerError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            3 => Ok(CodeLength::Three),
            4 => Ok(CodeLength::Four),
            other => Err(OpenerError::UnsupportedLength(other)),
        }
    }
}

impl From<CodeLength> for usize {
    fn from(length: CodeLength) -> usize {
        length.digits()
    }
}

impl fmt::Display for CodeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-digit", self.digits())
    }
}

// =============================================================================
// CODE
// =============================================================================

/// An ordered digit sequence, either a target or the believed dial state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CodeRepr", into = "Vec<u8>")]
pub struct Code(Vec<u8>);

/// Accepted on-disk forms: `[0, 5, 2]` or `"052"`
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Digits(Vec<u32>),
    Text(String),
}

impl TryFrom<CodeRepr> for Code {
    type Error = OpenerError;

    fn try_from(repr: CodeRepr) -> Result<Self> {
        match repr {
            CodeRepr::Digits(digits) => {
                let digits = digits
                    .into_iter()
                    .map(|d| u8::try_from(d).ok().filter(|d| *d < DIGIT_BASE).ok_or(OpenerError::InvalidDigit(d)))
                    .collect::<Result<Vec<u8>>>()?;
                Code::new(digits)
            }
            CodeRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Code> for Vec<u8> {
    fn from(code: Code) -> Vec<u8> {
        code.0
    }
}

impl Code {
    /// Create from digits, rejecting empty codes and digits above 9
    pub fn new(digits: Vec<u8>) -> Result<Self> {
        if digits.is_empty() {
            return Err(OpenerError::InvalidCode("empty code".to_string()));
        }
        if let Some(bad) = digits.iter().find(|d| **d >= DIGIT_BASE) {
            return Err(OpenerError::InvalidDigit(u32::from(*bad)));
        }
        Ok(Self(digits))
    }

    /// All-zero code of the given length
    pub fn zeros(length: CodeLength) -> Self {
        Self(vec![0; length.digits()])
    }

    /// All-nine code of the given length
    pub fn nines(length: CodeLength) -> Self {
        Self(vec![9; length.digits()])
    }

    /// Build `prefix` (big-endian decimal) followed by a trailing 0.
    ///
    /// `from_prefix(5, Three)` is `050`; `from_prefix(123, Four)` is `1230`.
    pub fn from_prefix(prefix: u32, length: CodeLength) -> Self {
        let width = length.prefix_digits();
        let mut digits = Vec::with_capacity(length.digits());
        for place in (0..width).rev() {
            digits.push(((prefix / 10u32.pow(place as u32)) % 10) as u8);
        }
        digits.push(0);
        Self(digits)
    }

    /// Decimal value of every digit but the last
    pub fn prefix_value(&self) -> u32 {
        self.0[..self.0.len() - 1]
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(*d))
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed code; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the last position
    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    /// Digit at `slot`
    pub fn digit(&self, slot: usize) -> u8 {
        self.0[slot]
    }

    /// Overwrite the digit at `slot`
    pub fn set_digit(&mut self, slot: usize, digit: u8) {
        self.0[slot] = digit % DIGIT_BASE;
    }

    /// All digits
    pub fn digits(&self) -> &[u8] {
        &self.0
    }

    /// Copy with the last digit forced to 0 (post full-circle state)
    pub fn with_last_zeroed(&self) -> Self {
        let mut code = self.clone();
        let last = code.last_index();
        code.0[last] = 0;
        code
    }

    /// Check this code fits a lock of `length`
    pub fn ensure_length(&self, length: CodeLength) -> Result<()> {
        if self.len() != length.digits() {
            return Err(OpenerError::InvalidCode(format!(
                "{} has {} digits, lock is {}",
                self,
                self.len(),
                length
            )));
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = OpenerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or_else(|| OpenerError::InvalidCode(format!("'{}' is not a digit string", s)))
            })
            .collect::<Result<Vec<u8>>>()?;
        Code::new(digits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wraparound_rotations() {
        assert_eq!(forward_rotations(9, 0), 1);
        assert_eq!(forward_rotations(0, 9), 9);
        assert_eq!(forward_rotations(4, 4), 0);
        assert_eq!(forward_rotations(1, 3), 2);
    }

    #[test]
    fn test_from_prefix() {
        assert_eq!(Code::from_prefix(5, CodeLength::Three).to_string(), "050");
        assert_eq!(Code::from_prefix(99, CodeLength::Three).to_string(), "990");
        assert_eq!(Code::from_prefix(123, CodeLength::Four).to_string(), "1230");
        assert_eq!(Code::from_prefix(7, CodeLength::Four).to_string(), "0070");
    }

    #[test]
    fn test_prefix_value_ignores_last_digit() {
        let code: Code = "127".parse().unwrap();
        assert_eq!(code.prefix_value(), 12);
        assert_eq!(code.with_last_zeroed().to_string(), "120");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("12a".parse::<Code>().is_err());
        assert!("".parse::<Code>().is_err());
    }

    #[test]
    fn test_deserialize_array_and_string() {
        let from_array: Code = serde_json::from_str("[0, 5, 2]").unwrap();
        let from_text: Code = serde_json::from_str("\"052\"").unwrap();
        assert_eq!(from_array, from_text);
        assert_eq!(serde_json::to_string(&from_array).unwrap(), "[0,5,2]");
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_digit() {
        assert!(serde_json::from_str::<Code>("[0, 10, 2]").is_err());
    }

    #[test]
    fn test_length_conversion() {
        assert_eq!(CodeLength::try_from(3).unwrap(), CodeLength::Three);
        assert_eq!(CodeLength::Four.max_prefix(), 999);
        assert!(matches!(CodeLength::try_from(5), Err(OpenerError::UnsupportedLength(5))));
    }

    proptest! {
        #[test]
        fn prop_rotation_lands_on_target(from in 0u8..10, to in 0u8..10) {
            let n = forward_rotations(from, to);
            prop_assert!(n <= 9);
            prop_assert_eq!(rotate_forward(from, n), to);
        }

        #[test]
        fn prop_prefix_round_trip(prefix in 0u32..1000) {
            let code = Code::from_prefix(prefix, CodeLength::Four);
            prop_assert_eq!(code.prefix_value(), prefix);
            prop_assert_eq!(code.digit(3), 0);
        }
    }
}
