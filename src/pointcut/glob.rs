//! Simple `*` glob matching for names.
//!
//! # Design Decisions
//! - Only `*` is special; it matches any run of characters, including none
//! - Matching is case-sensitive and anchored at both ends
//! - No regex: literal pieces are matched left to right in O(n·m)

use std::fmt;

use crate::pointcut::error::PointcutError;

const RESERVED: &[char] = &['(', ')', '!', '&', '|', ',', '@'];

/// A compiled glob such as `save`, `find*`, `*Service` or `*Ser*ice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glob {
    pattern: String,
    pieces: Vec<String>,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self, PointcutError> {
        if pattern.is_empty() {
            return Err(PointcutError::invalid(pattern, "empty name pattern"));
        }
        if pattern.chars().any(|c| c.is_whitespace() || RESERVED.contains(&c)) {
            return Err(PointcutError::invalid(pattern, "name patterns may only contain literals and '*'"));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            pieces: pattern.split('*').map(str::to_string).collect(),
        })
    }

    /// Matches everything.
    pub fn any() -> Self {
        Self {
            pattern: "*".to_string(),
            pieces: vec![String::new(), String::new()],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_any(&self) -> bool {
        self.pieces.iter().all(String::is_empty) && self.pieces.len() > 1
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let (first, rest) = match self.pieces.split_first() {
            Some(split) => split,
            None => return candidate.is_empty(),
        };
        let Some((last, middle)) = rest.split_last() else {
            return candidate == first;
        };

        let Some(mut remaining) = candidate.strip_prefix(first.as_str()) else {
            return false;
        };
        if remaining.len() < last.len() || !remaining.ends_with(last.as_str()) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last.len()];

        for piece in middle.iter().filter(|p| !p.is_empty()) {
            match remaining.find(piece.as_str()) {
                Some(idx) => remaining = &remaining[idx + piece.len()..],
                None => return false,
            }
        }
        true
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// True when any of `patterns` matches `candidate`.
pub fn simple_match(patterns: &[Glob], candidate: &str) -> bool {
    patterns.iter().any(|p| p.matches(candidate))
}
