//! Pointcut compilation errors.

use thiserror::Error;

/// A pointcut expression or pattern that cannot be compiled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PointcutError {
    #[error("empty pointcut expression")]
    Empty,

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unbalanced parenthesis opened at position {position}")]
    Unbalanced { position: usize },

    #[error("unknown pointcut designator '{0}'")]
    UnknownDesignator(String),

    #[error("unknown named pointcut '{0}'")]
    UnknownReference(String),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },
}

impl PointcutError {
    pub(crate) fn invalid(pattern: &str, reason: &'static str) -> Self {
        PointcutError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }
}
