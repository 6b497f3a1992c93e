//! Pointcut matching subsystem.
//!
//! # Data Flow
//! ```text
//! Expression string (config or code)
//!     → parser.rs (tokenize, precedence: ! > && > ||)
//!     → pattern.rs / glob.rs (compile execution, within, bean patterns)
//!     → expr.rs (immutable Pointcut tree)
//!
//! At proxy construction:
//!     Pointcut::matches(JoinPoint) for every registered method
//!     → advisors that match are frozen into that method's chain
//! ```
//!
//! # Design Decisions
//! - Compiled once, evaluated at proxy construction, never per call
//! - Malformed patterns fail at parse time, never at call time
//! - Only `*` wildcards; no regex
//! - Named pointcuts resolve eagerly, so a compiled tree has no dangling references

pub mod error;
pub mod expr;
pub mod glob;
mod parser;
pub mod pattern;

pub use error::PointcutError;
pub use expr::{NamedPointcuts, Pointcut};
pub use glob::Glob;
