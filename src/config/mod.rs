//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WeaveConfig (validated, immutable)
//!     → wiring::AdvisorPlan (pointcuts compiled once)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; proxies built from it never change
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks; pointcut
//!   syntax is checked when the plan is compiled

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AdviceKind, AdvisorConfig, LoggingConfig, PointcutConfig, TraceConfig, WeaveConfig};
pub use validation::ValidationError;
