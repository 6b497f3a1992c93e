//! Configuration schema definitions.
//!
//! This module defines the weaving configuration: how logging is set up and
//! which advice applies where. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WeaveConfig {
    /// Diagnostic logging settings.
    pub logging: LoggingConfig,

    /// Call-tree tracing settings.
    pub trace: TraceConfig,

    /// Named pointcuts, compiled in declaration order.
    pub pointcuts: Vec<PointcutConfig>,

    /// Advisors applied by every proxy built from this config.
    pub advisors: Vec<AdvisorConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "logtrace=info".to_string(),
            json: false,
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// When false, `trace` advisors are dropped at wiring time.
    pub enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A named pointcut that advisors and later pointcuts may reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PointcutConfig {
    /// Reference name, used as `name()` in expressions.
    pub name: String,

    /// Pointcut expression, e.g. `execution(* hello.aop.order..*(..))`.
    pub expression: String,
}

/// One advisor: an advice kind applied where a pointcut matches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvisorConfig {
    /// Unique advisor identifier for logging.
    pub name: String,

    /// Pointcut expression; may reference named pointcuts.
    pub pointcut: String,

    /// Lower runs outermost (default: 0).
    #[serde(default)]
    pub order: i32,

    /// Which advice to apply.
    pub advice: AdviceKind,
}

/// Built-in advice kinds available from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceKind {
    Trace,
    Transaction,
    Log,
}
