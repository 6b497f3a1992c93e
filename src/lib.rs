//! Execution tracing and transparent interception.
//!
//! Calls on registered targets are routed through a [`proxy::Proxy`], which
//! runs the advice selected for each method by pointcut expressions. The
//! built-in trace advice records the call tree per thread (or per task) as
//! indented begin/end/exception lines.

pub mod advice;
pub mod config;
pub mod observability;
pub mod pointcut;
pub mod proxy;
pub mod trace;
pub mod wiring;

pub use advice::{Advice, AdviceChain, Advisor, Proceed, Returned};
pub use config::WeaveConfig;
pub use pointcut::{Pointcut, PointcutError};
pub use proxy::{JoinPoint, MethodSignature, Proxy, ProxyFactory, Registration};
pub use trace::{ErrorInfo, TraceContext, Tracer};
pub use wiring::AdvisorPlan;
