//! Wiring: configuration to advisors.
//!
//! # Data Flow
//! ```text
//! WeaveConfig
//!     → AdvisorPlan::compile (named pointcuts, then advisor pointcuts)
//!     → plan.advisors::<E>(tracer) / plan.proxy_factory::<E>(tracer)
//!     → ProxyFactory::proxy(target, registration)
//! ```
//!
//! # Design Decisions
//! - Compilation happens once; a bad expression fails here, never at call time
//! - The plan is error-type agnostic so one config serves every target type

pub mod plan;

pub use plan::{AdvisorPlan, AdvisorSummary, PlanSummary, PlannedAdvisor, PointcutSummary};
