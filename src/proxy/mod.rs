//! Proxy subsystem: registration metadata and advised dispatch.
//!
//! # Data Flow
//! ```text
//! ProxyFactory::proxy(target, registration)
//!     → for each registered method: evaluate every advisor's pointcut
//!     → freeze one AdviceChain per method
//!
//! Proxy::invoke("orderItem", |t| t.order_item(id))
//!     → unregistered method? call target directly
//!     → chain.invoke(join point, call) → advices → target
//! ```
//!
//! # Design Decisions
//! - Advice selection happens once at construction; dispatch only looks up
//!   the frozen chain
//! - The target's return value and error type flow through untouched
//! - Concrete-type and trait-object targets share the same dispatch path,
//!   so both views produce identical traces

pub mod factory;
pub mod target;

pub use factory::{Proxy, ProxyFactory};
pub use target::{JoinPoint, MethodSignature, Registration, TargetType};
