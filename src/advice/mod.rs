//! Advice (interceptor) subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy::invoke(method, call)
//!     → chain.rs (advices for this method, ascending order)
//!     → advice[0].around(jp, proceed)
//!         → proceed() → advice[1].around(jp, proceed)
//!             → proceed() → target call
//!         ← Returned / error, back out in reverse order
//! ```
//!
//! # Design Decisions
//! - `Proceed` is consumed by value: an advice can proceed at most once
//! - `Returned` can only be obtained from `proceed`, so an advice either
//!   proceeds or fails; it cannot fabricate a result
//! - Errors are the target's own type `E` and pass through unchanged
//! - Lowest order is outermost; ties keep registration order

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::pointcut::Pointcut;
use crate::proxy::target::JoinPoint;

pub mod chain;
pub mod hooks;
pub mod trace;
pub mod transaction;

pub use chain::AdviceChain;
pub use hooks::{after, after_returning, after_throwing, before, LogAdvice};
pub use trace::TraceAdvice;
pub use transaction::{LoggingTransactionManager, TransactionAdvice, TransactionManager};

/// Behavior woven around a target invocation.
pub trait Advice<E>: Send + Sync {
    /// Run around the rest of the chain. Call `proceed.proceed()` to continue
    /// and return its outcome (or an error of your own).
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E>;
}

/// Proof that the target completed successfully during this invocation.
#[must_use]
pub struct Returned<'a> {
    _invocation: PhantomData<fn(&'a ()) -> &'a ()>,
}

impl Returned<'_> {
    pub(crate) fn issue() -> Self {
        Self {
            _invocation: PhantomData,
        }
    }
}

impl fmt::Debug for Returned<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Returned")
    }
}

pub(crate) type TargetCall<'a, E> = Box<dyn FnOnce() -> Result<Returned<'a>, E> + 'a>;

/// The remainder of the chain, handed to each advice.
pub struct Proceed<'a, E> {
    join_point: JoinPoint<'a>,
    rest: &'a [Arc<dyn Advice<E>>],
    target: TargetCall<'a, E>,
}

impl<'a, E> Proceed<'a, E> {
    pub(crate) fn new(
        join_point: JoinPoint<'a>,
        rest: &'a [Arc<dyn Advice<E>>],
        target: TargetCall<'a, E>,
    ) -> Self {
        Self {
            join_point,
            rest,
            target,
        }
    }

    /// Invoke the next advice, or the target when this is the innermost one.
    pub fn proceed(self) -> Result<Returned<'a>, E> {
        match self.rest.split_first() {
            Some((next, rest)) => next.around(
                &self.join_point,
                Proceed {
                    join_point: self.join_point,
                    rest,
                    target: self.target,
                },
            ),
            None => (self.target)(),
        }
    }
}

impl<E> fmt::Debug for Proceed<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed")
            .field("join_point", &self.join_point)
            .field("remaining", &self.rest.len())
            .finish()
    }
}

/// An advice plus where and in which order it applies.
pub struct Advisor<E> {
    name: String,
    order: i32,
    pointcut: Pointcut,
    advice: Arc<dyn Advice<E>>,
}

impl<E> Advisor<E> {
    pub fn new<A>(name: impl Into<String>, order: i32, pointcut: Pointcut, advice: A) -> Self
    where
        A: Advice<E> + 'static,
    {
        Self::from_shared(name, order, pointcut, Arc::new(advice))
    }

    pub fn from_shared(
        name: impl Into<String>,
        order: i32,
        pointcut: Pointcut,
        advice: Arc<dyn Advice<E>>,
    ) -> Self {
        Self {
            name: name.into(),
            order,
            pointcut,
            advice,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    pub fn advice(&self) -> &Arc<dyn Advice<E>> {
        &self.advice
    }

    pub fn applies_to(&self, jp: &JoinPoint<'_>) -> bool {
        self.pointcut.matches(jp)
    }
}

impl<E> Clone for Advisor<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            order: self.order,
            pointcut: self.pointcut.clone(),
            advice: Arc::clone(&self.advice),
        }
    }
}

impl<E> fmt::Debug for Advisor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advisor")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("pointcut", &self.pointcut.to_string())
            .finish()
    }
}
