//! Ordered advice chain for one join point.

use std::fmt;
use std::sync::Arc;

use crate::advice::{Advice, Advisor, Proceed, Returned, TargetCall};
use crate::observability::metrics;
use crate::proxy::target::JoinPoint;

/// The advisors that apply to one method, outermost first.
pub struct AdviceChain<E> {
    advisors: Vec<Advisor<E>>,
    advices: Vec<Arc<dyn Advice<E>>>,
}

impl<E> AdviceChain<E> {
    /// Build a chain sorted by ascending order. The sort is stable, so advisors
    /// sharing an order keep the order they were given in.
    pub fn new(mut advisors: Vec<Advisor<E>>) -> Self {
        advisors.sort_by_key(Advisor::order);
        let advices = advisors.iter().map(|a| Arc::clone(a.advice())).collect();
        Self { advisors, advices }
    }

    pub fn empty() -> Self {
        Self {
            advisors: Vec::new(),
            advices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.advices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.advices.len()
    }

    pub fn advisors(&self) -> &[Advisor<E>] {
        &self.advisors
    }

    /// Advisor names, outermost first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.advisors.iter().map(Advisor::name)
    }

    /// Run `call` through every advice in the chain and hand its value back.
    /// An empty chain calls the target directly.
    pub fn invoke<R>(&self, jp: JoinPoint<'_>, call: impl FnOnce() -> Result<R, E>) -> Result<R, E> {
        if self.advices.is_empty() {
            return call();
        }
        metrics::record_advised_invocation(self.len());

        let mut slot = None;
        {
            let slot_ref = &mut slot;
            let target: TargetCall<'_, E> = Box::new(move || match call() {
                Ok(value) => {
                    *slot_ref = Some(value);
                    Ok(Returned::issue())
                }
                Err(err) => Err(err),
            });
            Proceed::new(jp, &self.advices, target).proceed()?;
        }

        match slot {
            Some(value) => Ok(value),
            // `Returned` is only issued after the slot is filled.
            None => unreachable!("advice chain completed without reaching the target"),
        }
    }
}

impl<E> Clone for AdviceChain<E> {
    fn clone(&self) -> Self {
        Self {
            advisors: self.advisors.clone(),
            advices: self.advices.clone(),
        }
    }
}

impl<E> Default for AdviceChain<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> fmt::Debug for AdviceChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
