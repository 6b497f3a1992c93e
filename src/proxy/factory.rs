//! Proxy construction and dispatch.

use std::collections::HashMap;
use std::fmt;

use crate::advice::{AdviceChain, Advisor};
use crate::proxy::target::Registration;

/// Builds proxies around targets from a fixed list of advisors.
pub struct ProxyFactory<E> {
    advisors: Vec<Advisor<E>>,
}

impl<E> ProxyFactory<E> {
    pub fn new() -> Self {
        Self { advisors: Vec::new() }
    }

    pub fn with_advisors(advisors: Vec<Advisor<E>>) -> Self {
        Self { advisors }
    }

    /// Register an advisor. Registration order breaks ties between equal orders.
    pub fn advisor(mut self, advisor: Advisor<E>) -> Self {
        self.advisors.push(advisor);
        self
    }

    pub fn advisors(&self) -> &[Advisor<E>] {
        &self.advisors
    }

    /// Wrap `target`. Pointcuts are evaluated once per registered method here;
    /// the resulting chains never change afterwards.
    pub fn proxy<T>(&self, target: T, registration: Registration) -> Proxy<T, E> {
        let chains: Vec<AdviceChain<E>> = registration
            .methods()
            .iter()
            .map(|method| {
                let jp = registration.join_point(method);
                AdviceChain::new(
                    self.advisors
                        .iter()
                        .filter(|advisor| advisor.applies_to(&jp))
                        .cloned()
                        .collect(),
                )
            })
            .collect();

        let index = registration
            .methods()
            .iter()
            .enumerate()
            .map(|(i, method)| (method.name().to_string(), i))
            .collect();

        for (method, chain) in registration.methods().iter().zip(&chains) {
            tracing::debug!(
                bean = registration.bean_name(),
                method = method.name(),
                advisors = ?chain,
                "Advice chain resolved"
            );
        }
        tracing::debug!(
            bean = registration.bean_name(),
            target_type = %registration.target_type(),
            advised_methods = chains.iter().filter(|c| !c.is_empty()).count(),
            "Proxy created"
        );

        Proxy {
            target,
            registration,
            chains,
            index,
        }
    }
}

impl<E> Default for ProxyFactory<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ProxyFactory<E> {
    fn clone(&self) -> Self {
        Self {
            advisors: self.advisors.clone(),
        }
    }
}

impl<E> fmt::Debug for ProxyFactory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFactory").field("advisors", &self.advisors).finish()
    }
}

/// A target wrapped with per-method advice chains.
///
/// `T` is whatever view the caller holds: a concrete type, or an
/// `Arc<dyn Trait>` for the interface view. Dispatch is identical for both.
pub struct Proxy<T, E> {
    target: T,
    registration: Registration,
    chains: Vec<AdviceChain<E>>,
    index: HashMap<String, usize>,
}

impl<T, E> Proxy<T, E> {
    /// Call `method` on the target through its advice chain. Methods missing
    /// from the registration go straight to the target.
    pub fn invoke<R>(&self, method: &str, call: impl FnOnce(&T) -> Result<R, E>) -> Result<R, E> {
        let Some(&idx) = self.index.get(method) else {
            tracing::trace!(bean = self.registration.bean_name(), method, "Unregistered method, calling target");
            return call(&self.target);
        };
        let jp = self.registration.join_point(&self.registration.methods()[idx]);
        let target = &self.target;
        self.chains[idx].invoke(jp, move || call(target))
    }

    /// The unadvised target.
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    /// True when at least one method has advice.
    pub fn is_advised(&self) -> bool {
        self.chains.iter().any(|c| !c.is_empty())
    }

    pub fn is_method_advised(&self, method: &str) -> bool {
        self.chain(method).is_some_and(|c| !c.is_empty())
    }

    /// Advisor names for `method`, outermost first.
    pub fn advisor_names(&self, method: &str) -> Vec<&str> {
        self.chain(method).map(|c| c.names().collect()).unwrap_or_default()
    }

    fn chain(&self, method: &str) -> Option<&AdviceChain<E>> {
        self.index.get(method).map(|&idx| &self.chains[idx])
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Proxy<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("bean", &self.registration.bean_name())
            .field("target", &self.target)
            .field("chains", &self.chains)
            .finish()
    }
}
