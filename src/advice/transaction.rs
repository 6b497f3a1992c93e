//! Transaction demarcation advice.

use std::sync::Arc;

use crate::advice::{Advice, Proceed, Returned};
use crate::proxy::target::JoinPoint;

/// Resource manager driven by [`TransactionAdvice`].
pub trait TransactionManager: Send + Sync {
    fn begin(&self, jp: &JoinPoint<'_>);
    fn commit(&self, jp: &JoinPoint<'_>);
    fn rollback(&self, jp: &JoinPoint<'_>);
    /// Always called last, whatever the outcome.
    fn release(&self, jp: &JoinPoint<'_>);
}

/// Manager that only logs each step.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransactionManager;

impl TransactionManager for LoggingTransactionManager {
    fn begin(&self, jp: &JoinPoint<'_>) {
        tracing::info!(join_point = %jp, "[tx begin]");
    }

    fn commit(&self, jp: &JoinPoint<'_>) {
        tracing::info!(join_point = %jp, "[tx commit]");
    }

    fn rollback(&self, jp: &JoinPoint<'_>) {
        tracing::info!(join_point = %jp, "[tx rollback]");
    }

    fn release(&self, jp: &JoinPoint<'_>) {
        tracing::info!(join_point = %jp, "[resource release]");
    }
}

/// Begins a transaction, commits on success and rolls back on error.
#[derive(Clone)]
pub struct TransactionAdvice {
    manager: Arc<dyn TransactionManager>,
}

impl TransactionAdvice {
    pub fn new(manager: impl TransactionManager + 'static) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    pub fn logging() -> Self {
        Self::new(LoggingTransactionManager)
    }
}

impl Default for TransactionAdvice {
    fn default() -> Self {
        Self::logging()
    }
}

impl std::fmt::Debug for TransactionAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionAdvice").finish_non_exhaustive()
    }
}

impl<E> Advice<E> for TransactionAdvice {
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        let _release = Release {
            manager: self.manager.as_ref(),
            jp,
        };
        self.manager.begin(jp);
        let outcome = proceed.proceed();
        match &outcome {
            Ok(_) => self.manager.commit(jp),
            Err(_) => self.manager.rollback(jp),
        }
        outcome
    }
}

/// Runs `release` when the advice returns or unwinds.
struct Release<'m, 'a> {
    manager: &'m dyn TransactionManager,
    jp: &'m JoinPoint<'a>,
}

impl Drop for Release<'_, '_> {
    fn drop(&mut self) {
        self.manager.release(self.jp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::advice::{AdviceChain, Advisor};
    use crate::pointcut::Pointcut;
    use crate::proxy::target::{MethodSignature, Registration};

    #[derive(Default)]
    struct Steps(Mutex<Vec<String>>);

    impl TransactionManager for Arc<Steps> {
        fn begin(&self, jp: &JoinPoint<'_>) {
            self.0.lock().unwrap().push(format!("begin {}", jp.short_signature()));
        }
        fn commit(&self, _jp: &JoinPoint<'_>) {
            self.0.lock().unwrap().push("commit".into());
        }
        fn rollback(&self, _jp: &JoinPoint<'_>) {
            self.0.lock().unwrap().push("rollback".into());
        }
        fn release(&self, _jp: &JoinPoint<'_>) {
            self.0.lock().unwrap().push("release".into());
        }
    }

    fn chain(steps: &Arc<Steps>) -> AdviceChain<String> {
        AdviceChain::new(vec![Advisor::new(
            "tx",
            0,
            Pointcut::parse("execution(* *..*Service.*(..))").unwrap(),
            TransactionAdvice::new(Arc::clone(steps)),
        )])
    }

    #[test]
    fn test_commit_then_release() {
        let steps = Arc::new(Steps::default());
        let reg = Registration::for_type("a.OrderService").method(MethodSignature::new("orderItem"));
        let result = chain(&steps).invoke(reg.join_point(&reg.methods()[0]), || Ok::<_, String>("saved"));

        assert_eq!(result, Ok("saved"));
        assert_eq!(
            *steps.0.lock().unwrap(),
            vec!["begin OrderService.orderItem()", "commit", "release"]
        );
    }

    #[test]
    fn test_rollback_then_release() {
        let steps = Arc::new(Steps::default());
        let reg = Registration::for_type("a.OrderService").method(MethodSignature::new("orderItem"));
        let result: Result<(), String> =
            chain(&steps).invoke(reg.join_point(&reg.methods()[0]), || Err("ex".into()));

        assert_eq!(result, Err("ex".to_string()));
        assert_eq!(
            *steps.0.lock().unwrap(),
            vec!["begin OrderService.orderItem()", "rollback", "release"]
        );
    }
}
