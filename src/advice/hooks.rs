//! Single-point advice: run a closure before, after or on failure of a call.
//!
//! These never decide whether the target runs. Anything that needs to wrap
//! the call implements [`Advice`] directly.

use crate::advice::{Advice, Proceed, Returned};
use crate::proxy::target::JoinPoint;

pub struct Before<F>(F);
pub struct AfterReturning<F>(F);
pub struct AfterThrowing<F>(F);
pub struct After<F>(F);

/// Runs `f` before the call proceeds.
pub fn before<F>(f: F) -> Before<F>
where
    F: Fn(&JoinPoint<'_>) + Send + Sync,
{
    Before(f)
}

/// Runs `f` after the call completed successfully.
pub fn after_returning<F>(f: F) -> AfterReturning<F>
where
    F: Fn(&JoinPoint<'_>) + Send + Sync,
{
    AfterReturning(f)
}

/// Runs `f` with the error when the call failed; the error still propagates.
pub fn after_throwing<F>(f: F) -> AfterThrowing<F> {
    AfterThrowing(f)
}

/// Runs `f` after the call, whatever the outcome.
pub fn after<F>(f: F) -> After<F>
where
    F: Fn(&JoinPoint<'_>) + Send + Sync,
{
    After(f)
}

impl<E, F> Advice<E> for Before<F>
where
    F: Fn(&JoinPoint<'_>) + Send + Sync,
{
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        (self.0)(jp);
        proceed.proceed()
    }
}

impl<E, F> Advice<E> for AfterReturning<F>
where
    F: Fn(&JoinPoint<'_>) + Send + Sync,
{
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        let returned = proceed.proceed()?;
        (self.0)(jp);
        Ok(returned)
    }
}

impl<E, F> Advice<E> for AfterThrowing<F>
where
    F: Fn(&JoinPoint<'_>, &E) + Send + Sync,
{
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        proceed.proceed().inspect_err(|err| (self.0)(jp, err))
    }
}

impl<E, F> Advice<E> for After<F>
where
    F: Fn(&JoinPoint<'_>) + Send + Sync,
{
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        let outcome = proceed.proceed();
        (self.0)(jp);
        outcome
    }
}

/// Logs the long signature of every advised call at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAdvice;

impl<E> Advice<E> for LogAdvice {
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        tracing::info!("[log] {}", jp);
        proceed.proceed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::advice::{AdviceChain, Advisor};
    use crate::pointcut::Pointcut;
    use crate::proxy::target::{MethodSignature, Registration};

    fn chain(log: &Arc<Mutex<Vec<String>>>) -> AdviceChain<String> {
        let any = || Pointcut::bean("*").unwrap();
        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        AdviceChain::new(vec![
            Advisor::new(
                "before",
                0,
                any(),
                before(move |jp: &JoinPoint<'_>| l1.lock().unwrap().push(format!("[before] {}", jp))),
            ),
            Advisor::new(
                "returning",
                0,
                any(),
                after_returning(move |_: &JoinPoint<'_>| l2.lock().unwrap().push("[return]".into())),
            ),
            Advisor::new(
                "throwing",
                0,
                any(),
                after_throwing(move |_: &JoinPoint<'_>, err: &String| {
                    l3.lock().unwrap().push(format!("[ex] {}", err))
                }),
            ),
            Advisor::new(
                "after",
                0,
                any(),
                after(move |_: &JoinPoint<'_>| l4.lock().unwrap().push("[after]".into())),
            ),
        ])
    }

    #[test]
    fn test_hooks_on_success() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let reg = Registration::for_type("a.OrderService").method(MethodSignature::new("orderItem").param("String"));
        let result = chain(&log).invoke(reg.join_point(&reg.methods()[0]), || Ok::<_, String>(()));

        assert!(result.is_ok());
        assert_eq!(
            *log.lock().unwrap(),
            vec!["[before] void a.OrderService.orderItem(String)", "[after]", "[return]"]
        );
    }

    #[test]
    fn test_hooks_on_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let reg = Registration::for_type("a.OrderService").method(MethodSignature::new("orderItem"));
        let result: Result<(), String> = chain(&log).invoke(reg.join_point(&reg.methods()[0]), || Err("ex".into()));

        assert_eq!(result, Err("ex".to_string()));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["[before] void a.OrderService.orderItem()", "[after]", "[ex] ex"]
        );
    }
}
