//! Call-tree tracing advice.

use crate::advice::{Advice, Proceed, Returned};
use crate::proxy::target::JoinPoint;
use crate::trace::{ErrorInfo, Tracer};

/// Traces every advised call as `Type.method()` on the shared [`Tracer`].
///
/// A failed call is recorded with `<X-` and the error is returned unchanged,
/// after the trace context has been restored to the caller's level.
#[derive(Debug, Clone, Default)]
pub struct TraceAdvice {
    tracer: Tracer,
}

impl TraceAdvice {
    pub fn new(tracer: Tracer) -> Self {
        Self { tracer }
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }
}

impl<E: ErrorInfo> Advice<E> for TraceAdvice {
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, E>) -> Result<Returned<'a>, E> {
        let guard = self.tracer.begin_guarded(jp.short_signature());
        match proceed.proceed() {
            Ok(returned) => {
                guard.end();
                Ok(returned)
            }
            Err(err) => {
                guard.exception(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    use crate::advice::{AdviceChain, Advisor};
    use crate::pointcut::Pointcut;
    use crate::proxy::target::{MethodSignature, Registration};
    use crate::trace::{Clock, MemorySink, TraceContext, TraceId};

    #[derive(Debug, PartialEq)]
    struct Failed;

    impl fmt::Display for Failed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("example exception")
        }
    }

    impl ErrorInfo for Failed {
        fn kind(&self) -> &str {
            "IllegalStateException"
        }
    }

    #[test]
    fn test_trace_advice_restores_context_before_error_returns() {
        TraceContext::clear();
        let sink = MemorySink::new();
        let tracer = Tracer::new(sink.clone())
            .with_clock(Clock::frozen())
            .with_id_source(|| TraceId::from_parts("0000beef", 0));
        let chain = AdviceChain::new(vec![Advisor::new(
            "trace",
            0,
            Pointcut::parse("execution(* *..*Repository.*(..))").unwrap(),
            TraceAdvice::new(tracer.clone()),
        )]);
        let reg = Registration::for_type("hello.aop.order.OrderRepository").method(MethodSignature::new("save"));
        let jp = reg.join_point(&reg.methods()[0]);

        let outer = tracer.begin("OrderService.orderItem()");
        let result: Result<(), Failed> = chain.invoke(jp, || Err(Failed));
        assert_eq!(result, Err(Failed));
        // The caller sees its own level again while handling the error.
        assert_eq!(TraceContext::current().map(|id| id.level()), Some(0));
        tracer.exception(outer, &Failed);

        assert_eq!(
            sink.lines(),
            vec![
                "[0000beef] OrderService.orderItem()",
                "[0000beef] |-->OrderRepository.save()",
                "[0000beef] |<X-OrderRepository.save() time=0ms ex=IllegalStateException: example exception",
                "[0000beef] OrderService.orderItem() time=0ms ex=IllegalStateException: example exception",
            ]
        );
        assert!(TraceContext::is_empty());
    }
}
