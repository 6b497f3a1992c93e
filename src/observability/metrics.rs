//! Metrics recorded by the tracer and the proxy dispatcher.
//!
//! # Metrics
//! - `logtrace_calls_total` (counter): completed traced calls by outcome
//! - `logtrace_call_duration_ms` (histogram): traced call latency
//! - `logtrace_context_imbalance_total` (counter): unmatched end/exception calls
//! - `logtrace_advised_invocations_total` (counter): dispatches through an advice chain
//! - `logtrace_advice_chain_depth` (histogram): advices per advised dispatch

use std::time::Duration;

/// Record one completed traced call.
pub fn record_call(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("logtrace_calls_total", "outcome" => outcome).increment(1);
    metrics::histogram!("logtrace_call_duration_ms").record(elapsed.as_secs_f64() * 1000.0);
}

pub fn record_context_imbalance() {
    metrics::counter!("logtrace_context_imbalance_total").increment(1);
}

/// Record a dispatch through an advice chain of `depth` advices.
pub fn record_advised_invocation(depth: usize) {
    metrics::counter!("logtrace_advised_invocations_total").increment(1);
    metrics::histogram!("logtrace_advice_chain_depth").record(depth as f64);
}
