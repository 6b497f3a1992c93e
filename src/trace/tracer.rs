//! Call-tree tracer.
//!
//! # Line Format
//! ```text
//! [3f2a9c1e] OrderController.request()
//! [3f2a9c1e] |-->OrderService.orderItem()
//! [3f2a9c1e] |   |-->OrderRepository.save()
//! [3f2a9c1e] |   |<--OrderRepository.save() time=1001ms
//! [3f2a9c1e] |<--OrderService.orderItem() time=1001ms
//! [3f2a9c1e] OrderController.request() time=1002ms
//! ```
//! A failed call uses `<X-` and appends `ex=<kind>: <message>`.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::observability::metrics;
use crate::trace::context::TraceContext;
use crate::trace::id::{TraceId, TraceStatus};
use crate::trace::sink::{TraceSink, TracingSink};

const START_PREFIX: &str = "-->";
const COMPLETE_PREFIX: &str = "<--";
const EX_PREFIX: &str = "<X-";

/// Error description recorded by [`Tracer::exception`].
pub trait ErrorInfo: fmt::Display {
    /// Short class of the error, e.g. `IllegalStateException`.
    fn kind(&self) -> &str;

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Bookkeeping failures detected while completing a trace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("no active trace while completing [{id}] level {level}")]
    NoActiveTrace { id: String, level: usize },

    #[error("active trace [{found_id}] level {found_level} does not match completed [{id}] level {level}")]
    LevelMismatch {
        id: String,
        level: usize,
        found_id: String,
        found_level: usize,
    },
}

/// Time source for elapsed-time measurement.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    /// Always returns the same instant, so every call reports `time=0ms`.
    Frozen(Instant),
}

impl Clock {
    pub fn frozen() -> Self {
        Clock::Frozen(Instant::now())
    }

    fn now(&self) -> Instant {
        match self {
            Clock::System => Instant::now(),
            Clock::Frozen(at) => *at,
        }
    }
}

type IdSource = Arc<dyn Fn() -> TraceId + Send + Sync>;

/// Records begin/end/exception of nested calls as an indented call tree.
#[derive(Clone)]
pub struct Tracer {
    sink: Arc<dyn TraceSink>,
    clock: Clock,
    ids: IdSource,
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer").field("clock", &self.clock).finish_non_exhaustive()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl Tracer {
    pub fn new(sink: impl TraceSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            clock: Clock::System,
            ids: Arc::new(TraceId::new_root),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the generator used for root ids.
    pub fn with_id_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> TraceId + Send + Sync + 'static,
    {
        self.ids = Arc::new(source);
        self
    }

    /// Start a call. Nests under the active trace when there is one.
    pub fn begin(&self, message: impl Into<String>) -> TraceStatus {
        let message = message.into();
        let trace_id = match TraceContext::current() {
            Some(parent) => parent.create_next_id(),
            None => (self.ids)(),
        };
        TraceContext::replace(Some(trace_id.clone()));

        self.sink.emit(&format!(
            "[{}] {}{}",
            trace_id,
            add_space(START_PREFIX, trace_id.level()),
            message
        ));
        TraceStatus::new(trace_id, self.clock.now(), message)
    }

    /// Complete a call normally.
    pub fn end(&self, status: TraceStatus) {
        self.complete(status, None);
    }

    /// Complete a call that failed with `error`.
    pub fn exception(&self, status: TraceStatus, error: &dyn ErrorInfo) {
        self.complete(status, Some(error));
    }

    /// Begin a call and return a guard that records a panic if it is dropped
    /// while unwinding.
    pub fn begin_guarded(&self, message: impl Into<String>) -> TraceGuard<'_> {
        TraceGuard {
            tracer: self,
            status: Some(self.begin(message)),
        }
    }

    /// Run `f` as one traced call and return its result unchanged.
    pub fn trace<R, E>(&self, message: impl Into<String>, f: impl FnOnce() -> Result<R, E>) -> Result<R, E>
    where
        E: ErrorInfo,
    {
        let guard = self.begin_guarded(message);
        match f() {
            Ok(value) => {
                guard.end();
                Ok(value)
            }
            Err(err) => {
                guard.exception(&err);
                Err(err)
            }
        }
    }

    fn complete(&self, status: TraceStatus, error: Option<&dyn ErrorInfo>) {
        let elapsed = self.clock.now().saturating_duration_since(status.started());
        let trace_id = status.trace_id();
        let level = trace_id.level();

        let line = match error {
            None => format!(
                "[{}] {}{} time={}ms",
                trace_id,
                add_space(COMPLETE_PREFIX, level),
                status.message(),
                elapsed.as_millis()
            ),
            Some(err) => format!(
                "[{}] {}{} time={}ms ex={}",
                trace_id,
                add_space(EX_PREFIX, level),
                status.message(),
                elapsed.as_millis(),
                describe(err)
            ),
        };
        self.sink.emit(&line);
        record(error.is_some(), elapsed);

        if let Err(err) = release(&status) {
            tracing::warn!(error = %err, "Trace context imbalance, resetting context");
            metrics::record_context_imbalance();
            TraceContext::clear();
        }
    }
}

/// A started call that must be completed with [`TraceGuard::end`] or
/// [`TraceGuard::exception`].
#[derive(Debug)]
pub struct TraceGuard<'t> {
    tracer: &'t Tracer,
    status: Option<TraceStatus>,
}

impl TraceGuard<'_> {
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.status.as_ref().map(TraceStatus::trace_id)
    }

    pub fn end(mut self) {
        if let Some(status) = self.status.take() {
            self.tracer.end(status);
        }
    }

    pub fn exception(mut self, error: &dyn ErrorInfo) {
        if let Some(status) = self.status.take() {
            self.tracer.exception(status, error);
        }
    }
}

impl Drop for TraceGuard<'_> {
    fn drop(&mut self) {
        if let Some(status) = self.status.take() {
            self.tracer.exception(status, &Panicked);
        }
    }
}

struct Panicked;

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("call unwound before completing")
    }
}

impl ErrorInfo for Panicked {
    fn kind(&self) -> &str {
        "panic"
    }
}

/// Restore the context to the parent of `status`, or clear it at the root.
fn release(status: &TraceStatus) -> Result<(), TraceError> {
    let completed = status.trace_id();
    match TraceContext::current() {
        Some(active) if &active == completed => {
            TraceContext::replace(completed.create_previous_id());
            Ok(())
        }
        Some(active) => Err(TraceError::LevelMismatch {
            id: completed.id().to_string(),
            level: completed.level(),
            found_id: active.id().to_string(),
            found_level: active.level(),
        }),
        None => Err(TraceError::NoActiveTrace {
            id: completed.id().to_string(),
            level: completed.level(),
        }),
    }
}

fn record(failed: bool, elapsed: Duration) {
    let outcome = if failed { "exception" } else { "ok" };
    metrics::record_call(outcome, elapsed);
}

fn describe(err: &dyn ErrorInfo) -> String {
    let message = err.message();
    if message.is_empty() {
        err.kind().to_string()
    } else {
        format!("{}: {}", err.kind(), message)
    }
}

/// `|   ` for every ancestor level, then `|` + prefix for the call itself.
fn add_space(prefix: &str, level: usize) -> String {
    let mut out = String::with_capacity(level * 4);
    for i in 0..level {
        if i == level - 1 {
            out.push('|');
            out.push_str(prefix);
        } else {
            out.push_str("|   ");
        }
    }
    out
}
