//! Execution tracing subsystem.
//!
//! # Data Flow
//! ```text
//! Tracer::begin(message)
//!     → context.rs (read active TraceId, store root or next-level id)
//!     → sink.rs (emit "[id] |-->message")
//!     → TraceStatus returned to the caller
//!
//! Tracer::end(status) / Tracer::exception(status, err)
//!     → sink.rs (emit "[id] |<--message time=..ms" or "<X- ... ex=..")
//!     → context.rs (restore parent id, or clear at the root)
//! ```
//!
//! # Design Decisions
//! - TraceStatus is moved into end/exception, so it is completed at most once
//! - Level bookkeeping lives in the context slot, never in the Tracer, so one
//!   Tracer is shared freely across threads
//! - An unmatched completion is logged and resets the slot instead of
//!   corrupting later traces on the same thread

pub mod context;
pub mod id;
pub mod sink;
pub mod tracer;

pub use context::TraceContext;
pub use id::{TraceId, TraceStatus};
pub use sink::{MemorySink, TraceSink, TracingSink};
pub use tracer::{Clock, ErrorInfo, TraceError, TraceGuard, Tracer};
