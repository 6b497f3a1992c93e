//! Per-thread / per-task slot holding the active [`TraceId`].
//!
//! # Design Decisions
//! - Thread-local by default: synchronous call chains run on one thread
//! - Inside [`TraceContext::scope`] the slot is task-local instead, so tasks
//!   multiplexed on one worker thread keep separate levels
//! - Never process-global

use std::cell::RefCell;
use std::future::Future;

use crate::trace::id::TraceId;

thread_local! {
    static THREAD_SLOT: RefCell<Option<TraceId>> = const { RefCell::new(None) };
}

tokio::task_local! {
    static TASK_SLOT: RefCell<Option<TraceId>>;
}

/// Accessor for the active trace slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceContext;

impl TraceContext {
    /// Run `fut` with its own empty, task-local trace slot.
    pub fn scope<F: Future>(fut: F) -> impl Future<Output = F::Output> {
        TASK_SLOT.scope(RefCell::new(None), fut)
    }

    /// Run `f` synchronously with its own empty trace slot.
    pub fn sync_scope<R>(f: impl FnOnce() -> R) -> R {
        TASK_SLOT.sync_scope(RefCell::new(None), f)
    }

    /// True when the calling code runs inside a [`TraceContext::scope`].
    pub fn is_task_scoped() -> bool {
        TASK_SLOT.try_with(|_| ()).is_ok()
    }

    /// The id active at the innermost in-progress call, if any.
    pub fn current() -> Option<TraceId> {
        with_slot(|slot| slot.borrow().clone())
    }

    /// Replace the active id and return the previous one.
    pub fn replace(next: Option<TraceId>) -> Option<TraceId> {
        with_slot(|slot| slot.replace(next))
    }

    pub fn clear() {
        Self::replace(None);
    }

    pub fn is_empty() -> bool {
        with_slot(|slot| slot.borrow().is_none())
    }
}

fn with_slot<R>(f: impl FnOnce(&RefCell<Option<TraceId>>) -> R) -> R {
    if TraceContext::is_task_scoped() {
        TASK_SLOT.with(f)
    } else {
        THREAD_SLOT.with(f)
    }
}
