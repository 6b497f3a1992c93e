//! Trace identity and per-call status.

use std::fmt;
use std::time::Instant;

use uuid::Uuid;

/// Length of the opaque id portion of a [`TraceId`].
pub const TRACE_ID_LEN: usize = 8;

/// Identity of one logical trace plus the nesting level of a call inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId {
    id: String,
    level: usize,
}

impl TraceId {
    /// Fresh root id (level 0).
    pub fn new_root() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(TRACE_ID_LEN);
        Self { id, level: 0 }
    }

    /// Build an id from known parts. Used by custom id sources and tests.
    pub fn from_parts(id: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }

    /// Same trace, one level deeper.
    pub fn create_next_id(&self) -> Self {
        Self {
            id: self.id.clone(),
            level: self.level + 1,
        }
    }

    /// Same trace, one level up. `None` when this is the root.
    pub fn create_previous_id(&self) -> Option<Self> {
        self.level.checked_sub(1).map(|level| Self {
            id: self.id.clone(),
            level,
        })
    }

    pub fn is_first_level(&self) -> bool {
        self.level == 0
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// State captured by `Tracer::begin` and handed back to `end`/`exception`.
///
/// Not `Clone`: the status is moved into exactly one completion call.
#[derive(Debug)]
pub struct TraceStatus {
    trace_id: TraceId,
    started: Instant,
    message: String,
}

impl TraceStatus {
    pub(crate) fn new(trace_id: TraceId, started: Instant, message: String) -> Self {
        Self {
            trace_id,
            started,
            message,
        }
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
