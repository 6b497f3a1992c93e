//! Destinations for formatted trace lines.

use std::sync::{Arc, Mutex, PoisonError};

/// Receives fully formatted trace lines.
pub trait TraceSink: Send + Sync {
    fn emit(&self, line: &str);
}

impl<F> TraceSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, line: &str) {
        self(line)
    }
}

/// Forwards lines to the `tracing` subscriber at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "logtrace", "{}", line);
    }
}

/// Captures lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything emitted so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TraceSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.emit("a");
        sink.emit("b");

        assert_eq!(sink.lines(), vec!["a", "b"]);
        assert_eq!(clone.take(), vec!["a", "b"]);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let sink = MemorySink::new();
        let inner = sink.clone();
        let forward = move |line: &str| inner.emit(&line.to_uppercase());
        forward.emit("hello");
        assert_eq!(sink.lines(), vec!["HELLO"]);
    }
}
