use std::sync::atomic::{AtomicU64, Ordering};

/// Handle for one issued search. Only the most recently issued ticket may
/// deliver results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    sequence: u64,
    query: String,
}

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Superseded-result guard for deferred searches.
///
/// Every `issue` bumps a monotonically increasing sequence number; results
/// computed for an older ticket are discarded by `accept`. Shareable across
/// threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, query: impl Into<String>) -> SearchTicket {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            sequence,
            query: query.into(),
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.sequence
    }

    /// Pass `results` through only if no newer search has been issued since `ticket`.
    pub fn accept<T>(&self, ticket: &SearchTicket, results: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(results)
        } else {
            log::debug!(
                "discarding stale results for search #{} ({:?})",
                ticket.sequence,
                ticket.query
            );
            None
        }
    }
}
