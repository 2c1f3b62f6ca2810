//! Query Monitor
//!
//! A bounded, in-memory log of recent backend query attempts. Constructed
//! explicitly and shared behind an `Arc`; it never affects query outcomes.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Outcome of a monitored query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// The backend answered.
    Success,

    /// The backend call failed.
    Error,
}

/// One recorded query attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEvent {
    /// Table the query ran against.
    pub table: String,

    /// Operation name, e.g. `list_available`.
    pub operation: String,

    /// Outcome.
    pub status: QueryStatus,

    /// Wall-clock duration of the call.
    pub duration: Duration,

    /// Error message for failed calls.
    pub error: Option<String>,

    /// When the attempt finished.
    pub recorded_at: Timestamp,
}

/// Aggregates over the buffered events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Buffered events.
    pub total: usize,

    /// Buffered failures.
    pub errors: usize,

    /// Mean duration of the buffered events.
    pub mean_duration: Duration,
}

/// Ring buffer of the most recent query attempts.
#[derive(Debug)]
pub struct QueryMonitor {
    capacity: usize,
    events: Mutex<VecDeque<QueryEvent>>,
}

impl QueryMonitor {
    /// Default number of retained events.
    pub const DEFAULT_CAPACITY: usize = 50;

    /// Monitor retaining at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of retained events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start timing a query; finish it with [`QueryTimer::success`] or
    /// [`QueryTimer::failure`].
    pub fn start(&self, table: &str, operation: &str) -> QueryTimer<'_> {
        QueryTimer {
            monitor: self,
            table: table.to_string(),
            operation: operation.to_string(),
            started: Instant::now(),
        }
    }

    /// Append an event, evicting the oldest beyond capacity.
    pub fn record(&self, event: QueryEvent) {
        let mut events = self.lock();

        while events.len() >= self.capacity {
            events.pop_front();
        }

        events.push_back(event);
    }

    /// Oldest-first copy of the buffered events.
    pub fn snapshot(&self) -> Vec<QueryEvent> {
        self.lock().iter().cloned().collect()
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every buffered event.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Totals over the buffered events.
    pub fn stats(&self) -> MonitorStats {
        let events = self.lock();
        let total = events.len();

        if total == 0 {
            return MonitorStats::default();
        }

        let errors = events
            .iter()
            .filter(|event| event.status == QueryStatus::Error)
            .count();

        let sum: Duration = events.iter().map(|event| event.duration).sum();
        let mean_duration = u32::try_from(total).map_or(Duration::ZERO, |count| sum / count);

        MonitorStats {
            total,
            errors,
            mean_duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<QueryEvent>> {
        // The buffer stays consistent even if a holder panicked mid-push.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for QueryMonitor {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

/// An in-flight monitored query.
#[derive(Debug)]
pub struct QueryTimer<'a> {
    monitor: &'a QueryMonitor,
    table: String,
    operation: String,
    started: Instant,
}

impl QueryTimer<'_> {
    /// Record a successful attempt.
    pub fn success(self) {
        self.finish(QueryStatus::Success, None);
    }

    /// Record a failed attempt.
    pub fn failure(self, error: impl ToString) {
        self.finish(QueryStatus::Error, Some(error.to_string()));
    }

    /// Record the attempt from a result, passing it through.
    pub fn observe<T, E: ToString>(self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.finish(QueryStatus::Success, None),
            Err(error) => self.finish(QueryStatus::Error, Some(error.to_string())),
        }

        result
    }

    fn finish(self, status: QueryStatus, error: Option<String>) {
        self.monitor.record(QueryEvent {
            table: self.table,
            operation: self.operation,
            status,
            duration: self.started.elapsed(),
            error,
            recorded_at: Timestamp::now(),
        });
    }
}
