//! Debounced, latest-wins search session.
//!
//! # Invariants
//! - A query is released for execution only after `debounce` of inactivity.
//! - Every keystroke invalidates all previously issued tickets.
//! - Results are accepted only for the most recent ticket.

use std::time::{Duration, Instant};

/// Default quiet period before a query is executed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Handle for one issued search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
struct PendingInput {
    query: String,
    last_input_at: Instant,
}

/// Tracks the user's latest query and which in-flight result may be applied.
#[derive(Debug)]
pub struct SearchSession {
    debounce: Duration,
    generation: u64,
    pending: Option<PendingInput>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            generation: 0,
            pending: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Records a keystroke. Blank input clears the pending query.
    pub fn input(&mut self, query: &str, now: Instant) {
        self.generation += 1;
        self.pending = if query.trim().is_empty() {
            None
        } else {
            Some(PendingInput {
                query: query.to_string(),
                last_input_at: now,
            })
        };
    }

    /// Returns whether a query is waiting for its quiet period.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending query once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| now.saturating_duration_since(pending.last_input_at) >= self.debounce);
        if !ready {
            return None;
        }
        self.pending.take().map(|pending| SearchTicket {
            generation: self.generation,
            query: pending.query,
        })
    }

    /// Returns whether no newer input arrived since `ticket` was issued.
    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Passes `results` through only when `ticket` is still current.
    pub fn accept<T>(&self, ticket: &SearchTicket, results: T) -> Option<T> {
        self.is_current(ticket).then_some(results)
    }

    /// Drops the pending query and invalidates in-flight tickets.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}
