//! Debounced, cancellable card search.
//!
//! [`SearchSession`] is a clock-driven state machine: the caller reports query
//! changes and the current time, polls for a request once the debounce window
//! has elapsed, and hands the catalog's answer back tagged with the request's
//! generation. Any answer whose generation is not the latest is dropped, so
//! the last query always wins regardless of how responses interleave.

use std::time::{Duration, Instant};

use crate::catalog::CardCatalog;
use crate::classifier::Classifier;
use crate::config::{DEBOUNCE, MIN_QUERY_LEN};
use crate::error::Result;
use crate::models::CardRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// Query too short; no results and nothing scheduled.
    Idle,
    /// Waiting for the debounce window to close.
    Pending { query: String, deadline: Instant },
    /// Request dispatched, awaiting the catalog.
    InFlight { query: String },
    Resolved {
        query: String,
        results: Vec<CardRecord>,
    },
    Failed { query: String, error: String },
}

/// A lookup the caller should issue against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    state: SearchState,
    generation: u64,
    debounce: Duration,
    min_query_len: usize,
    classifier: Classifier,
}

impl SearchSession {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            state: SearchState::Idle,
            generation: 0,
            debounce: DEBOUNCE,
            min_query_len: MIN_QUERY_LEN,
            classifier,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Token of the most recent query change or cancellation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Current results; empty unless the last search resolved.
    pub fn results(&self) -> &[CardRecord] {
        match &self.state {
            SearchState::Resolved { results, .. } => results,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.state,
            SearchState::Pending { .. } | SearchState::InFlight { .. }
        )
    }

    /// When the pending request becomes due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            SearchState::Pending { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Record a new query string.
    ///
    /// Supersedes any pending or in-flight request and restarts the debounce
    /// window. Returns the new generation.
    pub fn set_query(&mut self, query: &str, now: Instant) -> u64 {
        self.supersede("query changed");
        self.state = if query.trim().chars().count() < self.min_query_len {
            SearchState::Idle
        } else {
            SearchState::Pending {
                query: query.to_string(),
                deadline: now + self.debounce,
            }
        };
        self.generation
    }

    /// Drop any pending or in-flight request and return to idle.
    pub fn cancel(&mut self) {
        self.supersede("cancelled");
        self.state = SearchState::Idle;
    }

    /// Move a due pending query in flight and return the request to issue.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = match &self.state {
            SearchState::Pending { query, deadline } if now >= *deadline => query.clone(),
            _ => return None,
        };
        tracing::debug!(generation = self.generation, %query, "dispatching catalog search");
        self.state = SearchState::InFlight {
            query: query.clone(),
        };
        Some(SearchRequest {
            generation: self.generation,
            query,
        })
    }

    /// Apply a catalog answer for `generation`.
    ///
    /// Returns `false` (and changes nothing) if the answer is stale.
    pub fn complete(&mut self, generation: u64, outcome: Result<Vec<CardRecord>>) -> bool {
        let query = match &self.state {
            SearchState::InFlight { query } if generation == self.generation => query.clone(),
            _ => {
                tracing::debug!(generation, current = self.generation, "discarding stale search response");
                return false;
            }
        };

        self.state = match outcome {
            Ok(cards) => {
                let results: Vec<CardRecord> = cards
                    .into_iter()
                    .filter(|c| !self.classifier.is_banned(&c.type_field))
                    .collect();
                SearchState::Resolved { query, results }
            }
            Err(e) => {
                tracing::warn!(error = %e, %query, "catalog search failed");
                SearchState::Failed {
                    query,
                    error: e.to_string(),
                }
            }
        };
        true
    }

    /// Issue the due request, if any, synchronously against `catalog`.
    ///
    /// Returns `true` if a request was made and applied.
    pub fn run_due(&mut self, now: Instant, catalog: &dyn CardCatalog) -> bool {
        match self.poll(now) {
            Some(request) => {
                let outcome = catalog.lookup_by_name_fragment(&request.query);
                self.complete(request.generation, outcome)
            }
            None => false,
        }
    }

    fn supersede(&mut self, reason: &str) {
        if self.is_loading() {
            tracing::debug!(generation = self.generation, reason, "superseding search");
        }
        self.generation += 1;
    }
}
