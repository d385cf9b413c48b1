//! Query gate - bookkeeping for the debounce and dedupe stages
//!
//! The timer itself is a keyed debounce task owned by the runtime. The gate
//! hands out a generation for every scheduled query and only releases the
//! value whose generation is still the latest one, so the trailing value of a
//! quiet window is the only one that ever reaches the search flow.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default quiet period before a query is released.
pub const QUIET_WINDOW: Duration = Duration::from_millis(600);

/// Task key shared by every pending query timer.
pub const DEBOUNCE_TASK: &str = "query_debounce";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct QueryGate {
    generation: u64,
    search_seq: u64,
    last_released: Option<String>,
}

impl QueryGate {
    /// Register an accepted query; returns the generation to tag its timer with.
    pub fn schedule(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Timer expiry. Returns the query to search for, or `None` when the timer
    /// was superseded or the value repeats the last released one and
    /// repeating is not allowed.
    pub fn release(&mut self, generation: u64, query: String, can_repeat: bool) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        if self.last_released.as_deref() == Some(query.as_str()) && !can_repeat {
            return None;
        }
        self.last_released = Some(query.clone());
        Some(query)
    }

    /// Sequence number for a search about to be issued.
    pub fn issue_search(&mut self) -> u64 {
        self.search_seq += 1;
        self.search_seq
    }

    pub fn is_current_search(&self, seq: u64) -> bool {
        seq == self.search_seq
    }

    /// Responses to searches issued so far will be discarded.
    pub fn invalidate_searches(&mut self) {
        self.search_seq += 1;
    }

    /// Gate for a new open cycle: pending timers and in-flight searches of
    /// the previous cycle become stale and the dedupe memory starts empty.
    pub fn carried_over(self) -> Self {
        Self {
            generation: self.generation + 1,
            search_seq: self.search_seq + 1,
            last_released: None,
        }
    }

    pub fn last_released(&self) -> Option<&str> {
        self.last_released.as_deref()
    }
}
