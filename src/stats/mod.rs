//! Cross-worker classification statistics
//!
//! [`SharedAccumulator`] is the only state mutated by more than one worker.
//! Every update (category count, total, correct count) happens under a single
//! mutex so no reader can observe a partial update.

use anyhow::{Result, bail};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::taxonomy::Taxonomy;

/// Count for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Immutable copy of the accumulator state, categories in taxonomy order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AccumulatorSnapshot {
    pub counts: Vec<CategoryCount>,
    pub total_processed: usize,
    pub correct_count: usize,
}

impl AccumulatorSnapshot {
    pub fn count_for(&self, category: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
    }

    /// Sum of every per-category count; equals `total_processed`
    pub fn counted(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}

#[derive(Debug)]
struct AccumulatorState {
    counts: Vec<usize>,
    total_processed: usize,
    correct_count: usize,
}

/// Mutex-guarded per-run statistics
#[derive(Debug)]
pub struct SharedAccumulator {
    categories: Vec<String>,
    state: Mutex<AccumulatorState>,
}

impl SharedAccumulator {
    /// Fresh accumulator with a zero count for every taxonomy category
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let categories: Vec<String> = taxonomy.category_names().map(str::to_string).collect();
        let state = AccumulatorState {
            counts: vec![0; categories.len()],
            total_processed: 0,
            correct_count: 0,
        };
        Self {
            categories,
            state: Mutex::new(state),
        }
    }

    /// Record one successfully processed document
    pub fn record_outcome(&self, category: &str, was_correct: bool) -> Result<()> {
        self.record_after(category, was_correct, || Ok(()))
    }

    /// Run `action` and, if it succeeds, record the outcome, all under one lock
    ///
    /// The organizer passes the file relocation as `action`, so the move and
    /// the counter updates for a document form one critical section. Unknown
    /// categories are rejected before `action` runs.
    pub fn record_after<T, F>(&self, category: &str, was_correct: bool, action: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let Some(index) = self.categories.iter().position(|c| c == category) else {
            bail!("Unknown category '{}'", category);
        };

        let mut state = self.lock();
        let value = action()?;

        state.counts[index] += 1;
        state.total_processed += 1;
        if was_correct {
            state.correct_count += 1;
        }

        Ok(value)
    }

    pub fn snapshot(&self) -> AccumulatorSnapshot {
        let state = self.lock();
        AccumulatorSnapshot {
            counts: self
                .categories
                .iter()
                .zip(&state.counts)
                .map(|(category, &count)| CategoryCount {
                    category: category.clone(),
                    count,
                })
                .collect(),
            total_processed: state.total_processed,
            correct_count: state.correct_count,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AccumulatorState> {
        // Counters are only written after `action` returns, so a poisoned
        // lock never holds a partial update
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
