//! Memoization of solver choices
//!
//! The planner remembers which solver won for each `(problem, flags)` pair,
//! including pairs no solver could handle. On a hit it rebuilds the plan with
//! the remembered solver instead of searching the whole registry again.
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{IoOffsets, Problem, Tensor};
//! use vecfft_planner::{PlannerFlags, SolverMemo};
//!
//! let mut memo = SolverMemo::new();
//! let problem = Problem::new(Tensor::rank0(), Tensor::rank0(), IoOffsets::new(0, 1, 2, 3)).unwrap();
//!
//! assert_eq!(memo.lookup(&problem, PlannerFlags::empty()), None);
//! memo.record(&problem, PlannerFlags::empty(), Some(0));
//! assert_eq!(memo.lookup(&problem, PlannerFlags::empty()), Some(Some(0)));
//!
//! // Different flags are a different key
//! assert_eq!(memo.lookup(&problem, PlannerFlags::IMPATIENT), None);
//! assert_eq!(memo.stats().hits, 1);
//! assert_eq!(memo.stats().misses, 2);
//! ```

use crate::flags::PlannerFlags;
use std::collections::HashMap;
use vecfft_core::Problem;

/// A key that identifies one planning request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    problem: Problem,
    flags: PlannerFlags,
}

impl MemoKey {
    fn new(problem: &Problem, flags: PlannerFlags) -> Self {
        Self {
            problem: problem.clone(),
            flags,
        }
    }
}

/// Statistics for memo performance monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Number of lookups that found an entry
    pub hits: usize,
    /// Number of lookups that found nothing
    pub misses: usize,
    /// Current number of entries
    pub entries: usize,
}

impl MemoStats {
    /// Fraction of lookups that hit (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Map from planning requests to the index of the winning solver
#[derive(Debug, Default)]
pub struct SolverMemo {
    entries: HashMap<MemoKey, Option<usize>>,
    stats: MemoStats,
}

impl SolverMemo {
    /// Create an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembered outcome for a request.
    ///
    /// `Some(Some(i))`: solver `i` won. `Some(None)`: no solver applied.
    /// `None`: never planned.
    pub fn lookup(&mut self, problem: &Problem, flags: PlannerFlags) -> Option<Option<usize>> {
        let found = self.entries.get(&MemoKey::new(problem, flags)).copied();
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    /// Remember the outcome of a request
    pub fn record(&mut self, problem: &Problem, flags: PlannerFlags, winner: Option<usize>) {
        self.entries.insert(MemoKey::new(problem, flags), winner);
        self.stats.entries = self.entries.len();
    }

    /// Forget a request
    pub fn forget(&mut self, problem: &Problem, flags: PlannerFlags) {
        self.entries.remove(&MemoKey::new(problem, flags));
        self.stats.entries = self.entries.len();
    }

    /// Current statistics
    pub fn stats(&self) -> MemoStats {
        self.stats.clone()
    }

    /// Number of remembered requests
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is remembered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = MemoStats::default();
    }
}
