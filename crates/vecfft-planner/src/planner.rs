//! The planning session
//!
//! [`DftPlanner`] is a depth-first search over registered solvers. For each
//! problem it scores every solver and builds plans tier by tier: all `Good`
//! candidates first, then `Ugly` ones only if no `Good` candidate produced a
//! plan. Within a tier the plan with the lowest estimated cost wins (or the
//! first one built, under [`PlannerFlags::IMPATIENT`]).
//!
//! Solvers call back into the session through the [`Planner`] trait to plan
//! their sub-problems, so one top-level request may plan many smaller ones.
//! Each solver is scored right before it is built, so flags written by an
//! earlier candidate are seen by the later ones.
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{IoDim, IoOffsets, Problem, Tensor};
//! use vecfft_planner::{DftPlanner, PlannerConfig};
//!
//! let mut planner = DftPlanner::new(PlannerConfig::default());
//! let problem = Problem::new(
//!     Tensor::from_dims(&[IoDim::new(8, 1, 1)]),
//!     Tensor::from_dims(&[IoDim::new(4, 8, 8), IoDim::new(3, 32, 32)]),
//!     IoOffsets::new(0, 96, 192, 288),
//! )
//! .unwrap();
//!
//! let plan = planner.plan(&problem).unwrap();
//! assert_eq!(
//!     plan.to_string(),
//!     "(dft-vrank>=1-x4/1 (dft-vrank>=1-x3/1 (dft-direct-8)))"
//! );
//! ```

use crate::api::{Plan, Planner, Score, Solver, Wakefulness};
use crate::flags::{PlannerConfig, PlannerFlags};
use crate::memo::{MemoStats, SolverMemo};
use crate::solvers::default_solvers;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use vecfft_core::Problem;

/// A planning session: registered solvers, session flags and the solver memo
#[derive(Debug)]
pub struct DftPlanner {
    solvers: Arc<[Box<dyn Solver>]>,
    flags: PlannerFlags,
    memo: Option<SolverMemo>,
}

impl DftPlanner {
    /// Create a session with the standard solver registry
    pub fn new(config: PlannerConfig) -> Self {
        let solvers = default_solvers(&config.vecloop_preferences);
        Self::with_solvers(&config, solvers)
    }

    /// Create a session with a custom solver registry
    pub fn with_solvers(config: &PlannerConfig, solvers: Vec<Box<dyn Solver>>) -> Self {
        Self {
            solvers: Arc::from(solvers),
            flags: config.flags,
            memo: config.memoize.then(SolverMemo::new),
        }
    }

    /// Registered solvers, in evaluation order
    pub fn solvers(&self) -> &[Box<dyn Solver>] {
        &self.solvers
    }

    /// Memo statistics, if memoization is enabled
    pub fn memo_stats(&self) -> Option<MemoStats> {
        self.memo.as_ref().map(SolverMemo::stats)
    }

    /// Forget every remembered solver choice and reset the memo statistics
    pub fn forget_memo(&mut self) {
        let Some(memo) = self.memo.as_mut() else {
            return;
        };
        if memo.is_empty() {
            return;
        }
        log::debug!("forgetting {} memoized choices", memo.len());
        memo.clear();
    }

    /// Plan `problem` and wake the result for execution.
    ///
    /// Fails when no solver can produce a plan.
    pub fn plan(&mut self, problem: &Problem) -> Result<Box<dyn Plan>> {
        let mut plan = self
            .solve(problem)
            .ok_or_else(|| anyhow!("no plan found for {}", problem))?;
        plan.awake(Wakefulness::Awake);
        log::debug!("planned {} as {}", problem, plan);
        Ok(plan)
    }

    /// Rebuild a plan with a remembered solver
    fn replay(&mut self, problem: &Problem, index: usize) -> Option<Box<dyn Plan>> {
        let solvers = Arc::clone(&self.solvers);
        let solver = solvers.get(index)?;
        let plan = solver.make_plan(problem, self);
        if plan.is_none() {
            log::warn!(
                "memoized solver {} no longer plans {}; searching again",
                solver.name(),
                problem
            );
        }
        plan
    }

    /// Full search: best plan of the highest tier that yields one
    fn search(&mut self, problem: &Problem) -> Option<(usize, Box<dyn Plan>)> {
        let solvers = Arc::clone(&self.solvers);

        for tier in [Score::Good, Score::Ugly] {
            let mut best: Option<(usize, Box<dyn Plan>)> = None;

            for (index, solver) in solvers.iter().enumerate() {
                let score = solver.score(problem, self.flags);
                log::trace!("{} scores {} for {}", solver.name(), score, problem);
                if score != tier {
                    continue;
                }

                let Some(plan) = solver.make_plan(problem, self) else {
                    continue;
                };
                let better = best
                    .as_ref()
                    .map_or(true, |(_, current)| plan.pcost() < current.pcost());
                if better {
                    best = Some((index, plan));
                }

                if self.flags.contains(PlannerFlags::IMPATIENT) {
                    break;
                }
            }

            if let Some((index, plan)) = best {
                log::debug!(
                    "{} wins at tier {} for {} (cost {:.2e})",
                    solvers[index].name(),
                    tier,
                    problem,
                    plan.pcost()
                );
                return Some((index, plan));
            }
        }

        None
    }
}

impl Planner for DftPlanner {
    fn flags(&self) -> PlannerFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut PlannerFlags {
        &mut self.flags
    }

    fn solve(&mut self, problem: &Problem) -> Option<Box<dyn Plan>> {
        let entry_flags = self.flags;
        log::debug!("solving {} with flags {:?}", problem, entry_flags);

        let remembered = self
            .memo
            .as_mut()
            .and_then(|memo| memo.lookup(problem, entry_flags));
        match remembered {
            Some(None) => {
                log::debug!("memo: no plan for {}", problem);
                return None;
            }
            Some(Some(index)) => {
                if let Some(plan) = self.replay(problem, index) {
                    log::debug!("memo hit for {}", problem);
                    return Some(plan);
                }
                if let Some(memo) = self.memo.as_mut() {
                    memo.forget(problem, entry_flags);
                }
            }
            None => {}
        }

        let found = self.search(problem);
        if let Some(memo) = self.memo.as_mut() {
            memo.record(problem, entry_flags, found.as_ref().map(|(index, _)| *index));
        }
        found.map(|(_, plan)| plan)
    }
}
