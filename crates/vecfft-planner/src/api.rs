//! Public planner API
//!
//! Defines the three seams of the planner:
//!
//! - [`Plan`]: an executable strategy for one problem instance
//! - [`Solver`]: a strategy family that scores problems and builds plans
//! - [`Planner`]: the recursive entry point solvers call for sub-problems
//!
//! plus [`DftPlan`], the checked handle returned to users by [`plan_dft`].

use crate::cost::OpCount;
use crate::flags::{PlannerConfig, PlannerFlags};
use crate::planner::DftPlanner;
use anyhow::{Context, Result};
use std::fmt;
use vecfft_core::{IoOffsets, Problem, R};

/// Preference tier a solver assigns to a problem
///
/// Ordered so that `Bad < Ugly < Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Score {
    /// Never choose this solver for the problem
    Bad,
    /// Choose only when no `Good` solver produces a plan
    Ugly,
    /// Normal candidate
    Good,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Bad => write!(f, "BAD"),
            Score::Ugly => write!(f, "UGLY"),
            Score::Good => write!(f, "GOOD"),
        }
    }
}

/// Resource state of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wakefulness {
    /// Scratch state released
    #[default]
    Sleeping,
    /// Scratch state allocated, ready for repeated execution
    Awake,
}

/// An executable plan
///
/// A plan owns its children; dropping a plan drops its whole subtree exactly once.
pub trait Plan: fmt::Debug {
    /// Run the plan on `mem` with the channels located at `io`.
    ///
    /// The caller guarantees that every offset the plan touches is in bounds.
    fn execute(&self, mem: &mut [R], io: IoOffsets);

    /// Allocate or release scratch state before or after a series of executions
    fn awake(&mut self, wakefulness: Wakefulness);

    /// Write a description of the plan (and its children)
    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Operation count of one execution
    fn ops(&self) -> OpCount;

    /// Estimated cost of one execution
    fn pcost(&self) -> f64;
}

impl fmt::Display for dyn Plan + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f)
    }
}

/// A strategy family registered with the planner
pub trait Solver: fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> String;

    /// Rank this solver for `problem` under the current flags
    fn score(&self, problem: &Problem, flags: PlannerFlags) -> Score;

    /// Build a plan for `problem`, calling back into `planner` for sub-problems.
    ///
    /// Returns `None` when the solver cannot handle the problem or a
    /// sub-problem has no plan. Neither case is an error.
    fn make_plan(&self, problem: &Problem, planner: &mut dyn Planner) -> Option<Box<dyn Plan>>;
}

/// Recursive planning entry point seen by solvers
pub trait Planner {
    /// Current session flags
    fn flags(&self) -> PlannerFlags;

    /// Mutable access to the session flags
    fn flags_mut(&mut self) -> &mut PlannerFlags;

    /// Find the best plan for `problem`, if any solver can build one
    fn solve(&mut self, problem: &Problem) -> Option<Box<dyn Plan>>;
}

/// A planned transform bound to the problem it was planned for
///
/// # Example
///
/// ```
/// use vecfft_core::{IoDim, IoOffsets, Problem, Tensor};
/// use vecfft_planner::{plan_dft, PlannerConfig};
///
/// // Two interleaved transforms of length 4, out of place
/// let problem = Problem::new(
///     Tensor::from_dims(&[IoDim::new(4, 2, 2)]),
///     Tensor::from_dims(&[IoDim::new(2, 8, 8)]),
///     IoOffsets::interleaved(0, 16),
/// )
/// .unwrap();
///
/// let plan = plan_dft(&problem, &PlannerConfig::default()).unwrap();
///
/// // Impulses in, constant spectra out
/// let mut mem = vec![0.0; 32];
/// mem[0] = 1.0;
/// mem[8] = 2.0;
/// plan.execute(&mut mem).unwrap();
///
/// assert_eq!(&mem[16..24], &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
/// assert_eq!(&mem[24..32], &[2.0, 0.0, 2.0, 0.0, 2.0, 0.0, 2.0, 0.0]);
/// ```
#[derive(Debug)]
pub struct DftPlan {
    problem: Problem,
    plan: Box<dyn Plan>,
}

impl DftPlan {
    /// Bind an awake plan to its problem
    pub fn new(problem: Problem, plan: Box<dyn Plan>) -> Self {
        Self { problem, plan }
    }

    /// The problem this plan solves
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// The root of the plan tree
    pub fn plan(&self) -> &dyn Plan {
        self.plan.as_ref()
    }

    /// Run the transform on `mem`, checking the problem's footprint first
    pub fn execute(&self, mem: &mut [R]) -> Result<()> {
        self.problem
            .check_memory(mem.len())
            .with_context(|| format!("cannot execute plan for {}", self.problem))?;
        self.plan.execute(mem, self.problem.io());
        Ok(())
    }

    /// Textual description of the plan tree
    pub fn describe(&self) -> String {
        self.plan.to_string()
    }

    /// Operation count of one execution
    pub fn ops(&self) -> OpCount {
        self.plan.ops()
    }

    /// Estimated cost of one execution
    pub fn pcost(&self) -> f64 {
        self.plan.pcost()
    }
}

impl Drop for DftPlan {
    fn drop(&mut self) {
        self.plan.awake(Wakefulness::Sleeping);
    }
}

impl fmt::Display for DftPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transform Plan:")?;
        writeln!(f, "  Problem: {}", self.problem)?;
        writeln!(f, "  Estimated cost: {:.2e}", self.plan.pcost())?;
        writeln!(f, "  Operations: {:.2e}", self.plan.ops().total())?;
        write!(f, "  Tree: {}", self.plan)
    }
}

/// Plan `problem` with a fresh planning session
///
/// Fails when no registered solver can handle the problem.
pub fn plan_dft(problem: &Problem, config: &PlannerConfig) -> Result<DftPlan> {
    let mut planner = DftPlanner::new(config.clone());
    let plan = planner.plan(problem)?;
    Ok(DftPlan::new(problem.clone(), plan))
}
