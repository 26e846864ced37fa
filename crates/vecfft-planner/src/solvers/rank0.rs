//! Rank-0 transforms: a single complex point, copied from input to output

use super::at;
use crate::api::{Plan, Planner, Score, Solver, Wakefulness};
use crate::cost::OpCount;
use crate::flags::PlannerFlags;
use std::fmt;
use vecfft_core::{IoOffsets, Problem, R};

/// Solver for problems with no core and no vector dimensions
#[derive(Debug, Clone, Copy, Default)]
pub struct Rank0Solver;

impl Rank0Solver {
    /// Create the solver
    pub fn new() -> Self {
        Self
    }

    /// Whether the problem is a single point
    pub fn applicable(&self, problem: &Problem) -> bool {
        problem.core().rank() == Some(0) && problem.vector().rank() == Some(0)
    }
}

impl Solver for Rank0Solver {
    fn name(&self) -> String {
        "dft-rank0".to_string()
    }

    fn score(&self, problem: &Problem, _flags: PlannerFlags) -> Score {
        if self.applicable(problem) {
            Score::Good
        } else {
            Score::Bad
        }
    }

    fn make_plan(&self, problem: &Problem, _planner: &mut dyn Planner) -> Option<Box<dyn Plan>> {
        if !self.applicable(problem) {
            return None;
        }
        Some(Box::new(CopyPlan {
            in_place: problem.is_in_place(),
        }))
    }
}

/// Copies one complex value; does nothing when planned in place
#[derive(Debug, Clone, Copy)]
pub struct CopyPlan {
    in_place: bool,
}

impl Plan for CopyPlan {
    fn execute(&self, mem: &mut [R], io: IoOffsets) {
        if self.in_place {
            return;
        }
        let re = mem[at(io.ri)];
        let im = mem[at(io.ii)];
        mem[at(io.ro)] = re;
        mem[at(io.io)] = im;
    }

    fn awake(&mut self, _wakefulness: Wakefulness) {}

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_place {
            write!(f, "(dft-rank0-nop)")
        } else {
            write!(f, "(dft-rank0-copy)")
        }
    }

    fn ops(&self) -> OpCount {
        if self.in_place {
            OpCount::ZERO
        } else {
            OpCount::new(0.0, 0.0, 0.0, 4.0)
        }
    }

    fn pcost(&self) -> f64 {
        self.ops().estimate_cost()
    }
}
