//! Solver families registered with the planner
//!
//! - [`VrankGeq1Solver`]: peels vector dimensions into loops
//! - [`DirectSolver`]: naive transforms of a single problem
//! - [`Rank0Solver`]: single-point copies

pub mod direct;
pub mod rank0;
pub mod vrank_geq1;

pub use direct::{DirectPlan, DirectSolver};
pub use rank0::{CopyPlan, Rank0Solver};
pub use vrank_geq1::{LoopPlan, VrankGeq1Solver};

use crate::api::Solver;

/// The standard registry: leaf solvers, then one vector-loop solver per preference
pub fn default_solvers(vecloop_preferences: &[i32]) -> Vec<Box<dyn Solver>> {
    let mut solvers: Vec<Box<dyn Solver>> = vec![
        Box::new(Rank0Solver::new()),
        Box::new(DirectSolver::new()),
    ];
    solvers.extend(
        VrankGeq1Solver::family(vecloop_preferences)
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Solver>),
    );
    solvers
}

/// Slice index for an element offset.
///
/// Negative offsets map past the end, so they fail the slice bounds check
/// like any other out-of-range access.
pub(crate) fn at(offset: isize) -> usize {
    usize::try_from(offset).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let names: Vec<String> = default_solvers(&[1, -1]).iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["dft-rank0", "dft-direct", "dft-vrank>=1/1", "dft-vrank>=1/-1"]
        );
    }

    #[test]
    fn test_at() {
        assert_eq!(at(7), 7);
        assert_eq!(at(-1), usize::MAX);
    }
}
