//! Vector loops: peel one vector dimension into an explicit loop
//!
//! A [`VrankGeq1Solver`] handles any problem with at least one vector
//! dimension. It picks a dimension, asks the planner for a plan of the problem
//! without that dimension, and wraps the answer in a [`LoopPlan`] that runs it
//! once per point along the peeled dimension. Repeated application reduces the
//! vector rank to zero, so other solvers only ever see single transforms.
//!
//! Solvers are registered as a family, one per entry of a preference list
//! (see [`pick_dim`](crate::pick_dim)); each member favors a different
//! dimension and defers to earlier members that would pick the same one.
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{IoDim, IoOffsets, Problem, Tensor};
//! use vecfft_planner::{PlannerFlags, Score, Solver, VrankGeq1Solver};
//!
//! let family = VrankGeq1Solver::family(&[1, -1]);
//! let problem = Problem::new(
//!     Tensor::rank0(),
//!     Tensor::from_dims(&[IoDim::new(4, 8, 8)]),
//!     IoOffsets::interleaved(0, 64),
//! )
//! .unwrap();
//!
//! // Only the first member is applicable to a single vector dimension, and a
//! // rank-0 transform with one vector loop is a last resort
//! assert_eq!(family[0].applicable(&problem), Some(0));
//! assert_eq!(family[0].score(&problem, PlannerFlags::empty()), Score::Ugly);
//! assert_eq!(family[1].score(&problem, PlannerFlags::empty()), Score::Bad);
//! ```

use crate::api::{Plan, Planner, Score, Solver, Wakefulness};
use crate::cost::{combine_cost, combine_ops, OpCount};
use crate::flags::PlannerFlags;
use crate::pickdim::pick_dim;
use std::fmt;
use std::sync::Arc;
use vecfft_core::{IoDim, IoOffsets, Problem, R};

/// Solver that loops over one vector dimension
#[derive(Debug, Clone)]
pub struct VrankGeq1Solver {
    vecloop_dim: i32,
    buddies: Arc<[i32]>,
}

impl VrankGeq1Solver {
    /// Create a solver preferring `vecloop_dim`, as a member of the `buddies` family
    pub fn new(vecloop_dim: i32, buddies: Arc<[i32]>) -> Self {
        Self {
            vecloop_dim,
            buddies,
        }
    }

    /// One solver per entry of `preferences`, all sharing the list
    pub fn family(preferences: &[i32]) -> Vec<VrankGeq1Solver> {
        let buddies: Arc<[i32]> = Arc::from(preferences);
        preferences
            .iter()
            .map(|&dim| Self::new(dim, Arc::clone(&buddies)))
            .collect()
    }

    /// Preferred dimension of this solver
    pub fn vecloop_dim(&self) -> i32 {
        self.vecloop_dim
    }

    /// Preference list shared with the rest of the family
    pub fn buddies(&self) -> &[i32] {
        &self.buddies
    }

    /// Index of the vector dimension this solver would peel, if it applies
    pub fn applicable(&self, problem: &Problem) -> Option<usize> {
        match problem.vector().rank() {
            Some(rank) if rank > 0 => pick_dim(
                self.vecloop_dim,
                &self.buddies,
                problem.vector(),
                !problem.is_in_place(),
            ),
            _ => None,
        }
    }

    /// The problem left after peeling vector dimension `vdim`
    pub fn reduce(problem: &Problem, vdim: usize) -> Option<Problem> {
        let vector = problem.vector().without_dim(vdim).ok()?;
        Some(problem.with_vector(vector))
    }

    fn is_primary(&self) -> bool {
        self.buddies.first() == Some(&self.vecloop_dim)
    }
}

impl Solver for VrankGeq1Solver {
    fn name(&self) -> String {
        format!("dft-vrank>=1/{}", self.vecloop_dim)
    }

    fn score(&self, problem: &Problem, flags: PlannerFlags) -> Score {
        let Some(vdim) = self.applicable(problem) else {
            return Score::Bad;
        };

        if flags.contains(PlannerFlags::IMPATIENT) && !self.is_primary() {
            return Score::Bad;
        }

        let vector_rank = problem.vector().dims().len();
        let core_rank = problem.core().rank();

        // once vector recursion has started, finish it unless nothing else works
        if flags.contains(PlannerFlags::FORCE_VRECURSE) && vector_rank == 1 {
            return Score::Ugly;
        }

        // a tightly nested vector stride under a multi-dimensional transform is
        // better merged with the transform loops first
        if let Some(d) = problem.vector().dim(vdim) {
            if core_rank.is_some_and(|r| r > 1) && d.min_stride() < problem.core().max_index() {
                return Score::Ugly;
            }
        }

        // rank-0 transforms with one vector loop belong to copy solvers
        if core_rank == Some(0) && vector_rank == 1 {
            return Score::Ugly;
        }

        Score::Good
    }

    fn make_plan(&self, problem: &Problem, planner: &mut dyn Planner) -> Option<Box<dyn Plan>> {
        let vdim = self.applicable(problem)?;
        let d = *problem.vector().dim(vdim)?;
        log::trace!("{}: peeling vector dim {} ({}) of {}", self.name(), vdim, d, problem);

        let flags = planner.flags_mut();
        if problem.vector().dims().len() == 1 && flags.contains(PlannerFlags::CLASSIC_VRECURSE) {
            flags.remove(PlannerFlags::CLASSIC_VRECURSE | PlannerFlags::FORCE_VRECURSE);
            log::debug!("{}: classic vector recursion consumed", self.name());
        }

        if d.len > 0 && problem.io().misaligned_after(d.istride, d.ostride) {
            flags.insert(PlannerFlags::POSSIBLY_UNALIGNED);
            log::debug!("{}: vector loop may leave buffers unaligned", self.name());
        }

        let child_problem = Self::reduce(problem, vdim)?;
        let child = planner.solve(&child_problem)?;

        Some(Box::new(LoopPlan::new(child, d, self.vecloop_dim)))
    }
}

/// Plan that runs a child once per point of a vector dimension
#[derive(Debug)]
pub struct LoopPlan {
    child: Box<dyn Plan>,
    vl: usize,
    ivs: isize,
    ovs: isize,
    vecloop_dim: i32,
    ops: OpCount,
    pcost: f64,
}

impl LoopPlan {
    /// Loop `child` over dimension `dim`; `vecloop_dim` tags the description
    pub fn new(child: Box<dyn Plan>, dim: IoDim, vecloop_dim: i32) -> Self {
        let ops = combine_ops(dim.len, child.ops());
        let pcost = combine_cost(dim.len, child.pcost());
        Self {
            child,
            vl: dim.len,
            ivs: dim.istride,
            ovs: dim.ostride,
            vecloop_dim,
            ops,
            pcost,
        }
    }

    /// Number of child executions
    pub fn iterations(&self) -> usize {
        self.vl
    }

    /// Input offset between consecutive iterations
    pub fn input_stride(&self) -> isize {
        self.ivs
    }

    /// Output offset between consecutive iterations
    pub fn output_stride(&self) -> isize {
        self.ovs
    }

    /// The plan run on each iteration
    pub fn child(&self) -> &dyn Plan {
        self.child.as_ref()
    }
}

impl Plan for LoopPlan {
    fn execute(&self, mem: &mut [R], io: IoOffsets) {
        for i in 0..self.vl as isize {
            self.child.execute(mem, io.shifted(i * self.ivs, i * self.ovs));
        }
    }

    fn awake(&mut self, wakefulness: Wakefulness) {
        self.child.awake(wakefulness);
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(dft-vrank>=1-x{}/{} ", self.vl, self.vecloop_dim)?;
        self.child.print(f)?;
        write!(f, ")")
    }

    fn ops(&self) -> OpCount {
        self.ops
    }

    fn pcost(&self) -> f64 {
        self.pcost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{CountedPlan, MockPlanner, Probe};
    use vecfft_core::Tensor;

    fn solvers() -> Vec<VrankGeq1Solver> {
        VrankGeq1Solver::family(&[1, -1])
    }

    fn problem(core: &[IoDim], vector: &[IoDim], io: IoOffsets) -> Problem {
        Problem::new(Tensor::from_dims(core), Tensor::from_dims(vector), io).unwrap()
    }

    /// Core of rank 2 spanning flat index 50
    fn core50() -> Vec<IoDim> {
        vec![IoDim::new(5, 10, 10), IoDim::new(11, 1, 1)]
    }

    fn two_vector_dims() -> Vec<IoDim> {
        vec![IoDim::new(3, 100, 100), IoDim::new(5, 1, 1)]
    }

    fn aligned_io() -> IoOffsets {
        IoOffsets::new(0, 1000, 2000, 3000)
    }

    #[test]
    fn test_family_shares_buddies() {
        let family = solvers();
        assert_eq!(family.len(), 2);
        assert_eq!(family[0].vecloop_dim(), 1);
        assert_eq!(family[1].vecloop_dim(), -1);
        assert_eq!(family[0].buddies(), family[1].buddies());
        assert_eq!(family[1].name(), "dft-vrank>=1/-1");
    }

    #[test]
    fn test_not_applicable_without_vector_dims() {
        let p = problem(&[IoDim::new(8, 1, 1)], &[], aligned_io());
        for s in solvers() {
            assert_eq!(s.applicable(&p), None);
            assert_eq!(s.score(&p, PlannerFlags::empty()), Score::Bad);
        }

        let inf = Problem::new(Tensor::rank0(), Tensor::infinite(), aligned_io()).unwrap();
        assert_eq!(solvers()[0].applicable(&inf), None);
    }

    #[test]
    fn test_rank0_single_loop_is_ugly() {
        let p = problem(&[], &[IoDim::new(4, 8, 8)], IoOffsets::interleaved(0, 64));
        let family = solvers();
        assert_eq!(family[0].applicable(&p), Some(0));
        assert_eq!(family[0].score(&p, PlannerFlags::empty()), Score::Ugly);
    }

    #[test]
    fn test_tight_vector_stride_under_multidim_core_is_ugly() {
        let p = problem(&core50(), &two_vector_dims(), aligned_io());
        assert_eq!(Tensor::from_dims(&core50()).max_index(), 50);

        let family = solvers();
        // stride 100 is outside the core span
        assert_eq!(family[0].applicable(&p), Some(0));
        assert_eq!(family[0].score(&p, PlannerFlags::empty()), Score::Good);
        // stride 1 is nested inside it
        assert_eq!(family[1].applicable(&p), Some(1));
        assert_eq!(family[1].score(&p, PlannerFlags::empty()), Score::Ugly);
    }

    #[test]
    fn test_impatient_rejects_secondary_solver() {
        let p = problem(&core50(), &two_vector_dims(), aligned_io());
        let family = solvers();
        assert_eq!(family[1].score(&p, PlannerFlags::IMPATIENT), Score::Bad);
        assert_eq!(family[0].score(&p, PlannerFlags::IMPATIENT), Score::Good);
    }

    #[test]
    fn test_force_vrecurse_on_last_dim_is_ugly() {
        let p = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(4, 8, 8)], aligned_io());
        let s = &solvers()[0];
        assert_eq!(s.score(&p, PlannerFlags::empty()), Score::Good);
        assert_eq!(s.score(&p, PlannerFlags::FORCE_VRECURSE), Score::Ugly);

        let q = problem(
            &[IoDim::new(8, 1, 1)],
            &[IoDim::new(4, 8, 8), IoDim::new(2, 32, 32)],
            aligned_io(),
        );
        assert_eq!(s.score(&q, PlannerFlags::FORCE_VRECURSE), Score::Good);
    }

    #[test]
    fn test_negative_vector_stride_counts_as_nested() {
        let p = problem(&core50(), &[IoDim::new(3, -100, -100)], aligned_io());
        assert_eq!(solvers()[0].score(&p, PlannerFlags::empty()), Score::Ugly);
    }

    #[test]
    fn test_build_reduces_vector_rank() {
        let p = problem(
            &[IoDim::new(8, 1, 1)],
            &[IoDim::new(2, 8, 8), IoDim::new(3, 16, 16), IoDim::new(4, 48, 48)],
            aligned_io(),
        );
        let mut planner = MockPlanner::new(PlannerFlags::empty());
        let plan = solvers()[1].make_plan(&p, &mut planner).unwrap();

        assert_eq!(planner.solved.len(), 1);
        let child = &planner.solved[0];
        assert_eq!(child.core(), p.core());
        assert_eq!(child.io(), p.io());
        assert_eq!(
            child.vector().dims(),
            &[IoDim::new(2, 8, 8), IoDim::new(3, 16, 16)]
        );
        assert_eq!(plan.to_string(), "(dft-vrank>=1-x4/-1 (probe))");
    }

    #[test]
    fn test_build_scales_cost() {
        let p = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(6, 8, 8)], aligned_io());
        let mut planner = MockPlanner::new(PlannerFlags::empty());
        let plan = solvers()[0].make_plan(&p, &mut planner).unwrap();

        assert_eq!(plan.ops(), planner.child_ops.scaled(6));
        assert_eq!(plan.pcost(), 6.0 * planner.child_ops.estimate_cost());
    }

    #[test]
    fn test_build_fails_when_sub_solve_fails() {
        let p = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(4, 8, 8)], aligned_io());
        let mut planner = MockPlanner::failing(PlannerFlags::empty());
        assert!(solvers()[0].make_plan(&p, &mut planner).is_none());
        assert_eq!(planner.solved.len(), 1);
    }

    #[test]
    fn test_build_inapplicable_does_not_recurse() {
        let p = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(4, 8, 8)], aligned_io());
        let mut planner = MockPlanner::new(PlannerFlags::CLASSIC_VRECURSE);
        assert!(solvers()[1].make_plan(&p, &mut planner).is_none());
        assert!(planner.solved.is_empty());
        assert_eq!(planner.flags, PlannerFlags::CLASSIC_VRECURSE);
    }

    #[test]
    fn test_classic_vrecurse_consumed_once() {
        let p = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(4, 8, 8)], aligned_io());
        let start = PlannerFlags::CLASSIC_VRECURSE
            | PlannerFlags::FORCE_VRECURSE
            | PlannerFlags::IMPATIENT;

        let mut ok = MockPlanner::new(start);
        assert!(solvers()[0].make_plan(&p, &mut ok).is_some());
        assert_eq!(ok.flags, PlannerFlags::IMPATIENT);

        let mut failing = MockPlanner::failing(start);
        assert!(solvers()[0].make_plan(&p, &mut failing).is_none());
        assert_eq!(failing.flags, PlannerFlags::IMPATIENT);
    }

    #[test]
    fn test_classic_vrecurse_kept_above_rank_one() {
        let p = problem(
            &[IoDim::new(8, 1, 1)],
            &[IoDim::new(4, 8, 8), IoDim::new(2, 32, 32)],
            aligned_io(),
        );
        let start = PlannerFlags::CLASSIC_VRECURSE | PlannerFlags::FORCE_VRECURSE;
        let mut planner = MockPlanner::new(start);
        assert!(solvers()[0].make_plan(&p, &mut planner).is_some());
        assert_eq!(planner.flags, start);
    }

    #[test]
    fn test_unaligned_stride_sets_flag() {
        let mut planner = MockPlanner::new(PlannerFlags::empty());
        let aligned = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(4, 8, 8)], aligned_io());
        solvers()[0].make_plan(&aligned, &mut planner).unwrap();
        assert!(!planner.flags.contains(PlannerFlags::POSSIBLY_UNALIGNED));

        let odd = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(4, 9, 8)], aligned_io());
        solvers()[0].make_plan(&odd, &mut planner).unwrap();
        assert!(planner.flags.contains(PlannerFlags::POSSIBLY_UNALIGNED));
    }

    #[test]
    fn test_empty_loop_never_flags_alignment() {
        let mut planner = MockPlanner::new(PlannerFlags::empty());
        let p = problem(&[IoDim::new(8, 1, 1)], &[IoDim::new(0, 3, 3)], aligned_io());
        let plan = solvers()[0].make_plan(&p, &mut planner).unwrap();
        assert!(!planner.flags.contains(PlannerFlags::POSSIBLY_UNALIGNED));

        plan.execute(&mut [], aligned_io());
        assert!(planner.probe.calls().is_empty());
        assert_eq!(plan.pcost(), 0.0);
    }

    #[test]
    fn test_loop_execution_offsets() {
        let probe = Probe::default();
        let plan = LoopPlan::new(probe.plan(OpCount::ZERO), IoDim::new(3, 8, -4), 1);
        let base = IoOffsets::new(10, 20, 100, 200);
        plan.execute(&mut [], base);

        assert_eq!(
            probe.calls(),
            vec![
                IoOffsets::new(10, 20, 100, 200),
                IoOffsets::new(18, 28, 96, 196),
                IoOffsets::new(26, 36, 92, 192),
            ]
        );
    }

    #[test]
    fn test_awake_forwards_to_child() {
        let probe = Probe::default();
        let mut plan = LoopPlan::new(probe.plan(OpCount::ZERO), IoDim::new(2, 1, 1), 1);
        plan.awake(Wakefulness::Awake);
        plan.awake(Wakefulness::Sleeping);
        assert_eq!(
            *probe.wakes.borrow(),
            vec![Wakefulness::Awake, Wakefulness::Sleeping]
        );
    }

    #[test]
    fn test_drop_destroys_child_once() {
        let probe = Probe::default();
        let plan = LoopPlan::new(probe.plan(OpCount::ZERO), IoDim::new(2, 1, 1), 1);
        assert_eq!(probe.drops(), 0);
        drop(plan);
        assert_eq!(probe.drops(), 1);
    }

    #[test]
    fn test_nested_loops_describe_and_drop() {
        let probe = Probe::default();
        let inner = LoopPlan::new(probe.plan(OpCount::ZERO), IoDim::new(5, 1, 1), -1);
        let outer = LoopPlan::new(Box::new(inner), IoDim::new(4, 5, 5), 1);

        assert_eq!(outer.iterations(), 4);
        assert_eq!(outer.child().to_string(), "(dft-vrank>=1-x5/-1 (probe))");
        let root: Box<dyn Plan> = Box::new(outer);
        assert_eq!(
            root.to_string(),
            "(dft-vrank>=1-x4/1 (dft-vrank>=1-x5/-1 (probe)))"
        );

        root.execute(&mut [], IoOffsets::default());
        assert_eq!(probe.calls().len(), 20);

        drop(root);
        assert_eq!(probe.drops(), 1);
    }

    #[test]
    fn test_nested_loops_drop_each_level_once() {
        let probe = Probe::default();
        let (leaf, leaf_drops) = CountedPlan::wrap(probe.plan(OpCount::ZERO));
        let inner: Box<dyn Plan> = Box::new(LoopPlan::new(leaf, IoDim::new(5, 1, 1), -1));
        let (inner, inner_drops) = CountedPlan::wrap(inner);
        let middle: Box<dyn Plan> = Box::new(LoopPlan::new(inner, IoDim::new(3, 5, 5), 1));
        let (middle, middle_drops) = CountedPlan::wrap(middle);
        let root: Box<dyn Plan> = Box::new(LoopPlan::new(middle, IoDim::new(2, 15, 15), 1));

        assert_eq!(
            root.to_string(),
            "(dft-vrank>=1-x2/1 (dft-vrank>=1-x3/1 (dft-vrank>=1-x5/-1 (probe))))"
        );
        root.execute(&mut [], IoOffsets::default());
        assert_eq!(probe.calls().len(), 30);

        let counters = [&leaf_drops, &inner_drops, &middle_drops];
        assert!(counters.iter().all(|c| c.get() == 0));
        drop(root);
        assert!(counters.iter().all(|c| c.get() == 1));
        assert_eq!(counters.iter().map(|c| c.get()).sum::<usize>(), 3);
        assert_eq!(probe.drops(), 1);
    }
}
