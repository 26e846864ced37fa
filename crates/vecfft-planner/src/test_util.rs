//! Probes and mock planners shared by unit and property tests

#![allow(dead_code)]

use crate::api::{Plan, Planner, Wakefulness};
use crate::cost::OpCount;
use crate::flags::PlannerFlags;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use vecfft_core::{IoOffsets, Problem, R};

/// Shared record of everything that happened to probe plans
#[derive(Debug, Default, Clone)]
pub(crate) struct Probe {
    pub(crate) calls: Rc<RefCell<Vec<IoOffsets>>>,
    pub(crate) wakes: Rc<RefCell<Vec<Wakefulness>>>,
    pub(crate) drops: Rc<Cell<usize>>,
}

impl Probe {
    pub(crate) fn plan(&self, ops: OpCount) -> Box<dyn Plan> {
        Box::new(ProbePlan {
            probe: self.clone(),
            ops,
        })
    }

    pub(crate) fn calls(&self) -> Vec<IoOffsets> {
        self.calls.borrow().clone()
    }

    pub(crate) fn drops(&self) -> usize {
        self.drops.get()
    }
}

/// Leaf plan that records its executions, wake events and drops
#[derive(Debug)]
pub(crate) struct ProbePlan {
    probe: Probe,
    ops: OpCount,
}

impl Plan for ProbePlan {
    fn execute(&self, _mem: &mut [R], io: IoOffsets) {
        self.probe.calls.borrow_mut().push(io);
    }

    fn awake(&mut self, wakefulness: Wakefulness) {
        self.probe.wakes.borrow_mut().push(wakefulness);
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(probe)")
    }

    fn ops(&self) -> OpCount {
        self.ops
    }

    fn pcost(&self) -> f64 {
        self.ops.estimate_cost()
    }
}

impl Drop for ProbePlan {
    fn drop(&mut self) {
        self.probe.drops.set(self.probe.drops.get() + 1);
    }
}

/// Pass-through plan that counts how often it is dropped
#[derive(Debug)]
pub(crate) struct CountedPlan {
    child: Box<dyn Plan>,
    drops: Rc<Cell<usize>>,
}

impl CountedPlan {
    /// Wrap `child`; the returned counter is bumped when the wrapper drops
    pub(crate) fn wrap(child: Box<dyn Plan>) -> (Box<dyn Plan>, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        let plan = Box::new(CountedPlan {
            child,
            drops: Rc::clone(&drops),
        });
        (plan, drops)
    }
}

impl Plan for CountedPlan {
    fn execute(&self, mem: &mut [R], io: IoOffsets) {
        self.child.execute(mem, io);
    }

    fn awake(&mut self, wakefulness: Wakefulness) {
        self.child.awake(wakefulness);
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.child.print(f)
    }

    fn ops(&self) -> OpCount {
        self.child.ops()
    }

    fn pcost(&self) -> f64 {
        self.child.pcost()
    }
}

impl Drop for CountedPlan {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Planner that answers every sub-problem with a probe plan (or nothing)
#[derive(Debug)]
pub(crate) struct MockPlanner {
    pub(crate) flags: PlannerFlags,
    pub(crate) solved: Vec<Problem>,
    pub(crate) probe: Probe,
    pub(crate) succeed: bool,
    pub(crate) child_ops: OpCount,
}

impl MockPlanner {
    pub(crate) fn new(flags: PlannerFlags) -> Self {
        Self {
            flags,
            solved: Vec::new(),
            probe: Probe::default(),
            succeed: true,
            child_ops: OpCount::new(10.0, 6.0, 0.0, 2.0),
        }
    }

    pub(crate) fn failing(flags: PlannerFlags) -> Self {
        Self {
            succeed: false,
            ..Self::new(flags)
        }
    }
}

impl Planner for MockPlanner {
    fn flags(&self) -> PlannerFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut PlannerFlags {
        &mut self.flags
    }

    fn solve(&mut self, problem: &Problem) -> Option<Box<dyn Plan>> {
        self.solved.push(problem.clone());
        self.succeed.then(|| self.probe.plan(self.child_ops))
    }
}
