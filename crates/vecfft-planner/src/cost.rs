//! Cost model for plans
//!
//! Every plan reports an operation count ([`OpCount`]) and a scalar cost
//! estimate (`pcost`). The planner compares plans of the same tier by `pcost`.
//! Loops scale both linearly: `n` independent repetitions of a child cost `n`
//! times the child.

use std::ops::Add;

/// Floating-point operation counts of a plan
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OpCount {
    /// Additions and subtractions
    pub add: f64,
    /// Multiplications
    pub mul: f64,
    /// Fused multiply-adds
    pub fma: f64,
    /// Everything else (loads, stores, copies)
    pub other: f64,
}

impl OpCount {
    /// No operations
    pub const ZERO: OpCount = OpCount {
        add: 0.0,
        mul: 0.0,
        fma: 0.0,
        other: 0.0,
    };

    /// Create an operation count
    pub const fn new(add: f64, mul: f64, fma: f64, other: f64) -> Self {
        Self {
            add,
            mul,
            fma,
            other,
        }
    }

    /// Counts for `times` repetitions
    pub fn scaled(self, times: usize) -> Self {
        let k = times as f64;
        Self {
            add: self.add * k,
            mul: self.mul * k,
            fma: self.fma * k,
            other: self.other * k,
        }
    }

    /// Estimated cost of these operations (an FMA counts as two)
    pub fn estimate_cost(&self) -> f64 {
        self.add + self.mul + 2.0 * self.fma + self.other
    }

    /// Total number of counted operations
    pub fn total(&self) -> f64 {
        self.add + self.mul + self.fma + self.other
    }
}

impl Add for OpCount {
    type Output = OpCount;

    fn add(self, rhs: OpCount) -> OpCount {
        OpCount {
            add: self.add + rhs.add,
            mul: self.mul + rhs.mul,
            fma: self.fma + rhs.fma,
            other: self.other + rhs.other,
        }
    }
}

/// Operation count of a loop running `times` copies of a child
pub fn combine_ops(times: usize, child: OpCount) -> OpCount {
    child.scaled(times)
}

/// Cost estimate of a loop running `times` copies of a child
pub fn combine_cost(times: usize, child_cost: f64) -> f64 {
    times as f64 * child_cost
}
