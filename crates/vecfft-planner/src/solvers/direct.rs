//! Direct transforms: a naive O(n²) DFT over all core dimensions
//!
//! [`DirectSolver`] handles one transform at a time (vector rank 0) of any
//! finite core rank. It evaluates the full sum for every output point, so it
//! is only meant as the leaf the vector loops delegate to.

use super::at;
use crate::api::{Plan, Planner, Score, Solver, Wakefulness};
use crate::cost::OpCount;
use crate::flags::PlannerFlags;
use std::f64::consts::PI;
use std::fmt;
use vecfft_core::{IoDim, IoOffsets, Problem, R};

/// Solver producing naive forward DFT plans
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSolver;

impl DirectSolver {
    /// Create the solver
    pub fn new() -> Self {
        Self
    }

    /// Whether the problem is a single transform of rank ≥ 1
    pub fn applicable(&self, problem: &Problem) -> bool {
        problem.core().rank().is_some_and(|r| r > 0) && problem.vector().rank() == Some(0)
    }
}

impl Solver for DirectSolver {
    fn name(&self) -> String {
        "dft-direct".to_string()
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
        Some(Box::new(DirectPlan::new(problem.core().dims())))
    }
}

/// Per-dimension tables of `exp(-2πi m / n)`
fn twiddle_tables(lens: &[usize]) -> Vec<Vec<(R, R)>> {
    lens.iter()
        .map(|&n| {
            (0..n)
                .map(|m| {
                    let theta = 2.0 * PI * m as R / n as R;
                    (theta.cos(), -theta.sin())
                })
                .collect()
        })
        .collect()
}

/// Naive multi-dimensional forward DFT over strided split-complex data
#[derive(Debug)]
pub struct DirectPlan {
    lens: Vec<usize>,
    /// Row-major coordinates of every point
    coords: Vec<Vec<usize>>,
    in_offsets: Vec<isize>,
    out_offsets: Vec<isize>,
    /// Present only while awake
    twiddles: Option<Vec<Vec<(R, R)>>>,
}

impl DirectPlan {
    /// Plan a transform over `dims`
    pub fn new(dims: &[IoDim]) -> Self {
        let lens: Vec<usize> = dims.iter().map(|d| d.len).collect();
        let total: usize = lens.iter().product();

        let mut coords = Vec::with_capacity(total);
        let mut in_offsets = Vec::with_capacity(total);
        let mut out_offsets = Vec::with_capacity(total);
        let mut current = vec![0usize; dims.len()];
        for _ in 0..total {
            let (i, o) = dims
                .iter()
                .zip(&current)
                .fold((0isize, 0isize), |(i, o), (d, &k)| {
                    (i + k as isize * d.istride, o + k as isize * d.ostride)
                });
            coords.push(current.clone());
            in_offsets.push(i);
            out_offsets.push(o);

            // odometer increment, last dimension fastest
            for axis in (0..dims.len()).rev() {
                current[axis] += 1;
                if current[axis] < lens[axis] {
                    break;
                }
                current[axis] = 0;
            }
        }

        Self {
            lens,
            coords,
            in_offsets,
            out_offsets,
            twiddles: None,
        }
    }

    /// Number of points in the transform
    pub fn size(&self) -> usize {
        self.coords.len()
    }

    fn transform(&self, mem: &mut [R], io: IoOffsets, twiddles: &[Vec<(R, R)>]) {
        let xr: Vec<R> = self.in_offsets.iter().map(|&o| mem[at(io.ri + o)]).collect();
        let xi: Vec<R> = self.in_offsets.iter().map(|&o| mem[at(io.ii + o)]).collect();

        for (kc, &out) in self.coords.iter().zip(&self.out_offsets) {
            let (mut sr, mut si) = (0.0, 0.0);
            for (j, jc) in self.coords.iter().enumerate() {
                let (mut wr, mut wi) = (1.0, 0.0);
                for (axis, &n) in self.lens.iter().enumerate() {
                    let (tr, ti) = twiddles[axis][(kc[axis] * jc[axis]) % n];
                    (wr, wi) = (wr * tr - wi * ti, wr * ti + wi * tr);
                }
                sr += xr[j] * wr - xi[j] * wi;
                si += xr[j] * wi + xi[j] * wr;
            }
            mem[at(io.ro + out)] = sr;
            mem[at(io.io + out)] = si;
        }
    }
}

impl Plan for DirectPlan {
    fn execute(&self, mem: &mut [R], io: IoOffsets) {
        match &self.twiddles {
            Some(tables) => self.transform(mem, io, tables),
            None => self.transform(mem, io, &twiddle_tables(&self.lens)),
        }
    }

    fn awake(&mut self, wakefulness: Wakefulness) {
        self.twiddles = match wakefulness {
            Wakefulness::Awake => Some(twiddle_tables(&self.lens)),
            Wakefulness::Sleeping => None,
        };
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(dft-direct-")?;
        for (i, n) in self.lens.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{}", n)?;
        }
        write!(f, ")")
    }

    fn ops(&self) -> OpCount {
        let n = self.size() as f64;
        // one complex multiply-add per (input, output) pair, plus loads and stores
        OpCount::new(4.0 * n * n, 4.0 * n * n, 0.0, 4.0 * n)
    }

    fn pcost(&self) -> f64 {
        self.ops().estimate_cost()
    }
}
