//! # vecfft-planner
//!
//! Solver-based planning for batched complex transforms.
//!
//! A problem is a core transform repeated over a vector (batch) shape. The
//! planner searches a registry of solvers for the best executable plan, and
//! solvers may recursively ask the planner for plans of smaller problems.
//!
//! ## Features
//!
//! - **Vector loops**: [`VrankGeq1Solver`] peels one batch dimension at a time
//!   into a [`LoopPlan`], delegating the rest back to the planner
//! - **Tiered search**: solvers rank problems as `Good`, `Ugly` or `Bad`, and
//!   ties within a tier are broken by estimated cost
//! - **Session flags**: [`PlannerFlags`] carry hints between solvers of one session
//! - **Memoization**: [`SolverMemo`] remembers the winning solver per problem
//!
//! ## Quick Start
//!
//! ```
//! use vecfft_core::{IoDim, IoOffsets, Problem, Tensor};
//! use vecfft_planner::{plan_dft, PlannerConfig};
//!
//! // Four transforms of length 8, split real/imaginary storage, out of place
//! let problem = Problem::new(
//!     Tensor::from_dims(&[IoDim::new(8, 1, 1)]),
//!     Tensor::from_dims(&[IoDim::new(4, 8, 8)]),
//!     IoOffsets::new(0, 32, 64, 96),
//! )
//! .unwrap();
//!
//! let plan = plan_dft(&problem, &PlannerConfig::default()).unwrap();
//! assert_eq!(plan.describe(), "(dft-vrank>=1-x4/1 (dft-direct-8))");
//!
//! let mut mem = vec![0.0; 128];
//! plan.execute(&mut mem).unwrap();
//! ```
//!
//! ## Solvers
//!
//! - [`VrankGeq1Solver`]: any problem with vector rank ≥ 1
//! - [`DirectSolver`]: a single transform of core rank ≥ 1
//! - [`Rank0Solver`]: a single point

#![deny(warnings)]

pub mod api;
pub mod cost;
pub mod flags;
pub mod memo;
pub mod pickdim;
pub mod planner;
pub mod solvers;

#[cfg(test)]
mod test_util;

// Re-exports
pub use api::*;
pub use cost::*;
pub use flags::*;
pub use memo::*;
pub use pickdim::*;
pub use planner::*;
pub use solvers::*;
