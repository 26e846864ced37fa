//! # vecfft-core
//!
//! Tensor and problem model for the VecFFT transform planner.
//!
//! This crate holds the immutable descriptions that planners and solvers pass around:
//!
//! - **Dimension descriptors** ([`IoDim`]) carrying a length plus input and output strides
//! - **Tensors** ([`Tensor`]) as ordered dimension lists, with an infinite-rank sentinel
//! - **Problems** ([`Problem`]) pairing a core (transform) shape with a vector (batch) shape
//! - **Buffer offsets** ([`IoOffsets`]) locating the split-complex channels in memory
//!
//! ## Memory Model
//!
//! Transforms operate on one caller-owned slice of [`R`]. Each of the four channels
//! (input real/imaginary, output real/imaginary) is an offset into that slice, and
//! strides are counted in elements. Identical offsets denote identical buffers.
//!
//! ## Quick Start
//!
//! ```
//! use vecfft_core::{IoDim, IoOffsets, Problem, Tensor};
//!
//! // Three interleaved complex transforms of length 16, out of place
//! let problem = Problem::new(
//!     Tensor::from_dims(&[IoDim::new(16, 2, 2)]),
//!     Tensor::from_dims(&[IoDim::new(3, 32, 32)]),
//!     IoOffsets::interleaved(0, 96),
//! )
//! .unwrap();
//!
//! let reduced = problem.with_vector(problem.vector().without_dim(0).unwrap());
//! assert_eq!(reduced.vector().rank(), Some(0));
//! assert_eq!(reduced.core(), problem.core());
//! ```

#![deny(warnings)]

pub mod error;
pub mod problem;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use error::*;
pub use problem::*;
pub use types::*;
