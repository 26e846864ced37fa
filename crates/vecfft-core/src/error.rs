//! Error types for the tensor and problem model
//!
//! # Design
//!
//! - **`TensorError`**: structural failures of tensor helpers (bad index, infinite rank)
//! - **`ProblemError`**: invalid buffer layouts and out-of-bounds memory
//! - **`CoreError`**: top-level enum wrapping both
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{CoreError, IoDim, Tensor, TensorError};
//!
//! let t = Tensor::from_dims(&[IoDim::new(4, 1, 1)]);
//! let err: CoreError = t.without_dim(3).unwrap_err().into();
//! assert!(matches!(err, CoreError::Tensor(TensorError::DimOutOfRange { .. })));
//! ```

use thiserror::Error;

/// Top-level error type for the core model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Tensor helper errors
    #[error("Tensor error: {0}")]
    Tensor(#[from] TensorError),

    /// Problem construction or validation errors
    #[error("Problem error: {0}")]
    Problem(#[from] ProblemError),
}

/// Errors raised by tensor helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("Dimension index {index} out of range for tensor of rank {rank}")]
    DimOutOfRange { index: usize, rank: usize },

    #[error("Operation requires a tensor of finite rank")]
    InfiniteRank,
}

/// Errors raised while building or validating a problem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error(
        "In-place layout mismatch: real channels in place = {real}, imaginary channels in place = {imag}"
    )]
    InPlaceMismatch { real: bool, imag: bool },

    #[error("Problem touches element {index}, outside memory of length {len}")]
    OutOfBounds { index: isize, len: usize },

    #[error("Problem of infinite rank has no memory footprint")]
    InfiniteRank,
}
