//! Core type definitions for strided transforms.
//!
//! - [`R`]: the scalar type of each real/imaginary channel
//! - [`IoDim`]: one dimension with its input and output strides
//! - [`Tensor`]: an ordered list of dimensions, or the infinite-rank sentinel
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{IoDim, Tensor};
//!
//! // Four transforms of length 8, stored back to back
//! let core = Tensor::from_dims(&[IoDim::new(8, 1, 1)]);
//! let vector = Tensor::from_dims(&[IoDim::new(4, 8, 8)]);
//!
//! assert_eq!(core.rank(), Some(1));
//! assert_eq!(vector.max_index(), 24);
//! assert_eq!(Tensor::infinite().rank(), None);
//! ```

use crate::error::TensorError;
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar type of the split real/imaginary channels.
pub type R = f64;

/// Dimension storage; most problems have at most four dimensions per shape.
pub type Dims = SmallVec<[IoDim; 4]>;

/// A single dimension of a strided transform.
///
/// Strides are counted in elements of [`R`] and may be zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IoDim {
    /// Number of points along this dimension
    pub len: usize,
    /// Distance between consecutive input elements
    pub istride: isize,
    /// Distance between consecutive output elements
    pub ostride: isize,
}

impl IoDim {
    /// Create a dimension descriptor
    pub const fn new(len: usize, istride: isize, ostride: isize) -> Self {
        Self {
            len,
            istride,
            ostride,
        }
    }

    /// Smaller of the two strides (signed)
    pub fn min_stride(&self) -> isize {
        self.istride.min(self.ostride)
    }

    /// Whether input and output share the same stride along this dimension
    pub fn same_strides(&self) -> bool {
        self.istride == self.ostride
    }
}

impl fmt::Display for IoDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.len, self.istride, self.ostride)
    }
}

/// An ordered sequence of dimensions.
///
/// A tensor may instead be the infinite-rank sentinel, which stands for an
/// unknown or unsolvable shape. Helpers that need concrete dimensions reject it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tensor {
    dims: Dims,
    finite: bool,
}

impl Tensor {
    /// Create a tensor from any sequence of dimensions
    pub fn new<I>(dims: I) -> Self
    where
        I: IntoIterator<Item = IoDim>,
    {
        Self {
            dims: dims.into_iter().collect(),
            finite: true,
        }
    }

    /// Create a tensor from a slice of dimensions
    pub fn from_dims(dims: &[IoDim]) -> Self {
        Self::new(dims.iter().copied())
    }

    /// The rank-0 tensor (a single point)
    pub fn rank0() -> Self {
        Self::new(std::iter::empty())
    }

    /// The infinite-rank sentinel
    pub fn infinite() -> Self {
        Self {
            dims: Dims::new(),
            finite: false,
        }
    }

    /// Number of dimensions, or `None` for the infinite-rank sentinel
    pub fn rank(&self) -> Option<usize> {
        self.finite.then_some(self.dims.len())
    }

    /// Whether this tensor has a finite rank
    pub fn is_finite(&self) -> bool {
        self.finite
    }

    /// All dimensions in order (empty for the sentinel)
    pub fn dims(&self) -> &[IoDim] {
        &self.dims
    }

    /// Dimension at `index`, if any
    pub fn dim(&self, index: usize) -> Option<&IoDim> {
        self.dims.get(index)
    }

    /// Copy of this tensor with the dimension at `index` removed.
    ///
    /// The remaining dimensions keep their relative order.
    pub fn without_dim(&self, index: usize) -> Result<Tensor, TensorError> {
        if !self.finite {
            return Err(TensorError::InfiniteRank);
        }
        if index >= self.dims.len() {
            return Err(TensorError::DimOutOfRange {
                index,
                rank: self.dims.len(),
            });
        }

        let dims = self
            .dims
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, d)| *d);
        Ok(Tensor::new(dims))
    }

    /// Largest flat offset spanned on either side.
    ///
    /// Computed as `max(sum (n-1)*|istride|, sum (n-1)*|ostride|)`. Rank-0 and
    /// sentinel tensors span nothing and return 0.
    pub fn max_index(&self) -> isize {
        let (ni, no) = self.dims.iter().fold((0isize, 0isize), |(ni, no), d| {
            let steps = d.len as isize - 1;
            (ni + steps * d.istride.abs(), no + steps * d.ostride.abs())
        });
        ni.max(no)
    }

    /// Number of points (product of lengths; 1 for rank 0)
    pub fn total_size(&self) -> usize {
        self.dims.iter().map(|d| d.len).product()
    }

    /// Range of offsets `[lo, hi]` reached on the input side, `None` if empty
    pub fn input_span(&self) -> Option<(isize, isize)> {
        self.span(|d| d.istride)
    }

    /// Range of offsets `[lo, hi]` reached on the output side, `None` if empty
    pub fn output_span(&self) -> Option<(isize, isize)> {
        self.span(|d| d.ostride)
    }

    fn span(&self, stride: impl Fn(&IoDim) -> isize) -> Option<(isize, isize)> {
        if self.dims.iter().any(|d| d.len == 0) {
            return None;
        }
        let mut lo = 0isize;
        let mut hi = 0isize;
        for d in &self.dims {
            let reach = (d.len as isize - 1) * stride(d);
            if reach < 0 {
                lo += reach;
            } else {
                hi += reach;
            }
        }
        Some((lo, hi))
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Self::rank0()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.finite {
            return write!(f, "[inf]");
        }
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}
