//! Transform problems: a core shape repeated over a vector shape.
//!
//! A [`Problem`] never changes once built. Reductions (such as peeling one
//! vector dimension off) produce new problems that share the same buffer
//! offsets.
//!
//! Buffers are modeled as element offsets into one caller-owned memory arena.
//! Two channels with the same offset are the same buffer, so a problem is in
//! place exactly when its real input and real output offsets coincide.
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{IoDim, IoOffsets, Problem, Tensor};
//!
//! let problem = Problem::new(
//!     Tensor::from_dims(&[IoDim::new(8, 2, 2)]),
//!     Tensor::from_dims(&[IoDim::new(4, 16, 16)]),
//!     IoOffsets::interleaved(0, 64),
//! )
//! .unwrap();
//!
//! assert!(!problem.is_in_place());
//! assert_eq!(problem.index_bounds(), Some((0, 64 + 3 * 16 + 7 * 2 + 1)));
//! ```

use crate::error::ProblemError;
use crate::types::{Tensor, R};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Alignment (in bytes) that vectorized kernels expect of their buffers
pub const ALIGNMENT: usize = 16;

/// Misalignment of an element offset, in bytes.
///
/// Assumes the memory arena itself starts on an [`ALIGNMENT`] boundary. Only
/// the zero/non-zero distinction is meaningful to callers.
pub fn alignment_of(offset: isize) -> usize {
    let bytes = offset.wrapping_mul(std::mem::size_of::<R>() as isize);
    bytes.rem_euclid(ALIGNMENT as isize) as usize
}

/// Offsets of the four split-complex channels within the memory arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IoOffsets {
    /// Real part of the input
    pub ri: isize,
    /// Imaginary part of the input
    pub ii: isize,
    /// Real part of the output
    pub ro: isize,
    /// Imaginary part of the output
    pub io: isize,
}

impl IoOffsets {
    /// Create offsets for explicitly placed channels
    pub const fn new(ri: isize, ii: isize, ro: isize, io: isize) -> Self {
        Self { ri, ii, ro, io }
    }

    /// Offsets for interleaved complex data (imaginary part right after the real part)
    pub const fn interleaved(input: isize, output: isize) -> Self {
        Self::new(input, input + 1, output, output + 1)
    }

    /// Offsets with inputs moved by `input_delta` and outputs by `output_delta`
    pub const fn shifted(self, input_delta: isize, output_delta: isize) -> Self {
        Self {
            ri: self.ri + input_delta,
            ii: self.ii + input_delta,
            ro: self.ro + output_delta,
            io: self.io + output_delta,
        }
    }

    /// Whether any channel, moved by the given strides, leaves the alignment boundary
    pub fn misaligned_after(&self, istride: isize, ostride: isize) -> bool {
        alignment_of(self.ri + istride) != 0
            || alignment_of(self.ii + istride) != 0
            || alignment_of(self.ro + ostride) != 0
            || alignment_of(self.io + ostride) != 0
    }
}

impl fmt::Display for IoOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} -> {}/{}", self.ri, self.ii, self.ro, self.io)
    }
}

/// A complex transform described by its core shape and vector (batch) shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Problem {
    core: Tensor,
    vector: Tensor,
    io: IoOffsets,
}

impl Problem {
    /// Create a problem.
    ///
    /// Fails when only one of the two channel pairs is in place.
    pub fn new(core: Tensor, vector: Tensor, io: IoOffsets) -> Result<Self, ProblemError> {
        let real = io.ri == io.ro;
        let imag = io.ii == io.io;
        if real != imag {
            return Err(ProblemError::InPlaceMismatch { real, imag });
        }
        Ok(Self { core, vector, io })
    }

    /// Transform dimensions
    pub fn core(&self) -> &Tensor {
        &self.core
    }

    /// Batch dimensions
    pub fn vector(&self) -> &Tensor {
        &self.vector
    }

    /// Channel offsets
    pub fn io(&self) -> IoOffsets {
        self.io
    }

    /// Whether input and output are the same buffer
    pub fn is_in_place(&self) -> bool {
        self.io.ri == self.io.ro
    }

    /// A problem with the same core shape and buffers but a different vector shape
    pub fn with_vector(&self, vector: Tensor) -> Problem {
        Problem {
            core: self.core.clone(),
            vector,
            io: self.io,
        }
    }

    /// Inclusive range of element offsets this problem may read or write.
    ///
    /// Returns `None` when the problem touches no memory (some length is zero).
    pub fn index_bounds(&self) -> Option<(isize, isize)> {
        let (cil, cih) = self.core.input_span()?;
        let (col, coh) = self.core.output_span()?;
        let (vil, vih) = self.vector.input_span()?;
        let (vol, voh) = self.vector.output_span()?;

        let (in_lo, in_hi) = (cil + vil, cih + vih);
        let (out_lo, out_hi) = (col + vol, coh + voh);

        let io = self.io;
        let lo = [io.ri + in_lo, io.ii + in_lo, io.ro + out_lo, io.io + out_lo]
            .into_iter()
            .min()?;
        let hi = [io.ri + in_hi, io.ii + in_hi, io.ro + out_hi, io.io + out_hi]
            .into_iter()
            .max()?;
        Some((lo, hi))
    }

    /// Check that every offset this problem may touch lies within `0..len`
    pub fn check_memory(&self, len: usize) -> Result<(), ProblemError> {
        if !self.core.is_finite() || !self.vector.is_finite() {
            return Err(ProblemError::InfiniteRank);
        }
        let Some((lo, hi)) = self.index_bounds() else {
            return Ok(());
        };
        if lo < 0 {
            return Err(ProblemError::OutOfBounds { index: lo, len });
        }
        if hi >= len as isize {
            return Err(ProblemError::OutOfBounds { index: hi, len });
        }
        Ok(())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dft(core={}, vec={}, io={})", self.core, self.vector, self.io)
    }
}
