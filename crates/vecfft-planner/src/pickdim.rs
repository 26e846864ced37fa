//! Vector dimension selection
//!
//! A preference value names which vector dimension a solver wants to loop over:
//!
//! - `k > 0`: the `k`-th admissible dimension counting from the front
//! - `k < 0`: the `|k|`-th admissible dimension counting from the back
//! - `0`: the middle dimension, if admissible
//!
//! A dimension is admissible when the transform is out of place, or when its
//! input and output strides agree (an in-place loop with differing strides
//! would overwrite data it has not read yet).
//!
//! Solvers of one family share a preference list ("buddies"). [`pick_dim`]
//! refuses a choice that an earlier buddy would already make, so the family
//! never produces the same plan twice.
//!
//! Selection is a pure function of its arguments.
//!
//! # Examples
//!
//! ```
//! use vecfft_core::{IoDim, Tensor};
//! use vecfft_planner::pick_dim;
//!
//! let vector = Tensor::from_dims(&[IoDim::new(3, 100, 100), IoDim::new(5, 1, 1)]);
//!
//! assert_eq!(pick_dim(1, &[1, -1], &vector, true), Some(0));
//! assert_eq!(pick_dim(-1, &[1, -1], &vector, true), Some(1));
//!
//! // With a single dimension, the reversed preference defers to its buddy
//! let single = Tensor::from_dims(&[IoDim::new(4, 8, 8)]);
//! assert_eq!(pick_dim(1, &[1, -1], &single, true), Some(0));
//! assert_eq!(pick_dim(-1, &[1, -1], &single, true), None);
//! ```

use vecfft_core::Tensor;

/// Dimension chosen by preference `which`, ignoring buddies
pub fn select_dim(which: i32, vector: &Tensor, out_of_place: bool) -> Option<usize> {
    let dims = vector.dims();
    let admissible = |i: &usize| out_of_place || dims[*i].same_strides();

    if which > 0 {
        (0..dims.len())
            .filter(admissible)
            .nth(which as usize - 1)
    } else if which < 0 {
        (0..dims.len())
            .rev()
            .filter(admissible)
            .nth(which.unsigned_abs() as usize - 1)
    } else {
        let middle = dims.len().checked_sub(1)? / 2;
        admissible(&middle).then_some(middle)
    }
}

/// Dimension chosen by preference `which`, unless an earlier buddy picks the same one.
///
/// Buddies are scanned in order up to the first entry equal to `which`; any
/// buddy before it that selects the same dimension takes precedence.
pub fn pick_dim(which: i32, buddies: &[i32], vector: &Tensor, out_of_place: bool) -> Option<usize> {
    let chosen = select_dim(which, vector, out_of_place)?;

    let shadowed = buddies
        .iter()
        .take_while(|&&buddy| buddy != which)
        .any(|&buddy| select_dim(buddy, vector, out_of_place) == Some(chosen));

    if shadowed {
        None
    } else {
        Some(chosen)
    }
}
