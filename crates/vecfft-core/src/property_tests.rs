//! Property-based tests for the tensor and problem model
//!
//! These tests use `proptest` to check the structural invariants that the
//! planner relies on when it peels dimensions off a problem.

#[cfg(test)]
mod tests {
    use crate::{alignment_of, IoDim, IoOffsets, Problem, Tensor, ALIGNMENT};
    use proptest::prelude::*;

    fn dim_strategy() -> impl Strategy<Value = IoDim> {
        (0usize..8, -64isize..64, -64isize..64).prop_map(|(n, is, os)| IoDim::new(n, is, os))
    }

    fn tensor_strategy() -> impl Strategy<Value = Tensor> {
        prop::collection::vec(dim_strategy(), 0..=5).prop_map(Tensor::new)
    }

    proptest! {
        /// Removing a dimension drops exactly that dimension and keeps the rest in order
        #[test]
        fn prop_without_dim_reduces_rank(t in tensor_strategy(), pick in 0usize..5) {
            let rank = t.rank().unwrap();
            prop_assume!(rank > 0);
            let index = pick % rank;

            let reduced = t.without_dim(index).unwrap();
            prop_assert_eq!(reduced.rank(), Some(rank - 1));

            let mut expected: Vec<IoDim> = t.dims().to_vec();
            expected.remove(index);
            prop_assert_eq!(reduced.dims(), expected.as_slice());
        }

        /// Out-of-range removal always fails
        #[test]
        fn prop_without_dim_out_of_range(t in tensor_strategy(), extra in 0usize..3) {
            let rank = t.rank().unwrap();
            prop_assert!(t.without_dim(rank + extra).is_err());
        }

        /// max_index bounds both spans
        #[test]
        fn prop_max_index_bounds_spans(t in tensor_strategy()) {
            if let (Some((ilo, ihi)), Some((olo, ohi))) = (t.input_span(), t.output_span()) {
                let max = t.max_index();
                prop_assert!(ihi - ilo <= max);
                prop_assert!(ohi - olo <= max);
            }
        }

        /// Alignment is always below the boundary and periodic in the element size
        #[test]
        fn prop_alignment_range(offset in -10_000isize..10_000) {
            let a = alignment_of(offset);
            prop_assert!(a < ALIGNMENT);
            prop_assert_eq!(a, alignment_of(offset + 2));
        }

        /// Reduced problems share the core shape and buffers
        #[test]
        fn prop_reduction_keeps_core(core in tensor_strategy(), vector in tensor_strategy()) {
            prop_assume!(vector.rank().unwrap() > 0);
            let p = Problem::new(core, vector, IoOffsets::interleaved(0, 1000)).unwrap();
            let reduced = p.with_vector(p.vector().without_dim(0).unwrap());

            prop_assert_eq!(reduced.core(), p.core());
            prop_assert_eq!(reduced.io(), p.io());
            prop_assert_eq!(reduced.is_in_place(), p.is_in_place());
        }
    }
}
