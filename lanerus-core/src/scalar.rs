//! Scalar reference kernels.
//!
//! These are the correctness baseline: one element at a time, index order
//! `0..len`, stride-aware. Integer arithmetic wraps (see
//! [`crate::dtype::KernelElement`]), so integer results are bit-identical to
//! the vector kernels. Reductions fold left-to-right from the accumulator
//! seed; the vector path uses a lane-striped order instead, so
//! floating-point reduction results may differ between the two paths within
//! ordinary rounding.
//!
//! Preconditions (lengths, op domain) are checked by the dispatch layer
//! before these functions run.

use crate::dtype::KernelElement;
use crate::op::Op;
use crate::view::{NumView, NumViewMut};

/// Apply an elementwise op to each index independently.
pub(crate) fn elementwise<T: KernelElement>(
    op: Op,
    a: &NumView<'_, T>,
    b: &NumView<'_, T>,
    out: &mut NumViewMut<'_, T>,
) {
    debug_assert!(!op.is_reduction());
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let len = a.len();
    match op {
        Op::Add => {
            for i in 0..len {
                out.set(i, a.get(i).add(b.get(i)));
            }
        }
        Op::Sub => {
            for i in 0..len {
                out.set(i, a.get(i).sub(b.get(i)));
            }
        }
        Op::Mul => {
            for i in 0..len {
                out.set(i, a.get(i).mul(b.get(i)));
            }
        }
        Op::Fma => {
            for i in 0..len {
                out.set(i, a.get(i).mul_add(b.get(i), out.get(i)));
            }
        }
        Op::SumReduce | Op::MaxReduce | Op::MinReduce => unreachable!("reduction in elementwise"),
    }
}

/// Reduce a non-empty view to a single scalar, folding in index order.
pub(crate) fn reduce<T: KernelElement>(op: Op, a: &NumView<'_, T>) -> T {
    debug_assert!(op.is_reduction());
    debug_assert!(!a.is_empty());
    let len = a.len();
    match op {
        Op::SumReduce => {
            let mut acc = T::zero();
            for i in 0..len {
                acc = acc.add(a.get(i));
            }
            acc
        }
        Op::MaxReduce => {
            let mut acc = T::max_seed();
            for i in 0..len {
                acc = acc.max(a.get(i));
            }
            acc
        }
        Op::MinReduce => {
            let mut acc = T::min_seed();
            for i in 0..len {
                acc = acc.min(a.get(i));
            }
            acc
        }
        _ => unreachable!("elementwise op in reduce"),
    }
}
