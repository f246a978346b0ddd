//! Dispatch layer: one state machine pass per call.
//!
//! Every call walks `Init -> FullLanePass -> TailPass -> Done`:
//!
//! - `Init` validates the op's domain and the operand lengths (no byte of
//!   the output is written before validation passes, so a failed call
//!   leaves `out` untouched), then selects the lane descriptor for the
//!   element type. The whole range goes to the scalar kernel when the
//!   platform has no vector level, the array is shorter than one lane, any
//!   operand is non-contiguous or not lane-aligned, or the (op, type) pair
//!   has no hardware kernel — fallback is per call, never per lane.
//! - `FullLanePass`/`TailPass` live inside the vector kernel: full lanes
//!   with unmasked loads, then one hardware-masked pass over the remainder.
//! - A zero-length elementwise call goes straight to `Done`; a zero-length
//!   reduction returns the op's declared identity, or
//!   [`KernelError::EmptyReductionUndefined`] when there is none.
//!
//! The engine holds no mutable state besides the write-once capability
//! probe, so concurrent calls on disjoint views need no synchronization.

use crate::dtype::KernelElement;
use crate::error::{KernelError, Result};
use crate::lane::LaneDescriptor;
use crate::op::Op;
use crate::scalar;
use crate::view::{NumView, NumViewMut};

#[inline]
fn lane_aligned<T>(s: &[T], alignment: usize) -> bool {
    (s.as_ptr() as usize) % alignment == 0
}

/// Apply an elementwise operation: `out[i] = op(a[i], b[i])` for every
/// index (`fma` additionally reads `out[i]` as the accumulator).
///
/// All three views must have equal length. Fails with
/// [`KernelError::LengthMismatch`] on length disagreement and
/// [`KernelError::TypeMismatch`] when the element type is outside the op's
/// domain; on error the output buffer is untouched.
pub fn apply<T: KernelElement>(
    op: Op,
    a: &NumView<'_, T>,
    b: &NumView<'_, T>,
    out: &mut NumViewMut<'_, T>,
) -> Result<()> {
    if op.is_reduction() {
        return Err(KernelError::UnsupportedOp(format!(
            "`{op}` is a reduction; use `reduce`"
        )));
    }
    if !op.supports(T::ELEMENT) {
        return Err(KernelError::TypeMismatch(format!(
            "operation `{op}` does not accept {} operands",
            T::ELEMENT
        )));
    }
    if a.len() != b.len() {
        return Err(KernelError::LengthMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    if a.len() != out.len() {
        return Err(KernelError::LengthMismatch {
            expected: a.len(),
            got: out.len(),
        });
    }

    let desc = LaneDescriptor::detect(T::ELEMENT);
    if desc.lane_width > 1 && a.len() >= desc.lane_width {
        if let (Some(ax), Some(bx)) = (a.as_slice(), b.as_slice()) {
            if lane_aligned(ax, desc.alignment) && lane_aligned(bx, desc.alignment) {
                if let Some(ox) = out.as_mut_slice() {
                    if lane_aligned(ox, desc.alignment) && T::simd_elementwise(op, ax, bx, ox) {
                        return Ok(());
                    }
                }
            }
        }
    }

    scalar::elementwise(op, a, b, out);
    Ok(())
}

/// Reduce a view to a single scalar.
///
/// A zero-length view yields the op's declared identity (0 for
/// `sum-reduce`) or [`KernelError::EmptyReductionUndefined`] when the op
/// declares none (`max-reduce`, `min-reduce`).
pub fn reduce<T: KernelElement>(op: Op, a: &NumView<'_, T>) -> Result<T> {
    if !op.is_reduction() {
        return Err(KernelError::UnsupportedOp(format!(
            "`{op}` is not a reduction; use `apply`"
        )));
    }
    if !op.supports(T::ELEMENT) {
        return Err(KernelError::TypeMismatch(format!(
            "operation `{op}` does not accept {} operands",
            T::ELEMENT
        )));
    }
    if a.is_empty() {
        return op
            .identity::<T>()
            .ok_or(KernelError::EmptyReductionUndefined(op.name()));
    }

    let desc = LaneDescriptor::detect(T::ELEMENT);
    if desc.lane_width > 1 && a.len() >= desc.lane_width {
        if let Some(ax) = a.as_slice() {
            if lane_aligned(ax, desc.alignment) {
                if let Some(v) = T::simd_reduce(op, ax) {
                    return Ok(v);
                }
            }
        }
    }

    Ok(scalar::reduce(op, a))
}
