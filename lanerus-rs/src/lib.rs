//! # Lanerus
//!
//! User-facing surface of the lane-aware numeric kernel engine.
//!
//! The typed engine lives in `lanerus-core` and is re-exported here. This
//! crate adds the dynamically typed call surface: operand views tagged with
//! their element type at runtime ([`AnyView`] / [`AnyViewMut`]) and a
//! string-named [`apply`] entry point.
//!
//! ```
//! use lanerus_rs::{apply, AnyView, AnyViewMut};
//!
//! let a = [1.0f32, 2.0, 3.0];
//! let b = [10.0f32, 20.0, 30.0];
//! let mut out = [0.0f32; 3];
//! apply(
//!     "add",
//!     &AnyView::from(&a[..]),
//!     Some(&AnyView::from(&b[..])),
//!     &mut AnyViewMut::from(&mut out[..]),
//! )
//! .unwrap();
//! assert_eq!(out, [11.0, 22.0, 33.0]);
//!
//! // Reductions write their scalar result to a length-1 output view.
//! let mut sum = [0.0f32];
//! apply("sum-reduce", &AnyView::from(&a[..]), None, &mut AnyViewMut::from(&mut sum[..])).unwrap();
//! assert_eq!(sum[0], 6.0);
//! ```

pub use lanerus_core::{
    AlignedBuf, ElementType, KernelElement, KernelError, LaneDescriptor, NumView, NumViewMut, Op,
    Result, SimdLevel,
};

/// A read-only operand view tagged with its element type at runtime.
#[derive(Debug, Clone, Copy)]
pub enum AnyView<'a> {
    I32(NumView<'a, i32>),
    I64(NumView<'a, i64>),
    F32(NumView<'a, f32>),
    F64(NumView<'a, f64>),
}

impl<'a> AnyView<'a> {
    pub fn element_type(&self) -> ElementType {
        match self {
            AnyView::I32(_) => ElementType::I32,
            AnyView::I64(_) => ElementType::I64,
            AnyView::F32(_) => ElementType::F32,
            AnyView::F64(_) => ElementType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyView::I32(v) => v.len(),
            AnyView::I64(v) => v.len(),
            AnyView::F32(v) => v.len(),
            AnyView::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_any_from {
    ($ty:ty, $variant:ident) => {
        impl<'a> From<&'a [$ty]> for AnyView<'a> {
            fn from(s: &'a [$ty]) -> Self {
                AnyView::$variant(NumView::new(s))
            }
        }
        impl<'a> From<NumView<'a, $ty>> for AnyView<'a> {
            fn from(v: NumView<'a, $ty>) -> Self {
                AnyView::$variant(v)
            }
        }
        impl<'a> From<&'a mut [$ty]> for AnyViewMut<'a> {
            fn from(s: &'a mut [$ty]) -> Self {
                AnyViewMut::$variant(NumViewMut::new(s))
            }
        }
        impl<'a> From<NumViewMut<'a, $ty>> for AnyViewMut<'a> {
            fn from(v: NumViewMut<'a, $ty>) -> Self {
                AnyViewMut::$variant(v)
            }
        }
    };
}

impl_any_from!(i32, I32);
impl_any_from!(i64, I64);
impl_any_from!(f32, F32);
impl_any_from!(f64, F64);

/// A mutable output view tagged with its element type at runtime.
#[derive(Debug)]
pub enum AnyViewMut<'a> {
    I32(NumViewMut<'a, i32>),
    I64(NumViewMut<'a, i64>),
    F32(NumViewMut<'a, f32>),
    F64(NumViewMut<'a, f64>),
}

impl<'a> AnyViewMut<'a> {
    pub fn element_type(&self) -> ElementType {
        match self {
            AnyViewMut::I32(_) => ElementType::I32,
            AnyViewMut::I64(_) => ElementType::I64,
            AnyViewMut::F32(_) => ElementType::F32,
            AnyViewMut::F64(_) => ElementType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyViewMut::I32(v) => v.len(),
            AnyViewMut::I64(v) => v.len(),
            AnyViewMut::F32(v) => v.len(),
            AnyViewMut::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Apply a named operation.
///
/// Recognized names: `add`, `sub`, `mul`, `fma`, `sum-reduce`,
/// `max-reduce`, `min-reduce` (an unknown name fails with
/// [`KernelError::UnsupportedOp`]).
///
/// Elementwise ops take two input views (`b` is required) and write one
/// element per index to `out`. Reductions take a single input (`b` must be
/// `None`) and write their scalar result to a length-1 `out` view.
///
/// All views participating in one call must share one element type; a
/// disagreement fails with [`KernelError::TypeMismatch`]. Every error
/// leaves `out` untouched.
pub fn apply(
    op_name: &str,
    a: &AnyView<'_>,
    b: Option<&AnyView<'_>>,
    out: &mut AnyViewMut<'_>,
) -> Result<()> {
    let op: Op = op_name.parse()?;
    if op.is_reduction() {
        if b.is_some() {
            return Err(KernelError::TypeMismatch(format!(
                "`{op}` takes a single input operand"
            )));
        }
        apply_reduction(op, a, out)
    } else {
        let b = b.ok_or_else(|| {
            KernelError::TypeMismatch(format!("`{op}` requires two input operands"))
        })?;
        apply_elementwise(op, a, b, out)
    }
}

fn apply_elementwise(
    op: Op,
    a: &AnyView<'_>,
    b: &AnyView<'_>,
    out: &mut AnyViewMut<'_>,
) -> Result<()> {
    match (a, b, out) {
        (AnyView::I32(a), AnyView::I32(b), AnyViewMut::I32(out)) => {
            lanerus_core::apply(op, a, b, out)
        }
        (AnyView::I64(a), AnyView::I64(b), AnyViewMut::I64(out)) => {
            lanerus_core::apply(op, a, b, out)
        }
        (AnyView::F32(a), AnyView::F32(b), AnyViewMut::F32(out)) => {
            lanerus_core::apply(op, a, b, out)
        }
        (AnyView::F64(a), AnyView::F64(b), AnyViewMut::F64(out)) => {
            lanerus_core::apply(op, a, b, out)
        }
        (a, b, out) => Err(KernelError::TypeMismatch(format!(
            "mixed element types: inputs are {} and {}, output is {}",
            a.element_type(),
            b.element_type(),
            out.element_type()
        ))),
    }
}

fn apply_reduction(op: Op, a: &AnyView<'_>, out: &mut AnyViewMut<'_>) -> Result<()> {
    // The scalar result lands in out[0]; the output must be exactly one
    // element long.
    if out.len() != 1 {
        return Err(KernelError::LengthMismatch {
            expected: 1,
            got: out.len(),
        });
    }
    match (a, out) {
        (AnyView::I32(a), AnyViewMut::I32(out)) => {
            let v = lanerus_core::reduce(op, a)?;
            out.set(0, v);
            Ok(())
        }
        (AnyView::I64(a), AnyViewMut::I64(out)) => {
            let v = lanerus_core::reduce(op, a)?;
            out.set(0, v);
            Ok(())
        }
        (AnyView::F32(a), AnyViewMut::F32(out)) => {
            let v = lanerus_core::reduce(op, a)?;
            out.set(0, v);
            Ok(())
        }
        (AnyView::F64(a), AnyViewMut::F64(out)) => {
            let v = lanerus_core::reduce(op, a)?;
            out.set(0, v);
            Ok(())
        }
        (a, out) => Err(KernelError::TypeMismatch(format!(
            "mixed element types: input is {}, output is {}",
            a.element_type(),
            out.element_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_add_per_type() {
        let a = [1i64, 2, 3];
        let b = [10i64, 20, 30];
        let mut o = [0i64; 3];
        apply("add", &AnyView::from(&a[..]), Some(&AnyView::from(&b[..])), &mut AnyViewMut::from(&mut o[..]))
            .unwrap();
        assert_eq!(o, [11, 22, 33]);

        let a = [1.5f64, -2.0];
        let b = [0.5f64, 4.0];
        let mut o = [0.0f64; 2];
        apply("mul", &AnyView::from(&a[..]), Some(&AnyView::from(&b[..])), &mut AnyViewMut::from(&mut o[..]))
            .unwrap();
        assert_eq!(o, [0.75, -8.0]);
    }

    #[test]
    fn test_named_fma() {
        let a = [2.0f32, 3.0];
        let b = [10.0f32, 10.0];
        let mut o = [1.0f32, 1.0];
        apply("fma", &AnyView::from(&a[..]), Some(&AnyView::from(&b[..])), &mut AnyViewMut::from(&mut o[..]))
            .unwrap();
        assert_eq!(o, [21.0, 31.0]);
    }

    #[test]
    fn test_named_reductions_write_length_one_output() {
        let v = [3i32, -1, 7, 2];
        let mut out = [0i32];
        apply("max-reduce", &AnyView::from(&v[..]), None, &mut AnyViewMut::from(&mut out[..]))
            .unwrap();
        assert_eq!(out[0], 7);

        let v = [1.0f32, 2.0, 3.0, 4.0, 5.0];
        let mut out = [0.0f32];
        apply("sum-reduce", &AnyView::from(&v[..]), None, &mut AnyViewMut::from(&mut out[..]))
            .unwrap();
        assert_eq!(out[0], 15.0);
    }

    #[test]
    fn test_reduction_output_must_be_length_one() {
        let v = [1i32, 2];
        let mut out = [0i32; 2];
        let err = apply("sum-reduce", &AnyView::from(&v[..]), None, &mut AnyViewMut::from(&mut out[..]))
            .unwrap_err();
        assert_eq!(err, KernelError::LengthMismatch { expected: 1, got: 2 });
        assert_eq!(out, [0, 0]);
    }

    #[test]
    fn test_unknown_op_name() {
        let v = [1.0f64];
        let mut out = [0.0f64];
        assert!(matches!(
            apply("hypot", &AnyView::from(&v[..]), None, &mut AnyViewMut::from(&mut out[..])),
            Err(KernelError::UnsupportedOp(_))
        ));
    }

    #[test]
    fn test_mixed_element_types() {
        let a = [1i32, 2];
        let b = [1.0f32, 2.0];
        let mut o = [0i32; 2];
        assert!(matches!(
            apply("add", &AnyView::from(&a[..]), Some(&AnyView::from(&b[..])), &mut AnyViewMut::from(&mut o[..])),
            Err(KernelError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_arity_errors() {
        let a = [1i32, 2];
        let mut o = [0i32; 2];
        // Binary op without a second operand.
        assert!(matches!(
            apply("add", &AnyView::from(&a[..]), None, &mut AnyViewMut::from(&mut o[..])),
            Err(KernelError::TypeMismatch(_))
        ));
        // Reduction with a spurious second operand.
        let b = [3i32, 4];
        let mut single = [0i32];
        assert!(matches!(
            apply(
                "sum-reduce",
                &AnyView::from(&a[..]),
                Some(&AnyView::from(&b[..])),
                &mut AnyViewMut::from(&mut single[..])
            ),
            Err(KernelError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_empty_reduction_semantics_pass_through() {
        let v: [f64; 0] = [];
        let mut out = [9.0f64];
        apply("sum-reduce", &AnyView::from(&v[..]), None, &mut AnyViewMut::from(&mut out[..]))
            .unwrap();
        assert_eq!(out[0], 0.0);

        let mut out = [9.0f64];
        assert!(matches!(
            apply("max-reduce", &AnyView::from(&v[..]), None, &mut AnyViewMut::from(&mut out[..])),
            Err(KernelError::EmptyReductionUndefined(_))
        ));
        // Failed calls never touch the output.
        assert_eq!(out[0], 9.0);
    }
}
