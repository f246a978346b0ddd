//! Element types supported by the kernel engine.
//!
//! The engine operates exclusively over fixed-width numeric types: `i32`,
//! `i64`, `f32`, `f64`. [`ElementType`] is the runtime tag (used by lane
//! descriptors, errors, and the dynamically typed surface in `lanerus-rs`);
//! [`KernelElement`] is the compile-time trait the kernels are generic over.
//!
//! Integer arithmetic is wrapping throughout so the scalar reference path is
//! bit-identical to hardware SIMD integer arithmetic, which wraps on
//! overflow.

use core::fmt;
use std::str::FromStr;

use crate::error::KernelError;
use crate::op::Op;

/// Runtime tag for the element type of a view or kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    I32,
    I64,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in bytes.
    #[inline]
    pub fn size_of(self) -> usize {
        match self {
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::F64 => 8,
        }
    }

    /// Canonical name, as accepted by the string-typed call surface.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::I32 => "int32",
            ElementType::I64 => "int64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int32" => Ok(ElementType::I32),
            "int64" => Ok(ElementType::I64),
            "float32" => Ok(ElementType::F32),
            "float64" => Ok(ElementType::F64),
            other => Err(KernelError::TypeMismatch(format!(
                "unknown element type `{other}`"
            ))),
        }
    }
}

/// The closed family of element types the kernels operate over.
///
/// The arithmetic methods define the scalar reference semantics:
/// - integers wrap (matching SIMD integer instructions),
/// - `mul_add` is fused for floats (matching the FMA instruction, single
///   rounding step),
/// - `max`/`min` follow `f32::max`/`f32::min` for floats; behavior with NaN
///   operands follows whichever path executes and is not specified.
///
/// The `simd_*` hooks let the dispatch layer stay generic: each type routes
/// to its hardware kernels when they exist, and reports `false`/`None`
/// otherwise so dispatch falls back to the scalar kernel for the whole call.
pub trait KernelElement:
    Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Runtime tag for this type.
    const ELEMENT: ElementType;

    /// The additive identity (`0`), also the `sum-reduce` identity.
    fn zero() -> Self;

    /// Seed for `max-reduce` accumulators: the smallest representable value
    /// (`MIN` for integers, negative infinity for floats). `max(seed, x)`
    /// is `x` for every finite `x`.
    fn max_seed() -> Self;

    /// Seed for `min-reduce` accumulators: `MAX` / positive infinity.
    fn min_seed() -> Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;

    /// `self * b + c`. Fused (single rounding) for floats.
    fn mul_add(self, b: Self, c: Self) -> Self;

    fn max(self, rhs: Self) -> Self;
    fn min(self, rhs: Self) -> Self;

    /// Run the hardware elementwise kernel for `op` over contiguous slices,
    /// full lanes plus masked tail. Returns `false` if no hardware form of
    /// `op` exists for this type (or the platform lacks vector support), in
    /// which case nothing has been written.
    fn simd_elementwise(op: Op, a: &[Self], b: &[Self], out: &mut [Self]) -> bool;

    /// Run the hardware reduction kernel for `op` over a contiguous,
    /// non-empty slice. `None` if no hardware form exists.
    fn simd_reduce(op: Op, a: &[Self]) -> Option<Self>;
}

macro_rules! impl_element_int {
    ($ty:ty, $tag:expr, $ew:ident, $red:ident) => {
        impl KernelElement for $ty {
            const ELEMENT: ElementType = $tag;

            #[inline]
            fn zero() -> Self {
                0
            }
            #[inline]
            fn max_seed() -> Self {
                <$ty>::MIN
            }
            #[inline]
            fn min_seed() -> Self {
                <$ty>::MAX
            }
            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline]
            fn mul_add(self, b: Self, c: Self) -> Self {
                self.wrapping_mul(b).wrapping_add(c)
            }
            #[inline]
            fn max(self, rhs: Self) -> Self {
                Ord::max(self, rhs)
            }
            #[inline]
            fn min(self, rhs: Self) -> Self {
                Ord::min(self, rhs)
            }

            #[inline]
            fn simd_elementwise(op: Op, a: &[Self], b: &[Self], out: &mut [Self]) -> bool {
                #[cfg(target_arch = "x86_64")]
                {
                    crate::simd::$ew(op, a, b, out)
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    let _ = (op, a, b, out);
                    false
                }
            }

            #[inline]
            fn simd_reduce(op: Op, a: &[Self]) -> Option<Self> {
                #[cfg(target_arch = "x86_64")]
                {
                    crate::simd::$red(op, a)
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    let _ = (op, a);
                    None
                }
            }
        }
    };
}

macro_rules! impl_element_float {
    ($ty:ty, $tag:expr, $ew:ident, $red:ident) => {
        impl KernelElement for $ty {
            const ELEMENT: ElementType = $tag;

            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn max_seed() -> Self {
                <$ty>::NEG_INFINITY
            }
            #[inline]
            fn min_seed() -> Self {
                <$ty>::INFINITY
            }
            #[inline]
            fn add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self - rhs
            }
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self * rhs
            }
            #[inline]
            fn mul_add(self, b: Self, c: Self) -> Self {
                <$ty>::mul_add(self, b, c)
            }
            #[inline]
            fn max(self, rhs: Self) -> Self {
                <$ty>::max(self, rhs)
            }
            #[inline]
            fn min(self, rhs: Self) -> Self {
                <$ty>::min(self, rhs)
            }

            #[inline]
            fn simd_elementwise(op: Op, a: &[Self], b: &[Self], out: &mut [Self]) -> bool {
                #[cfg(target_arch = "x86_64")]
                {
                    crate::simd::$ew(op, a, b, out)
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    let _ = (op, a, b, out);
                    false
                }
            }

            #[inline]
            fn simd_reduce(op: Op, a: &[Self]) -> Option<Self> {
                #[cfg(target_arch = "x86_64")]
                {
                    crate::simd::$red(op, a)
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    let _ = (op, a);
                    None
                }
            }
        }
    };
}

impl_element_int!(i32, ElementType::I32, elementwise_i32, reduce_i32);
impl_element_int!(i64, ElementType::I64, elementwise_i64, reduce_i64);
impl_element_float!(f32, ElementType::F32, elementwise_f32, reduce_f32);
impl_element_float!(f64, ElementType::F64, elementwise_f64, reduce_f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_names_round_trip() {
        for ty in [
            ElementType::I32,
            ElementType::I64,
            ElementType::F32,
            ElementType::F64,
        ] {
            assert_eq!(ty.name().parse::<ElementType>().unwrap(), ty);
        }
        assert!("float16".parse::<ElementType>().is_err());
    }

    #[test]
    fn test_element_sizes() {
        assert_eq!(ElementType::I32.size_of(), 4);
        assert_eq!(ElementType::F32.size_of(), 4);
        assert_eq!(ElementType::I64.size_of(), 8);
        assert_eq!(ElementType::F64.size_of(), 8);
    }

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(i32::MAX.add(1), i32::MIN);
        assert_eq!(i32::MIN.sub(1), i32::MAX);
        assert_eq!(65536i32.mul(65536), 0);
        assert_eq!(i64::MAX.add(1), i64::MIN);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_float_mul_add_is_fused() {
        // With a fused multiply-add the product is not rounded before the
        // addition, so this differs from (a * b) + c in the last place.
        // For a = 1 + 3e the exact a^2 - 1 is 6e + 9e^2; the unfused path
        // rounds a * a to 1 + 6e and yields exactly 6e, while the fused
        // path keeps the 9e^2 term and rounds to a strictly larger value
        // (the residual is not a round-to-even tie).
        let eps = f64::EPSILON;
        let a = 1.0f64 + 3.0 * eps;
        let fused = a.mul_add(a, -1.0);
        let unfused = a * a - 1.0;
        assert_eq!(unfused, 6.0 * eps);
        assert_ne!(fused, unfused);
        assert!(fused > unfused);
    }

    #[test]
    fn test_reduction_seeds() {
        assert_eq!(<i32 as KernelElement>::max_seed(), i32::MIN);
        assert_eq!(<i64 as KernelElement>::min_seed(), i64::MAX);
        assert_eq!(<f32 as KernelElement>::max_seed(), f32::NEG_INFINITY);
        assert_eq!(<f64 as KernelElement>::min_seed(), f64::INFINITY);
    }
}
