//! The closed set of kernel operations.
//!
//! Every operation is pure: one or two input lanes/scalars in, one output
//! lane/scalar out, no side effects. The vectorized and scalar forms of the
//! same operation are mathematically equivalent — bit-identical for integer
//! ops (wrapping arithmetic on both paths), equal up to IEEE-754 rounding
//! for floating point.

use core::fmt;
use std::str::FromStr;

use crate::dtype::{ElementType, KernelElement};
use crate::error::KernelError;

/// A kernel operation, elementwise or reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `out[i] = a[i] + b[i]`
    Add,
    /// `out[i] = a[i] - b[i]`
    Sub,
    /// `out[i] = a[i] * b[i]`
    Mul,
    /// `out[i] = fma(a[i], b[i], out[i])` — fused multiply-add accumulating
    /// into the output view. Float-only domain.
    Fma,
    /// Horizontal sum. Identity: 0.
    SumReduce,
    /// Horizontal maximum. No identity declared: empty input is an error.
    MaxReduce,
    /// Horizontal minimum. No identity declared: empty input is an error.
    MinReduce,
}

impl Op {
    /// Canonical name, as accepted by the string-typed call surface.
    pub fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Fma => "fma",
            Op::SumReduce => "sum-reduce",
            Op::MaxReduce => "max-reduce",
            Op::MinReduce => "min-reduce",
        }
    }

    /// Whether this operation combines all elements into a single scalar.
    #[inline]
    pub fn is_reduction(self) -> bool {
        matches!(self, Op::SumReduce | Op::MaxReduce | Op::MinReduce)
    }

    /// Whether `dtype` is inside this operation's declared domain.
    ///
    /// `fma` is float-only: there is no fused form for integers, and the
    /// wrapping `a * b + c` would silently change meaning.
    #[inline]
    pub fn supports(self, dtype: ElementType) -> bool {
        match self {
            Op::Fma => matches!(dtype, ElementType::F32 | ElementType::F64),
            _ => true,
        }
    }

    /// The declared identity value for a reduction, if any.
    ///
    /// `sum-reduce` declares 0. `max-reduce` and `min-reduce` declare no
    /// identity — reducing an empty view with them surfaces
    /// [`KernelError::EmptyReductionUndefined`] rather than inventing a
    /// sentinel result.
    #[inline]
    pub fn identity<T: KernelElement>(self) -> Option<T> {
        match self {
            Op::SumReduce => Some(T::zero()),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Op {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Op::Add),
            "sub" => Ok(Op::Sub),
            "mul" => Ok(Op::Mul),
            "fma" => Ok(Op::Fma),
            "sum-reduce" => Ok(Op::SumReduce),
            "max-reduce" => Ok(Op::MaxReduce),
            "min-reduce" => Ok(Op::MinReduce),
            other => Err(KernelError::UnsupportedOp(format!(
                "no kernel registered for `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Op; 7] = [
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Fma,
        Op::SumReduce,
        Op::MaxReduce,
        Op::MinReduce,
    ];

    #[test]
    fn test_names_round_trip() {
        for op in ALL {
            assert_eq!(op.name().parse::<Op>().unwrap(), op);
        }
        assert!(matches!(
            "mean-reduce".parse::<Op>(),
            Err(KernelError::UnsupportedOp(_))
        ));
    }

    #[test]
    fn test_fma_domain_is_float_only() {
        assert!(Op::Fma.supports(ElementType::F32));
        assert!(Op::Fma.supports(ElementType::F64));
        assert!(!Op::Fma.supports(ElementType::I32));
        assert!(!Op::Fma.supports(ElementType::I64));
        // Everything else accepts all four element types.
        for op in ALL.into_iter().filter(|o| *o != Op::Fma) {
            assert!(op.supports(ElementType::I64));
        }
    }

    #[test]
    fn test_identities() {
        assert_eq!(Op::SumReduce.identity::<i32>(), Some(0));
        assert_eq!(Op::SumReduce.identity::<f64>(), Some(0.0));
        assert_eq!(Op::MaxReduce.identity::<i32>(), None);
        assert_eq!(Op::MinReduce.identity::<f32>(), None);
    }
}
