//! Error taxonomy for the kernel engine.
//!
//! Every error is local to a single call and is surfaced to the caller,
//! never retried. A failed call leaves the output buffer untouched: the
//! dispatch layer validates every precondition before the first write.

/// All errors returned by the kernel engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// Operand and result lengths disagree.
    #[error("length mismatch: expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Element type is outside the operation's declared domain, or operand
    /// element types disagree.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// No kernel implementation exists for the requested operation. This is
    /// a configuration error on the caller's side, not a transient failure.
    #[error("unsupported operation: {0}")]
    UnsupportedOp(String),

    /// No usable execution path at all. The scalar fallback always exists,
    /// so this cannot be produced by a correct build; the variant is kept so
    /// the taxonomy is closed.
    #[error("no usable execution path on this platform")]
    UnsupportedPlatform,

    /// Reduction over zero elements where the operation declares no
    /// identity value.
    #[error("reduction `{0}` over zero elements has no identity value")]
    EmptyReductionUndefined(&'static str),
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, KernelError>;
