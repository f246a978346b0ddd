//! # Lanerus Core
//!
//! Lane-aware numeric kernel engine: elementwise and reduction operations
//! over contiguous numeric arrays, mapped onto hardware vector lanes with a
//! bit-faithful scalar fallback.
//!
//! This crate provides:
//! - **Lane descriptor**: one-time hardware capability probe, cached
//!   process-wide. Downgrades to lane width 1 when no vector support exists,
//!   so every operation always has an execution path.
//! - **Kernels**: AVX2 vector kernels with hardware-masked partial-lane
//!   tails, and scalar reference kernels that produce bit-identical results
//!   for integer ops.
//! - **Dispatch**: a single-pass full-lanes-then-masked-tail driver that
//!   validates every precondition before touching the output buffer.
//! - **Views**: non-owning, stride-aware views over caller memory, plus a
//!   64-byte-aligned owned buffer for callers that want the vector path
//!   deterministically.
//!
//! The string-named call surface (`"add"`, `"sum-reduce"`, ...) lives in the
//! `lanerus-rs` crate; this crate is fully typed.

pub mod buffer;
pub mod dispatch;
pub mod dtype;
pub mod error;
pub mod lane;
pub mod op;
pub mod scalar;
pub mod view;

// AVX2 kernels. Other architectures run the scalar path through the same
// dispatch layer.
#[cfg(target_arch = "x86_64")]
pub(crate) mod simd;

pub use buffer::AlignedBuf;
pub use dispatch::{apply, reduce};
pub use dtype::{ElementType, KernelElement};
pub use error::{KernelError, Result};
pub use lane::{LaneDescriptor, SimdLevel};
pub use op::Op;
pub use view::{NumView, NumViewMut};
