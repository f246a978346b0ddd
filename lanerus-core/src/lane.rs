//! Lane descriptor: hardware vector width and capability detection.
//!
//! The capability probe runs once per process and is cached in a
//! [`OnceLock`]; every later lookup is a plain read of the published value.
//! Detection can never fail — a platform with no usable vector extension
//! (or with `LANERUS_FORCE_SCALAR` set in the environment) simply gets lane
//! width 1 and runs the scalar kernels with no behavioral difference other
//! than performance.

use std::sync::OnceLock;

use crate::dtype::ElementType;

/// f32/i32 lanes per AVX2 register (256 / 32 = 8).
pub const LANES_32: usize = 8;
/// f64/i64 lanes per AVX2 register (256 / 64 = 4).
pub const LANES_64: usize = 4;
/// Load/store alignment for full-speed AVX2 access, in bytes.
pub const AVX2_ALIGN: usize = 32;

/// Environment knob: any value other than empty or `0` forces the all-scalar
/// path for the whole process.
pub const FORCE_SCALAR_ENV: &str = "LANERUS_FORCE_SCALAR";

/// Closed set of instruction-set generations the engine dispatches over.
/// Selected once at first use, never re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// 256-bit AVX2 kernels (FMA availability tracked separately).
    Avx2,
    /// Scalar fallback: lane width 1, always available.
    Scalar,
}

/// Detected vector capabilities of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdCaps {
    pub avx2: bool,
    pub fma: bool,
}

static CAPS: OnceLock<SimdCaps> = OnceLock::new();

/// The process-wide capability probe, run once and cached.
pub fn caps() -> &'static SimdCaps {
    CAPS.get_or_init(|| {
        if force_scalar() {
            tracing::debug!(env = FORCE_SCALAR_ENV, "vector kernels disabled, using scalar path");
            return SimdCaps::default();
        }
        let detected = detect_caps();
        tracing::debug!(avx2 = detected.avx2, fma = detected.fma, "simd capability probe");
        detected
    })
}

fn force_scalar() -> bool {
    match std::env::var(FORCE_SCALAR_ENV) {
        Ok(v) => !v.is_empty() && v != "0",
        Err(_) => false,
    }
}

#[cfg(target_arch = "x86_64")]
fn detect_caps() -> SimdCaps {
    SimdCaps {
        avx2: is_x86_feature_detected!("avx2"),
        fma: is_x86_feature_detected!("fma"),
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_caps() -> SimdCaps {
    SimdCaps::default()
}

/// Hardware vector shape for one element type.
///
/// Immutable after construction; `detect` consults the cached process-wide
/// probe, so building a descriptor is free after the first call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneDescriptor {
    pub element_type: ElementType,
    /// Elements per lane. Power of two; 1 on the scalar level.
    pub lane_width: usize,
    /// Preferred buffer alignment in bytes.
    pub alignment: usize,
    pub level: SimdLevel,
}

impl LaneDescriptor {
    /// Widest supported vector shape for `element_type`. Never fails: no
    /// vector support downgrades to lane width 1.
    pub fn detect(element_type: ElementType) -> Self {
        if caps().avx2 {
            let lane_width = match element_type.size_of() {
                4 => LANES_32,
                _ => LANES_64,
            };
            Self {
                element_type,
                lane_width,
                alignment: AVX2_ALIGN,
                level: SimdLevel::Avx2,
            }
        } else {
            Self {
                element_type,
                lane_width: 1,
                alignment: element_type.size_of(),
                level: SimdLevel::Scalar,
            }
        }
    }
}
