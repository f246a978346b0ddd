//! AVX2 vector kernels with hardware-masked partial-lane tails.
//!
//! Each kernel processes `floor(len / lane_width)` full lanes with unmasked
//! loads/stores, then one masked pass over the `len % lane_width` remainder
//! using `_mm256_maskload_*` / `_mm256_maskstore_*`, so inactive mask
//! positions never read or write outside the operand slices.
//!
//! Masked loads pad inactive positions with zero. Zero is the sum identity,
//! so sum reductions consume the padded lane directly; max/min reductions
//! first blend the accumulator seed into the inactive positions.
//!
//! Reductions keep one lane-striped accumulator register and combine it at
//! the end by pairwise halving (lane `i` combines with lane `i + width/2`,
//! width halving each round). The order is fixed, so floating-point
//! reduction results are reproducible across runs on the same hardware.
//!
//! The public wrappers re-verify the capability probe before entering any
//! `#[target_feature]` function; they return `false`/`None` when no hardware
//! form of the requested op exists for the element type, and the dispatch
//! layer then runs the scalar kernel for the whole call. AVX2 has no 64-bit
//! integer multiply, maximum, or minimum, so those (op, type) pairs always
//! take the scalar path.

use core::arch::x86_64::*;

use crate::lane::{caps, LANES_32, LANES_64};
use crate::op::Op;

// ============================================================================
// Helpers
// ============================================================================

/// Tail mask for 32-bit elements: all-ones in lanes `< active`, zero above.
#[target_feature(enable = "avx2")]
unsafe fn tail_mask_32(active: usize) -> __m256i {
    let idx = _mm256_setr_epi32(0, 1, 2, 3, 4, 5, 6, 7);
    _mm256_cmpgt_epi32(_mm256_set1_epi32(active as i32), idx)
}

/// Tail mask for 64-bit elements.
#[target_feature(enable = "avx2")]
unsafe fn tail_mask_64(active: usize) -> __m256i {
    let idx = _mm256_setr_epi64x(0, 1, 2, 3);
    _mm256_cmpgt_epi64(_mm256_set1_epi64x(active as i64), idx)
}

/// Pairwise-halving combine of a spilled accumulator register.
///
/// Lane `i` combines with lane `i + width` as `width` halves from `N/2` to
/// 1, e.g. for 8 lanes: `((l0+l4)+(l2+l6)) + ((l1+l5)+(l3+l7))`.
#[inline]
fn tree_reduce<T: Copy, const N: usize>(mut lanes: [T; N], f: impl Fn(T, T) -> T) -> T {
    let mut width = N / 2;
    while width > 0 {
        for i in 0..width {
            lanes[i] = f(lanes[i], lanes[i + width]);
        }
        width /= 2;
    }
    lanes[0]
}

// ============================================================================
// f32 kernels (8 lanes)
// ============================================================================

pub(crate) fn elementwise_f32(op: Op, a: &[f32], b: &[f32], out: &mut [f32]) -> bool {
    let c = caps();
    if !c.avx2 {
        return false;
    }
    match op {
        Op::Add | Op::Sub | Op::Mul => {
            unsafe { ew_f32(op, a, b, out) };
            true
        }
        Op::Fma if c.fma => {
            unsafe { fma_f32(a, b, out) };
            true
        }
        _ => false,
    }
}

pub(crate) fn reduce_f32(op: Op, a: &[f32]) -> Option<f32> {
    if !caps().avx2 {
        return None;
    }
    match op {
        Op::SumReduce => Some(unsafe { sum_f32(a) }),
        Op::MaxReduce => Some(unsafe { max_f32(a) }),
        Op::MinReduce => Some(unsafe { min_f32(a) }),
        _ => None,
    }
}

#[target_feature(enable = "avx2")]
unsafe fn ew_f32(op: Op, a: &[f32], b: &[f32], out: &mut [f32]) {
    let len = a.len();
    let chunks = len / LANES_32;
    for i in 0..chunks {
        let base = i * LANES_32;
        let av = _mm256_loadu_ps(a.as_ptr().add(base));
        let bv = _mm256_loadu_ps(b.as_ptr().add(base));
        let r = match op {
            Op::Add => _mm256_add_ps(av, bv),
            Op::Sub => _mm256_sub_ps(av, bv),
            Op::Mul => _mm256_mul_ps(av, bv),
            _ => unreachable!(),
        };
        _mm256_storeu_ps(out.as_mut_ptr().add(base), r);
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let base = chunks * LANES_32;
        let mask = tail_mask_32(rem);
        let av = _mm256_maskload_ps(a.as_ptr().add(base), mask);
        let bv = _mm256_maskload_ps(b.as_ptr().add(base), mask);
        let r = match op {
            Op::Add => _mm256_add_ps(av, bv),
            Op::Sub => _mm256_sub_ps(av, bv),
            Op::Mul => _mm256_mul_ps(av, bv),
            _ => unreachable!(),
        };
        _mm256_maskstore_ps(out.as_mut_ptr().add(base), mask, r);
    }
}

#[target_feature(enable = "avx2,fma")]
unsafe fn fma_f32(a: &[f32], b: &[f32], out: &mut [f32]) {
    let len = a.len();
    let chunks = len / LANES_32;
    for i in 0..chunks {
        let base = i * LANES_32;
        let av = _mm256_loadu_ps(a.as_ptr().add(base));
        let bv = _mm256_loadu_ps(b.as_ptr().add(base));
        let cv = _mm256_loadu_ps(out.as_ptr().add(base));
        _mm256_storeu_ps(out.as_mut_ptr().add(base), _mm256_fmadd_ps(av, bv, cv));
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let base = chunks * LANES_32;
        let mask = tail_mask_32(rem);
        let av = _mm256_maskload_ps(a.as_ptr().add(base), mask);
        let bv = _mm256_maskload_ps(b.as_ptr().add(base), mask);
        let cv = _mm256_maskload_ps(out.as_ptr().add(base), mask);
        _mm256_maskstore_ps(out.as_mut_ptr().add(base), mask, _mm256_fmadd_ps(av, bv, cv));
    }
}

#[target_feature(enable = "avx2")]
unsafe fn sum_f32(a: &[f32]) -> f32 {
    let len = a.len();
    let chunks = len / LANES_32;
    let mut acc = _mm256_setzero_ps();
    for i in 0..chunks {
        acc = _mm256_add_ps(acc, _mm256_loadu_ps(a.as_ptr().add(i * LANES_32)));
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let mask = tail_mask_32(rem);
        // Inactive positions load as 0.0, the sum identity.
        acc = _mm256_add_ps(acc, _mm256_maskload_ps(a.as_ptr().add(chunks * LANES_32), mask));
    }
    let mut lanes = [0f32; LANES_32];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    tree_reduce(lanes, |x, y| x + y)
}

#[target_feature(enable = "avx2")]
unsafe fn max_f32(a: &[f32]) -> f32 {
    let len = a.len();
    let chunks = len / LANES_32;
    let seed = _mm256_set1_ps(f32::NEG_INFINITY);
    let mut acc = seed;
    for i in 0..chunks {
        acc = _mm256_max_ps(acc, _mm256_loadu_ps(a.as_ptr().add(i * LANES_32)));
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let mask = tail_mask_32(rem);
        let v = _mm256_maskload_ps(a.as_ptr().add(chunks * LANES_32), mask);
        // Replace the zero padding with the seed so inactive lanes are inert.
        let v = _mm256_blendv_ps(seed, v, _mm256_castsi256_ps(mask));
        acc = _mm256_max_ps(acc, v);
    }
    let mut lanes = [0f32; LANES_32];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    tree_reduce(lanes, f32::max)
}

#[target_feature(enable = "avx2")]
unsafe fn min_f32(a: &[f32]) -> f32 {
    let len = a.len();
    let chunks = len / LANES_32;
    let seed = _mm256_set1_ps(f32::INFINITY);
    let mut acc = seed;
    for i in 0..chunks {
        acc = _mm256_min_ps(acc, _mm256_loadu_ps(a.as_ptr().add(i * LANES_32)));
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let mask = tail_mask_32(rem);
        let v = _mm256_maskload_ps(a.as_ptr().add(chunks * LANES_32), mask);
        let v = _mm256_blendv_ps(seed, v, _mm256_castsi256_ps(mask));
        acc = _mm256_min_ps(acc, v);
    }
    let mut lanes = [0f32; LANES_32];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    tree_reduce(lanes, f32::min)
}

// ============================================================================
// f64 kernels (4 lanes)
// ============================================================================

pub(crate) fn elementwise_f64(op: Op, a: &[f64], b: &[f64], out: &mut [f64]) -> bool {
    let c = caps();
    if !c.avx2 {
        return false;
    }
    match op {
        Op::Add | Op::Sub | Op::Mul => {
            unsafe { ew_f64(op, a, b, out) };
            true
        }
        Op::Fma if c.fma => {
            unsafe { fma_f64(a, b, out) };
            true
        }
        _ => false,
    }
}

pub(crate) fn reduce_f64(op: Op, a: &[f64]) -> Option<f64> {
    if !caps().avx2 {
        return None;
    }
    match op {
        Op::SumReduce => Some(unsafe { sum_f64(a) }),
        Op::MaxReduce => Some(unsafe { max_f64(a) }),
        Op::MinReduce => Some(unsafe { min_f64(a) }),
        _ => None,
    }
}

#[target_feature(enable = "avx2")]
unsafe fn ew_f64(op: Op, a: &[f64], b: &[f64], out: &mut [f64]) {
    let len = a.len();
    let chunks = len / LANES_64;
    for i in 0..chunks {
        let base = i * LANES_64;
        let av = _mm256_loadu_pd(a.as_ptr().add(base));
        let bv = _mm256_loadu_pd(b.as_ptr().add(base));
        let r = match op {
            Op::Add => _mm256_add_pd(av, bv),
            Op::Sub => _mm256_sub_pd(av, bv),
            Op::Mul => _mm256_mul_pd(av, bv),
            _ => unreachable!(),
        };
        _mm256_storeu_pd(out.as_mut_ptr().add(base), r);
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let base = chunks * LANES_64;
        let mask = tail_mask_64(rem);
        let av = _mm256_maskload_pd(a.as_ptr().add(base), mask);
        let bv = _mm256_maskload_pd(b.as_ptr().add(base), mask);
        let r = match op {
            Op::Add => _mm256_add_pd(av, bv),
            Op::Sub => _mm256_sub_pd(av, bv),
            Op::Mul => _mm256_mul_pd(av, bv),
            _ => unreachable!(),
        };
        _mm256_maskstore_pd(out.as_mut_ptr().add(base), mask, r);
    }
}

#[target_feature(enable = "avx2,fma")]
unsafe fn fma_f64(a: &[f64], b: &[f64], out: &mut [f64]) {
    let len = a.len();
    let chunks = len / LANES_64;
    for i in 0..chunks {
        let base = i * LANES_64;
        let av = _mm256_loadu_pd(a.as_ptr().add(base));
        let bv = _mm256_loadu_pd(b.as_ptr().add(base));
        let cv = _mm256_loadu_pd(out.as_ptr().add(base));
        _mm256_storeu_pd(out.as_mut_ptr().add(base), _mm256_fmadd_pd(av, bv, cv));
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let base = chunks * LANES_64;
        let mask = tail_mask_64(rem);
        let av = _mm256_maskload_pd(a.as_ptr().add(base), mask);
        let bv = _mm256_maskload_pd(b.as_ptr().add(base), mask);
        let cv = _mm256_maskload_pd(out.as_ptr().add(base), mask);
        _mm256_maskstore_pd(out.as_mut_ptr().add(base), mask, _mm256_fmadd_pd(av, bv, cv));
    }
}

#[target_feature(enable = "avx2")]
unsafe fn sum_f64(a: &[f64]) -> f64 {
    let len = a.len();
    let chunks = len / LANES_64;
    let mut acc = _mm256_setzero_pd();
    for i in 0..chunks {
        acc = _mm256_add_pd(acc, _mm256_loadu_pd(a.as_ptr().add(i * LANES_64)));
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let mask = tail_mask_64(rem);
        acc = _mm256_add_pd(acc, _mm256_maskload_pd(a.as_ptr().add(chunks * LANES_64), mask));
    }
    let mut lanes = [0f64; LANES_64];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    tree_reduce(lanes, |x, y| x + y)
}

#[target_feature(enable = "avx2")]
unsafe fn max_f64(a: &[f64]) -> f64 {
    let len = a.len();
    let chunks = len / LANES_64;
    let seed = _mm256_set1_pd(f64::NEG_INFINITY);
    let mut acc = seed;
    for i in 0..chunks {
        acc = _mm256_max_pd(acc, _mm256_loadu_pd(a.as_ptr().add(i * LANES_64)));
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let mask = tail_mask_64(rem);
        let v = _mm256_maskload_pd(a.as_ptr().add(chunks * LANES_64), mask);
        let v = _mm256_blendv_pd(seed, v, _mm256_castsi256_pd(mask));
        acc = _mm256_max_pd(acc, v);
    }
    let mut lanes = [0f64; LANES_64];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    tree_reduce(lanes, f64::max)
}

#[target_feature(enable = "avx2")]
unsafe fn min_f64(a: &[f64]) -> f64 {
    let len = a.len();
    let chunks = len / LANES_64;
    let seed = _mm256_set1_pd(f64::INFINITY);
    let mut acc = seed;
    for i in 0..chunks {
        acc = _mm256_min_pd(acc, _mm256_loadu_pd(a.as_ptr().add(i * LANES_64)));
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let mask = tail_mask_64(rem);
        let v = _mm256_maskload_pd(a.as_ptr().add(chunks * LANES_64), mask);
        let v = _mm256_blendv_pd(seed, v, _mm256_castsi256_pd(mask));
        acc = _mm256_min_pd(acc, v);
    }
    let mut lanes = [0f64; LANES_64];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    tree_reduce(lanes, f64::min)
}

// ============================================================================
// i32 kernels (8 lanes)
// ============================================================================

pub(crate) fn elementwise_i32(op: Op, a: &[i32], b: &[i32], out: &mut [i32]) -> bool {
    if !caps().avx2 {
        return false;
    }
    match op {
        Op::Add | Op::Sub | Op::Mul => {
            unsafe { ew_i32(op, a, b, out) };
            true
        }
        _ => false,
    }
}

pub(crate) fn reduce_i32(op: Op, a: &[i32]) -> Option<i32> {
    if !caps().avx2 {
        return None;
    }
    match op {
        Op::SumReduce => Some(unsafe { sum_i32(a) }),
        Op::MaxReduce => Some(unsafe { minmax_i32(a, true) }),
        Op::MinReduce => Some(unsafe { minmax_i32(a, false) }),
        _ => None,
    }
}

#[target_feature(enable = "avx2")]
unsafe fn ew_i32(op: Op, a: &[i32], b: &[i32], out: &mut [i32]) {
    let len = a.len();
    let chunks = len / LANES_32;
    for i in 0..chunks {
        let base = i * LANES_32;
        let av = _mm256_loadu_si256(a.as_ptr().add(base) as *const __m256i);
        let bv = _mm256_loadu_si256(b.as_ptr().add(base) as *const __m256i);
        let r = match op {
            Op::Add => _mm256_add_epi32(av, bv),
            Op::Sub => _mm256_sub_epi32(av, bv),
            Op::Mul => _mm256_mullo_epi32(av, bv),
            _ => unreachable!(),
        };
        _mm256_storeu_si256(out.as_mut_ptr().add(base) as *mut __m256i, r);
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let base = chunks * LANES_32;
        let mask = tail_mask_32(rem);
        let av = _mm256_maskload_epi32(a.as_ptr().add(base), mask);
        let bv = _mm256_maskload_epi32(b.as_ptr().add(base), mask);
        let r = match op {
            Op::Add => _mm256_add_epi32(av, bv),
            Op::Sub => _mm256_sub_epi32(av, bv),
            Op::Mul => _mm256_mullo_epi32(av, bv),
            _ => unreachable!(),
        };
        _mm256_maskstore_epi32(out.as_mut_ptr().add(base), mask, r);
    }
}

#[target_feature(enable = "avx2")]
unsafe fn sum_i32(a: &[i32]) -> i32 {
    let len = a.len();
    let chunks = len / LANES_32;
    let mut acc = _mm256_setzero_si256();
    for i in 0..chunks {
        let v = _mm256_loadu_si256(a.as_ptr().add(i * LANES_32) as *const __m256i);
        acc = _mm256_add_epi32(acc, v);
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let mask = tail_mask_32(rem);
        let v = _mm256_maskload_epi32(a.as_ptr().add(chunks * LANES_32), mask);
        acc = _mm256_add_epi32(acc, v);
    }
    let mut lanes = [0i32; LANES_32];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
    tree_reduce(lanes, i32::wrapping_add)
}

#[target_feature(enable = "avx2")]
unsafe fn minmax_i32(a: &[i32], want_max: bool) -> i32 {
    let len = a.len();
    let chunks = len / LANES_32;
    let seed_value = if want_max { i32::MIN } else { i32::MAX };
    let seed = _mm256_set1_epi32(seed_value);
    let mut acc = seed;
    for i in 0..chunks {
        let v = _mm256_loadu_si256(a.as_ptr().add(i * LANES_32) as *const __m256i);
        acc = if want_max {
            _mm256_max_epi32(acc, v)
        } else {
            _mm256_min_epi32(acc, v)
        };
    }
    let rem = len - chunks * LANES_32;
    if rem > 0 {
        let mask = tail_mask_32(rem);
        let v = _mm256_maskload_epi32(a.as_ptr().add(chunks * LANES_32), mask);
        // The mask is all-ones per active 32-bit lane, so the byte blend
        // selects whole elements.
        let v = _mm256_blendv_epi8(seed, v, mask);
        acc = if want_max {
            _mm256_max_epi32(acc, v)
        } else {
            _mm256_min_epi32(acc, v)
        };
    }
    let mut lanes = [0i32; LANES_32];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
    if want_max {
        tree_reduce(lanes, Ord::max)
    } else {
        tree_reduce(lanes, Ord::min)
    }
}

// ============================================================================
// i64 kernels (4 lanes)
//
// AVX2 carries 64-bit add/sub only; mul/max/min report "no hardware kernel"
// and run scalar.
// ============================================================================

pub(crate) fn elementwise_i64(op: Op, a: &[i64], b: &[i64], out: &mut [i64]) -> bool {
    if !caps().avx2 {
        return false;
    }
    match op {
        Op::Add | Op::Sub => {
            unsafe { ew_i64(op, a, b, out) };
            true
        }
        _ => false,
    }
}

pub(crate) fn reduce_i64(op: Op, a: &[i64]) -> Option<i64> {
    if !caps().avx2 {
        return None;
    }
    match op {
        Op::SumReduce => Some(unsafe { sum_i64(a) }),
        _ => None,
    }
}

#[target_feature(enable = "avx2")]
unsafe fn ew_i64(op: Op, a: &[i64], b: &[i64], out: &mut [i64]) {
    let len = a.len();
    let chunks = len / LANES_64;
    for i in 0..chunks {
        let base = i * LANES_64;
        let av = _mm256_loadu_si256(a.as_ptr().add(base) as *const __m256i);
        let bv = _mm256_loadu_si256(b.as_ptr().add(base) as *const __m256i);
        let r = match op {
            Op::Add => _mm256_add_epi64(av, bv),
            Op::Sub => _mm256_sub_epi64(av, bv),
            _ => unreachable!(),
        };
        _mm256_storeu_si256(out.as_mut_ptr().add(base) as *mut __m256i, r);
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let base = chunks * LANES_64;
        let mask = tail_mask_64(rem);
        let av = _mm256_maskload_epi64(a.as_ptr().add(base), mask);
        let bv = _mm256_maskload_epi64(b.as_ptr().add(base), mask);
        let r = match op {
            Op::Add => _mm256_add_epi64(av, bv),
            Op::Sub => _mm256_sub_epi64(av, bv),
            _ => unreachable!(),
        };
        _mm256_maskstore_epi64(out.as_mut_ptr().add(base), mask, r);
    }
}

#[target_feature(enable = "avx2")]
unsafe fn sum_i64(a: &[i64]) -> i64 {
    let len = a.len();
    let chunks = len / LANES_64;
    let mut acc = _mm256_setzero_si256();
    for i in 0..chunks {
        let v = _mm256_loadu_si256(a.as_ptr().add(i * LANES_64) as *const __m256i);
        acc = _mm256_add_epi64(acc, v);
    }
    let rem = len - chunks * LANES_64;
    if rem > 0 {
        let mask = tail_mask_64(rem);
        let v = _mm256_maskload_epi64(a.as_ptr().add(chunks * LANES_64), mask);
        acc = _mm256_add_epi64(acc, v);
    }
    let mut lanes = [0i64; LANES_64];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
    tree_reduce(lanes, i64::wrapping_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reproducible pseudo-random i64 stream (LCG).
    fn lcg(seed: u64, len: usize) -> Vec<i64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 16) as i64 % 10_000
            })
            .collect()
    }

    #[test]
    fn test_tree_reduce_order() {
        // ((1+5)+(3+7)) + ((2+6)+(4+8))
        assert_eq!(tree_reduce([1, 2, 3, 4, 5, 6, 7, 8], |x, y| x + y), 36);
        assert_eq!(tree_reduce([4i64, 9, 1, 7], Ord::max), 9);
    }

    #[test]
    fn test_elementwise_matches_scalar_all_lengths() {
        if !caps().avx2 {
            return;
        }
        for len in 0..=(3 * LANES_32 + 5) {
            let a: Vec<i32> = lcg(42, len).iter().map(|&x| x as i32).collect();
            let b: Vec<i32> = lcg(7, len).iter().map(|&x| x as i32).collect();
            for op in [Op::Add, Op::Sub, Op::Mul] {
                let mut got = vec![0i32; len];
                assert!(elementwise_i32(op, &a, &b, &mut got));
                let want: Vec<i32> = (0..len)
                    .map(|i| match op {
                        Op::Add => a[i].wrapping_add(b[i]),
                        Op::Sub => a[i].wrapping_sub(b[i]),
                        _ => a[i].wrapping_mul(b[i]),
                    })
                    .collect();
                assert_eq!(got, want, "op {op} len {len}");
            }
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_float_elementwise_is_bit_identical_to_scalar() {
        if !caps().avx2 {
            return;
        }
        for len in [1, 4, 7, 8, 9, 10, 16, 23] {
            let a: Vec<f32> = lcg(1, len).iter().map(|&x| x as f32 * 0.25).collect();
            let b: Vec<f32> = lcg(2, len).iter().map(|&x| x as f32 * 0.5).collect();
            let mut got = vec![0f32; len];
            assert!(elementwise_f32(Op::Mul, &a, &b, &mut got));
            for i in 0..len {
                // Same single IEEE-754 operation per element on both paths.
                assert_eq!(got[i], a[i] * b[i]);
            }
        }
    }

    #[test]
    fn test_reduce_matches_scalar() {
        if !caps().avx2 {
            return;
        }
        for len in 1..=(3 * LANES_64 + 3) {
            let a = lcg(99, len);
            assert_eq!(reduce_i64(Op::SumReduce, &a), Some(a.iter().copied().fold(0i64, i64::wrapping_add)));
            // 64-bit max has no AVX2 form.
            assert_eq!(reduce_i64(Op::MaxReduce, &a), None);
        }
        for len in 1..=(3 * LANES_32 + 5) {
            let a: Vec<i32> = lcg(5, len).iter().map(|&x| x as i32).collect();
            assert_eq!(reduce_i32(Op::MaxReduce, &a), Some(*a.iter().max().unwrap()));
            assert_eq!(reduce_i32(Op::MinReduce, &a), Some(*a.iter().min().unwrap()));
        }
    }

    #[test]
    fn test_max_of_all_negatives_ignores_padding() {
        if !caps().avx2 {
            return;
        }
        // Tail padding loads as zero; the blend must keep it out of the max.
        let a = vec![-5.0f64; 7];
        assert_eq!(reduce_f64(Op::MaxReduce, &a), Some(-5.0));
        let b = vec![-9i32; 11];
        assert_eq!(reduce_i32(Op::MaxReduce, &b), Some(-9));
    }

    #[test]
    fn test_masked_tail_does_not_touch_out_of_range_output() {
        if !caps().avx2 {
            return;
        }
        // Lane width 8, length 10: one full lane plus a 2-element tail.
        // Elements 10 and 11 of the backing buffer must stay untouched.
        let a: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let b = vec![1.0f32; 10];
        let mut backing = vec![-77.0f32; 12];
        {
            let (head, _) = backing.split_at_mut(10);
            assert!(elementwise_f32(Op::Add, &a, &b, head));
        }
        for i in 0..10 {
            assert_eq!(backing[i], i as f32 + 1.0);
        }
        assert_eq!(backing[10], -77.0);
        assert_eq!(backing[11], -77.0);
    }
}
