//! AVX2 reductions over `std::arch::x86_64`.
//!
//! Safety
//! - Every `unsafe fn` here is compiled with `#[target_feature(enable = "avx2")]`
//!   and is only reachable through [`Avx2`], which can only be built after
//!   `is_x86_feature_detected!("avx2")` returned true.
//! - All loads are unaligned (`loadu`) and read whole `chunks_exact` windows,
//!   so no load crosses the end of a slice.

use std::arch::x86_64::*;

use super::{scalar, Reduction};

const I32_WIDTH: usize = 8;
const BYTE_WIDTH: usize = 32;
/// Векторов на блок подсчёта: i32-счётчики в лейнах не переполняются.
const COUNT_BLOCK_CHUNKS: usize = 1 << 24;

/// Proof that the running CPU supports AVX2.
#[derive(Debug, Clone, Copy)]
pub struct Avx2 {
    _detected: (),
}

impl Avx2 {
    pub fn detect() -> Option<Self> {
        if is_x86_feature_detected!("avx2") {
            Some(Self { _detected: () })
        } else {
            None
        }
    }
}

impl Reduction for Avx2 {
    fn label(&self) -> &'static str {
        "avx2"
    }

    fn minimum(&self, region: &[i32]) -> i32 {
        // SAFETY: `self` exists only when AVX2 was detected.
        unsafe { minimum_avx2(region) }
    }

    fn maximum(&self, region: &[i32]) -> i32 {
        // SAFETY: see `minimum`.
        unsafe { maximum_avx2(region) }
    }

    fn sum(&self, region: &[i32]) -> i64 {
        // SAFETY: see `minimum`.
        unsafe { sum_avx2(region) }
    }

    fn count(&self, region: &[i32], item: i32) -> usize {
        // SAFETY: see `minimum`.
        unsafe { count_avx2(region, item) }
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> bool {
        debug_assert_eq!(left.len(), right.len());
        // SAFETY: see `minimum`.
        unsafe { compare_avx2(left, right) }
    }
}

#[target_feature(enable = "avx2")]
/// # Safety
/// Требуется AVX2.
unsafe fn minimum_avx2(region: &[i32]) -> i32 {
    let mut chunks = region.chunks_exact(I32_WIDTH);
    let mut acc = _mm256_set1_epi32(i32::MAX);
    for chunk in &mut chunks {
        let v = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
        acc = _mm256_min_epi32(acc, v);
    }
    let mut lanes = [0i32; I32_WIDTH];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
    lanes
        .iter()
        .chain(chunks.remainder())
        .copied()
        .fold(i32::MAX, i32::min)
}

#[target_feature(enable = "avx2")]
/// # Safety
/// Требуется AVX2.
unsafe fn maximum_avx2(region: &[i32]) -> i32 {
    let mut chunks = region.chunks_exact(I32_WIDTH);
    let mut acc = _mm256_set1_epi32(i32::MIN);
    for chunk in &mut chunks {
        let v = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
        acc = _mm256_max_epi32(acc, v);
    }
    let mut lanes = [0i32; I32_WIDTH];
    _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
    lanes
        .iter()
        .chain(chunks.remainder())
        .copied()
        .fold(i32::MIN, i32::max)
}

#[target_feature(enable = "avx2")]
/// # Safety
/// Требуется AVX2.
unsafe fn sum_avx2(region: &[i32]) -> i64 {
    let mut chunks = region.chunks_exact(I32_WIDTH);
    // Two i64x4 accumulators: low and high half of each i32x8 load, sign-extended.
    let mut acc_lo = _mm256_setzero_si256();
    let mut acc_hi = _mm256_setzero_si256();
    for chunk in &mut chunks {
        let v = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
        let lo = _mm256_cvtepi32_epi64(_mm256_castsi256_si128(v));
        let hi = _mm256_cvtepi32_epi64(_mm256_extracti128_si256::<1>(v));
        acc_lo = _mm256_add_epi64(acc_lo, lo);
        acc_hi = _mm256_add_epi64(acc_hi, hi);
    }
    let mut lanes = [0i64; 4];
    _mm256_storeu_si256(
        lanes.as_mut_ptr() as *mut __m256i,
        _mm256_add_epi64(acc_lo, acc_hi),
    );
    lanes.iter().sum::<i64>() + scalar::sum(chunks.remainder())
}

#[target_feature(enable = "avx2")]
/// # Safety
/// Требуется AVX2.
unsafe fn count_avx2(region: &[i32], item: i32) -> usize {
    let needle = _mm256_set1_epi32(item);
    let body_len = region.len() - region.len() % I32_WIDTH;
    let mut total = 0usize;

    for block in region[..body_len].chunks(COUNT_BLOCK_CHUNKS * I32_WIDTH) {
        let mut acc = _mm256_setzero_si256();
        for chunk in block.chunks_exact(I32_WIDTH) {
            let v = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
            // Equal lanes are all ones (-1); subtracting adds one per match.
            acc = _mm256_sub_epi32(acc, _mm256_cmpeq_epi32(v, needle));
        }
        let mut lanes = [0i32; I32_WIDTH];
        _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
        total += lanes.iter().map(|&lane| lane as usize).sum::<usize>();
    }

    total + scalar::count(&region[body_len..], item)
}

#[target_feature(enable = "avx2")]
/// # Safety
/// Требуется AVX2. `left` и `right` одной длины.
unsafe fn compare_avx2(left: &[u8], right: &[u8]) -> bool {
    let mut left_chunks = left.chunks_exact(BYTE_WIDTH);
    let mut right_chunks = right.chunks_exact(BYTE_WIDTH);
    for (a, b) in (&mut left_chunks).zip(&mut right_chunks) {
        let va = _mm256_loadu_si256(a.as_ptr() as *const __m256i);
        let vb = _mm256_loadu_si256(b.as_ptr() as *const __m256i);
        let mask = _mm256_movemask_epi8(_mm256_cmpeq_epi8(va, vb));
        if mask != -1 {
            return false;
        }
    }
    scalar::compare(left_chunks.remainder(), right_chunks.remainder())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avx2_matches_scalar_on_negative_sum() {
        let Some(avx2) = Avx2::detect() else {
            return;
        };
        let region: Vec<i32> = (0..67).map(|i| if i % 2 == 0 { i32::MIN } else { -i }).collect();
        assert_eq!(avx2.sum(&region), scalar::sum(&region));
    }

    #[test]
    fn test_avx2_count_all_and_none() {
        let Some(avx2) = Avx2::detect() else {
            return;
        };
        let region = vec![42; I32_WIDTH * 5 + 3];
        assert_eq!(avx2.count(&region, 42), region.len());
        assert_eq!(avx2.count(&region, 41), 0);
    }

    #[test]
    fn test_avx2_compare_last_byte_of_body() {
        let Some(avx2) = Avx2::detect() else {
            return;
        };
        let left = vec![0xAAu8; BYTE_WIDTH * 3 + 5];
        let mut right = left.clone();
        assert!(avx2.compare(&left, &right));
        right[BYTE_WIDTH * 3 - 1] = 0;
        assert!(!avx2.compare(&left, &right));
    }
}
