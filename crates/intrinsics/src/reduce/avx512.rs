//! AVX-512 reductions: 16 x i32 and 64 x u8 per step.
//!
//! Safety
//! - Функции ниже компилируются с `avx512f` (и `avx512bw` для сравнения байт)
//!   и вызываются только через [`Avx512`], который создаётся лишь после
//!   успешной runtime-детекции обоих расширений.
//! - Загрузки невыровненные и читают только полные окна `chunks_exact`.

use std::arch::x86_64::*;

use super::{scalar, Reduction};

const I32_WIDTH: usize = 16;
const BYTE_WIDTH: usize = 64;

/// Proof that the running CPU supports AVX-512F and AVX-512BW.
#[derive(Debug, Clone, Copy)]
pub struct Avx512 {
    _detected: (),
}

impl Avx512 {
    pub fn detect() -> Option<Self> {
        if is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512bw") {
            Some(Self { _detected: () })
        } else {
            None
        }
    }
}

impl Reduction for Avx512 {
    fn label(&self) -> &'static str {
        "avx512"
    }

    fn minimum(&self, region: &[i32]) -> i32 {
        // SAFETY: `self` exists only when AVX-512F/BW were detected.
        unsafe { minimum_avx512(region) }
    }

    fn maximum(&self, region: &[i32]) -> i32 {
        // SAFETY: see `minimum`.
        unsafe { maximum_avx512(region) }
    }

    fn sum(&self, region: &[i32]) -> i64 {
        // SAFETY: see `minimum`.
        unsafe { sum_avx512(region) }
    }

    fn count(&self, region: &[i32], item: i32) -> usize {
        // SAFETY: see `minimum`.
        unsafe { count_avx512(region, item) }
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> bool {
        debug_assert_eq!(left.len(), right.len());
        // SAFETY: see `minimum`.
        unsafe { compare_avx512(left, right) }
    }
}

#[target_feature(enable = "avx512f")]
/// # Safety
/// Требуется AVX-512F.
unsafe fn minimum_avx512(region: &[i32]) -> i32 {
    let mut chunks = region.chunks_exact(I32_WIDTH);
    let mut acc = _mm512_set1_epi32(i32::MAX);
    for chunk in &mut chunks {
        acc = _mm512_min_epi32(acc, _mm512_loadu_epi32(chunk.as_ptr()));
    }
    chunks
        .remainder()
        .iter()
        .copied()
        .fold(_mm512_reduce_min_epi32(acc), i32::min)
}

#[target_feature(enable = "avx512f")]
/// # Safety
/// Требуется AVX-512F.
unsafe fn maximum_avx512(region: &[i32]) -> i32 {
    let mut chunks = region.chunks_exact(I32_WIDTH);
    let mut acc = _mm512_set1_epi32(i32::MIN);
    for chunk in &mut chunks {
        acc = _mm512_max_epi32(acc, _mm512_loadu_epi32(chunk.as_ptr()));
    }
    chunks
        .remainder()
        .iter()
        .copied()
        .fold(_mm512_reduce_max_epi32(acc), i32::max)
}

#[target_feature(enable = "avx512f")]
/// # Safety
/// Требуется AVX-512F.
unsafe fn sum_avx512(region: &[i32]) -> i64 {
    let mut chunks = region.chunks_exact(I32_WIDTH);
    // Каждая половина i32x16 расширяется со знаком в i64x8.
    let mut acc_lo = _mm512_setzero_si512();
    let mut acc_hi = _mm512_setzero_si512();
    for chunk in &mut chunks {
        let v = _mm512_loadu_epi32(chunk.as_ptr());
        let lo = _mm512_cvtepi32_epi64(_mm512_castsi512_si256(v));
        let hi = _mm512_cvtepi32_epi64(_mm512_extracti64x4_epi64::<1>(v));
        acc_lo = _mm512_add_epi64(acc_lo, lo);
        acc_hi = _mm512_add_epi64(acc_hi, hi);
    }
    _mm512_reduce_add_epi64(_mm512_add_epi64(acc_lo, acc_hi)) + scalar::sum(chunks.remainder())
}

#[target_feature(enable = "avx512f")]
/// # Safety
/// Требуется AVX-512F.
unsafe fn count_avx512(region: &[i32], item: i32) -> usize {
    let needle = _mm512_set1_epi32(item);
    let mut chunks = region.chunks_exact(I32_WIDTH);
    let mut total = 0usize;
    for chunk in &mut chunks {
        let mask = _mm512_cmpeq_epi32_mask(_mm512_loadu_epi32(chunk.as_ptr()), needle);
        total += mask.count_ones() as usize;
    }
    total + scalar::count(chunks.remainder(), item)
}

#[target_feature(enable = "avx512f,avx512bw")]
/// # Safety
/// Требуется AVX-512F и AVX-512BW. `left` и `right` одной длины.
unsafe fn compare_avx512(left: &[u8], right: &[u8]) -> bool {
    let mut left_chunks = left.chunks_exact(BYTE_WIDTH);
    let mut right_chunks = right.chunks_exact(BYTE_WIDTH);
    for (a, b) in (&mut left_chunks).zip(&mut right_chunks) {
        let va = _mm512_loadu_epi8(a.as_ptr() as *const i8);
        let vb = _mm512_loadu_epi8(b.as_ptr() as *const i8);
        if _mm512_cmpeq_epi8_mask(va, vb) != u64::MAX {
            return false;
        }
    }
    scalar::compare(left_chunks.remainder(), right_chunks.remainder())
}
