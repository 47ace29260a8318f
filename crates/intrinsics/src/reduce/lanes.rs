//! Portable fixed-width lanes.
//!
//! Each step folds one `chunks_exact` window into a lane array the compiler
//! can keep in vector registers. Whatever `chunks_exact` leaves in
//! `remainder()` is folded with the scalar loop.

use super::{scalar, Reduction};

/// i32 lanes per step (one 256-bit register)
pub const I32_LANES: usize = 8;
/// Byte lanes per step (one 256-bit register)
pub const BYTE_LANES: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct Lanes;

impl Reduction for Lanes {
    fn label(&self) -> &'static str {
        "lanes"
    }

    fn minimum(&self, region: &[i32]) -> i32 {
        let mut chunks = region.chunks_exact(I32_LANES);
        let mut acc = [i32::MAX; I32_LANES];
        for chunk in &mut chunks {
            for (lane, &value) in acc.iter_mut().zip(chunk) {
                *lane = (*lane).min(value);
            }
        }
        acc.iter()
            .chain(chunks.remainder())
            .copied()
            .fold(i32::MAX, i32::min)
    }

    fn maximum(&self, region: &[i32]) -> i32 {
        let mut chunks = region.chunks_exact(I32_LANES);
        let mut acc = [i32::MIN; I32_LANES];
        for chunk in &mut chunks {
            for (lane, &value) in acc.iter_mut().zip(chunk) {
                *lane = (*lane).max(value);
            }
        }
        acc.iter()
            .chain(chunks.remainder())
            .copied()
            .fold(i32::MIN, i32::max)
    }

    fn sum(&self, region: &[i32]) -> i64 {
        let mut chunks = region.chunks_exact(I32_LANES);
        let mut acc = [0i64; I32_LANES];
        for chunk in &mut chunks {
            for (lane, &value) in acc.iter_mut().zip(chunk) {
                *lane += i64::from(value);
            }
        }
        acc.iter().sum::<i64>() + scalar::sum(chunks.remainder())
    }

    fn count(&self, region: &[i32], item: i32) -> usize {
        let mut chunks = region.chunks_exact(I32_LANES);
        let mut acc = [0usize; I32_LANES];
        for chunk in &mut chunks {
            for (lane, &value) in acc.iter_mut().zip(chunk) {
                *lane += usize::from(value == item);
            }
        }
        acc.iter().sum::<usize>() + scalar::count(chunks.remainder(), item)
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> bool {
        debug_assert_eq!(left.len(), right.len());
        let mut left_chunks = left.chunks_exact(BYTE_LANES);
        let mut right_chunks = right.chunks_exact(BYTE_LANES);
        for (a, b) in (&mut left_chunks).zip(&mut right_chunks) {
            // OR of all XORs is zero only if every byte matched.
            let diff = a
                .iter()
                .zip(b)
                .fold(0u8, |acc, (&x, &y)| acc | (x ^ y));
            if diff != 0 {
                return false;
            }
        }
        scalar::compare(left_chunks.remainder(), right_chunks.remainder())
    }
}
