//! Reduction strategies.
//!
//! Every operation exists once per strategy behind [`Reduction`]. All
//! strategies must agree bit-for-bit on identical input; they differ only in
//! how many elements they consume per step and how they fold the remainder.
//!
//! Contract shared by all strategies:
//! - `minimum`/`maximum` of an empty region return `i32::MAX`/`i32::MIN`
//!   (the fold identities). The session never passes an empty region.
//! - `sum` accumulates in `i64`. With `|x| <= 2^31` no overflow is possible
//!   below `2^32` elements.
//! - `compare` expects equal-length buffers and stops at the first mismatch.

pub mod accelerated;
#[cfg(target_arch = "x86_64")]
pub mod avx2;
#[cfg(target_arch = "x86_64")]
pub mod avx512;
pub mod iterator;
pub mod lanes;
pub mod scalar;

pub use accelerated::Accelerated;
#[cfg(target_arch = "x86_64")]
pub use avx2::Avx2;
#[cfg(target_arch = "x86_64")]
pub use avx512::Avx512;
pub use iterator::IteratorAdaptors;
pub use lanes::Lanes;
pub use scalar::Scalar;

/// One implementation of the five benchmarked operations.
pub trait Reduction {
    /// Short name used in reports and benchmark ids
    fn label(&self) -> &'static str;

    fn minimum(&self, region: &[i32]) -> i32;

    fn maximum(&self, region: &[i32]) -> i32;

    fn sum(&self, region: &[i32]) -> i64;

    /// Number of elements equal to `item`
    fn count(&self, region: &[i32], item: i32) -> usize;

    /// Byte-wise equality of two equal-length buffers
    fn compare(&self, left: &[u8], right: &[u8]) -> bool;
}

/// Every strategy runnable on this machine, scalar first.
pub fn available_strategies() -> Vec<Box<dyn Reduction>> {
    let mut strategies: Vec<Box<dyn Reduction>> = vec![
        Box::new(Scalar),
        Box::new(IteratorAdaptors),
        Box::new(Lanes),
    ];

    #[cfg(target_arch = "x86_64")]
    {
        if let Some(avx2) = Avx2::detect() {
            strategies.push(Box::new(avx2));
        }
        if let Some(avx512) = Avx512::detect() {
            strategies.push(Box::new(avx512));
        }
    }

    strategies.push(Box::new(Accelerated::detect()));
    strategies
}
