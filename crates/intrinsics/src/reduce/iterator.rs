use super::Reduction;

/// Standard library iterator adaptors. The "what you'd write first" baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct IteratorAdaptors;

impl Reduction for IteratorAdaptors {
    fn label(&self) -> &'static str {
        "iterator"
    }

    fn minimum(&self, region: &[i32]) -> i32 {
        region.iter().copied().min().unwrap_or(i32::MAX)
    }

    fn maximum(&self, region: &[i32]) -> i32 {
        region.iter().copied().max().unwrap_or(i32::MIN)
    }

    fn sum(&self, region: &[i32]) -> i64 {
        region.iter().map(|&value| i64::from(value)).sum()
    }

    fn count(&self, region: &[i32], item: i32) -> usize {
        region.iter().filter(|&&value| value == item).count()
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> bool {
        debug_assert_eq!(left.len(), right.len());
        left == right
    }
}
