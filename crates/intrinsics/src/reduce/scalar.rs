//! Element-by-element loops. Baseline for every other strategy and the tail
//! handler for the vectorized ones.

use super::Reduction;

#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

#[inline(never)]
pub fn minimum(region: &[i32]) -> i32 {
    let Some((&first, rest)) = region.split_first() else {
        return i32::MAX;
    };
    let mut result = first;
    for &value in rest {
        if result > value {
            result = value;
        }
    }
    result
}

#[inline(never)]
pub fn maximum(region: &[i32]) -> i32 {
    let Some((&first, rest)) = region.split_first() else {
        return i32::MIN;
    };
    let mut result = first;
    for &value in rest {
        if result < value {
            result = value;
        }
    }
    result
}

#[inline(never)]
pub fn sum(region: &[i32]) -> i64 {
    let mut result = 0i64;
    for &value in region {
        result += i64::from(value);
    }
    result
}

#[inline(never)]
pub fn count(region: &[i32], item: i32) -> usize {
    let mut result = 0;
    for &value in region {
        if value == item {
            result += 1;
        }
    }
    result
}

#[inline(never)]
pub fn compare(left: &[u8], right: &[u8]) -> bool {
    debug_assert_eq!(left.len(), right.len());
    for (a, b) in left.iter().zip(right) {
        if a != b {
            return false;
        }
    }
    true
}

impl Reduction for Scalar {
    fn label(&self) -> &'static str {
        "scalar"
    }

    fn minimum(&self, region: &[i32]) -> i32 {
        minimum(region)
    }

    fn maximum(&self, region: &[i32]) -> i32 {
        maximum(region)
    }

    fn sum(&self, region: &[i32]) -> i64 {
        sum(region)
    }

    fn count(&self, region: &[i32], item: i32) -> usize {
        count(region, item)
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> bool {
        compare(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element() {
        assert_eq!(minimum(&[-4]), -4);
        assert_eq!(maximum(&[-4]), -4);
        assert_eq!(sum(&[-4]), -4);
        assert_eq!(count(&[-4], -4), 1);
    }

    #[test]
    fn test_sum_does_not_wrap() {
        let region = vec![i32::MAX; 3];
        assert_eq!(sum(&region), 3 * i64::from(i32::MAX));
        let region = vec![i32::MIN; 3];
        assert_eq!(sum(&region), 3 * i64::from(i32::MIN));
    }

    #[test]
    fn test_compare_first_and_last_byte() {
        assert!(compare(b"abcdef", b"abcdef"));
        assert!(!compare(b"xbcdef", b"abcdef"));
        assert!(!compare(b"abcdex", b"abcdef"));
    }
}
