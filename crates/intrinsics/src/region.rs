//! Owned numeric buffers and their generators.
//!
//! A region is populated once and never mutated afterwards. Storage is a
//! boxed slice, so it is released on every exit path, including the error
//! path out of a half-finished session.

use std::ops::Deref;
use std::time::{SystemTime, UNIX_EPOCH};

use common::{HarnessError, HarnessResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Fixed-length buffer of signed 32-bit integers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntRegion(Box<[i32]>);

/// Fixed-length buffer of bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRegion(Box<[u8]>);

impl IntRegion {
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Last element, used as the probe value for `count`.
    pub fn last_value(&self) -> Option<i32> {
        self.0.last().copied()
    }
}

impl ByteRegion {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Independent snapshot of this region.
    pub fn duplicate(&self) -> HarnessResult<ByteRegion> {
        copy_region(&self.0)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }
}

impl Deref for IntRegion {
    type Target = [i32];

    fn deref(&self) -> &[i32] {
        &self.0
    }
}

impl Deref for ByteRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<i32>> for IntRegion {
    fn from(values: Vec<i32>) -> Self {
        Self(values.into_boxed_slice())
    }
}

impl From<Vec<u8>> for ByteRegion {
    fn from(values: Vec<u8>) -> Self {
        Self(values.into_boxed_slice())
    }
}

fn allocate<T>(region: &'static str, length: usize) -> HarnessResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(length)
        .map_err(|source| HarnessError::allocation(region, length, source))?;
    Ok(buffer)
}

/// Random integers in `[-range, range]`, where `range` is drawn once per call.
pub fn generate_integer_region<R: Rng>(
    rng: &mut R,
    length: usize,
) -> HarnessResult<IntRegion> {
    let range = rng.gen_range(0..=i32::MAX);
    let mut values = allocate::<i32>("integer", length)?;
    values.extend((0..length).map(|_| rng.gen_range(-range..=range)));
    debug!(length, range, "Generated integer region");
    Ok(IntRegion(values.into_boxed_slice()))
}

/// Uniformly random bytes.
pub fn generate_byte_region<R: Rng>(
    rng: &mut R,
    length: usize,
) -> HarnessResult<ByteRegion> {
    let mut bytes = allocate::<u8>("byte", length)?;
    bytes.resize(length, 0);
    rng.fill(&mut bytes[..]);
    debug!(length, "Generated byte region");
    Ok(ByteRegion(bytes.into_boxed_slice()))
}

/// Element-wise copy into a fresh allocation.
pub fn copy_region(source: &[u8]) -> HarnessResult<ByteRegion> {
    let mut bytes = allocate::<u8>("byte copy", source.len())?;
    bytes.extend_from_slice(source);
    Ok(ByteRegion(bytes.into_boxed_slice()))
}

/// Generator for one session, plus the seed it was built from.
///
/// Without an explicit seed the wall clock is read once; the caller should
/// log the returned seed so the run can be replayed.
pub fn session_rng(seed: Option<u64>) -> (ChaCha8Rng, u64) {
    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default()
    });
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_region_within_shared_range() {
        let (mut rng, _) = session_rng(Some(11));
        let region = generate_integer_region(&mut rng, 4_099).unwrap();
        assert_eq!(region.len(), 4_099);

        // All values must fit one symmetric range, so max |x| bounds every element.
        let bound = region.iter().map(|v| v.unsigned_abs()).max().unwrap();
        assert!(region.iter().all(|v| v.unsigned_abs() <= bound));
    }

    #[test]
    fn test_same_seed_same_regions() {
        let (mut a, _) = session_rng(Some(99));
        let (mut b, _) = session_rng(Some(99));
        assert_eq!(
            generate_integer_region(&mut a, 257).unwrap(),
            generate_integer_region(&mut b, 257).unwrap()
        );
        assert_eq!(
            generate_byte_region(&mut a, 257).unwrap(),
            generate_byte_region(&mut b, 257).unwrap()
        );
    }

    #[test]
    fn test_session_rng_reports_seed() {
        let (_, seed) = session_rng(Some(5));
        assert_eq!(seed, 5);
    }

    #[test]
    fn test_byte_region_length() {
        let (mut rng, _) = session_rng(Some(3));
        let region = generate_byte_region(&mut rng, 33).unwrap();
        assert_eq!(region.as_slice().len(), 33);
    }

    #[test]
    fn test_copy_region_is_distinct_allocation() {
        let original = ByteRegion::from(vec![1u8, 2, 3, 4, 5]);
        let copy = original.duplicate().unwrap();
        assert_eq!(original, copy);
        assert_ne!(original.as_ptr(), copy.as_ptr());

        let mut mutated = copy.into_vec();
        mutated[0] = 9;
        assert_eq!(original.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_last_value() {
        let region = IntRegion::from(vec![4, -1, 7]);
        assert_eq!(region.last_value(), Some(7));
    }
}
