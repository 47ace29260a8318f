use super::{Lanes, Reduction};
use crate::simd_feature_detection::SimdLevel;

#[cfg(target_arch = "x86_64")]
use super::{Avx2, Avx512};

/// Best vectorized strategy for this machine.
///
/// Resolved once at construction; each call then goes straight to the chosen
/// backend.
#[derive(Debug, Clone, Copy)]
pub struct Accelerated {
    backend: Backend,
}

#[derive(Debug, Clone, Copy)]
enum Backend {
    Lanes(Lanes),
    #[cfg(target_arch = "x86_64")]
    Avx2(Avx2),
    #[cfg(target_arch = "x86_64")]
    Avx512(Avx512),
}

impl Accelerated {
    pub fn detect() -> Self {
        Self::for_level(SimdLevel::detect())
    }

    /// Steps down one level at a time until the CPU supports it, ending at
    /// portable lanes.
    pub fn for_level(level: SimdLevel) -> Self {
        let backend = match level {
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx512 => Avx512::detect()
                .map(Backend::Avx512)
                .or_else(|| Avx2::detect().map(Backend::Avx2)),
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => Avx2::detect().map(Backend::Avx2),
            _ => None,
        };
        Self {
            backend: backend.unwrap_or(Backend::Lanes(Lanes)),
        }
    }

    pub fn level(&self) -> SimdLevel {
        match self.backend {
            Backend::Lanes(_) => SimdLevel::Portable,
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2(_) => SimdLevel::Avx2,
            #[cfg(target_arch = "x86_64")]
            Backend::Avx512(_) => SimdLevel::Avx512,
        }
    }

    fn backend(&self) -> &dyn Reduction {
        match &self.backend {
            Backend::Lanes(lanes) => lanes,
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2(avx2) => avx2,
            #[cfg(target_arch = "x86_64")]
            Backend::Avx512(avx512) => avx512,
        }
    }
}

impl Reduction for Accelerated {
    fn label(&self) -> &'static str {
        match self.level() {
            SimdLevel::Portable => "auto/portable",
            SimdLevel::Avx2 => "auto/avx2",
            SimdLevel::Avx512 => "auto/avx512",
        }
    }

    fn minimum(&self, region: &[i32]) -> i32 {
        self.backend().minimum(region)
    }

    fn maximum(&self, region: &[i32]) -> i32 {
        self.backend().maximum(region)
    }

    fn sum(&self, region: &[i32]) -> i64 {
        self.backend().sum(region)
    }

    fn count(&self, region: &[i32], item: i32) -> usize {
        self.backend().count(region, item)
    }

    fn compare(&self, left: &[u8], right: &[u8]) -> bool {
        self.backend().compare(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portable_level_uses_lanes() {
        let accelerated = Accelerated::for_level(SimdLevel::Portable);
        assert_eq!(accelerated.level(), SimdLevel::Portable);
        assert_eq!(accelerated.label(), "auto/portable");
    }

    #[test]
    fn test_requested_level_never_exceeds_hardware() {
        for level in [SimdLevel::Avx2, SimdLevel::Avx512] {
            let accelerated = Accelerated::for_level(level);
            assert!(accelerated.level() <= level);
            assert!(accelerated.level() <= SimdLevel::detect_hardware());
        }
    }

    #[test]
    fn test_avx512_request_lands_on_best_available() {
        let accelerated = Accelerated::for_level(SimdLevel::Avx512);
        assert_eq!(accelerated.level(), SimdLevel::detect_hardware());
        assert!(accelerated.label().ends_with(accelerated.level().label()));
    }
}
