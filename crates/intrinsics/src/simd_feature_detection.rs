//! Runtime SIMD feature detection for the accelerated reductions.
//!
//! Детекция выполняется один раз на процесс. `INTRINSICS_SIMD` может только
//! ограничить уровень (`off`, `scalar`, `portable`, `avx2` или `avx512`), но
//! никогда не поднимает его выше того, что сообщает CPU.
//!
//! Safety
//! - В модуле нет `unsafe`: только `is_x86_feature_detected!` и кэш в `OnceLock`.

use std::env;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

pub const SIMD_ENV: &str = "INTRINSICS_SIMD";

static LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// @component: {"k":"C","id":"simd_feature_detection","t":"Runtime SIMD level selection","m":{"cur":100,"tgt":100,"u":"%"}}
/// Best instruction set the accelerated path may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdLevel {
    /// Fixed-width lane arrays, left to the compiler's autovectorizer
    Portable,
    Avx2,
    /// AVX-512F вместе с AVX-512BW (нужен для сравнения байт)
    Avx512,
}

impl SimdLevel {
    /// Detected level with the environment cap applied. Cached.
    pub fn detect() -> Self {
        *LEVEL.get_or_init(|| {
            let hardware = Self::detect_hardware();
            let cap = match env::var(SIMD_ENV) {
                Ok(value) => {
                    let parsed = parse_cap(&value);
                    if parsed.is_none() {
                        warn!(value = %value, "Ignoring unrecognized {}", SIMD_ENV);
                    }
                    parsed
                }
                Err(_) => None,
            };
            let level = capped(hardware, cap);
            info!(
                hardware = hardware.label(),
                selected = level.label(),
                "SIMD feature detection complete"
            );
            level
        })
    }

    #[cfg(target_arch = "x86_64")]
    pub fn detect_hardware() -> Self {
        if is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512bw") {
            SimdLevel::Avx512
        } else if is_x86_feature_detected!("avx2") {
            SimdLevel::Avx2
        } else {
            debug!("AVX2 not available, using portable lanes");
            SimdLevel::Portable
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    pub fn detect_hardware() -> Self {
        debug!("Non-x86_64 architecture, using portable lanes");
        SimdLevel::Portable
    }

    pub const fn label(self) -> &'static str {
        match self {
            SimdLevel::Portable => "portable",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Avx512 => "avx512",
        }
    }
}

/// Parse an `INTRINSICS_SIMD` value into the highest level it allows.
pub fn parse_cap(value: &str) -> Option<SimdLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "0" | "off" | "false" | "scalar" | "portable" => Some(SimdLevel::Portable),
        "avx2" => Some(SimdLevel::Avx2),
        "avx512" | "avx512f" => Some(SimdLevel::Avx512),
        _ => None,
    }
}

pub fn capped(hardware: SimdLevel, cap: Option<SimdLevel>) -> SimdLevel {
    cap.map_or(hardware, |cap| hardware.min(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cap() {
        assert_eq!(parse_cap("off"), Some(SimdLevel::Portable));
        assert_eq!(parse_cap(" AVX2 "), Some(SimdLevel::Avx2));
        assert_eq!(parse_cap("avx512"), Some(SimdLevel::Avx512));
        assert_eq!(parse_cap("neon"), None);
    }

    #[test]
    fn test_cap_never_raises_level() {
        assert_eq!(
            capped(SimdLevel::Portable, Some(SimdLevel::Avx2)),
            SimdLevel::Portable
        );
        assert_eq!(
            capped(SimdLevel::Avx2, Some(SimdLevel::Portable)),
            SimdLevel::Portable
        );
        assert_eq!(capped(SimdLevel::Avx2, None), SimdLevel::Avx2);
        assert_eq!(
            capped(SimdLevel::Avx512, Some(SimdLevel::Avx2)),
            SimdLevel::Avx2
        );
        assert_eq!(
            capped(SimdLevel::Avx2, Some(SimdLevel::Avx512)),
            SimdLevel::Avx2
        );
    }

    #[test]
    fn test_detect_is_stable() {
        let first = SimdLevel::detect();
        assert_eq!(first, SimdLevel::detect());
        assert!(first <= SimdLevel::detect_hardware());
    }
}
