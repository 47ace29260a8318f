//! Scalar vs vectorized reduction benchmarks over large numeric regions.
//!
//! A session generates one integer region and two identical byte regions,
//! then times five operation pairs (minimum, maximum, sum, count, compare),
//! each once with plain loops and once with the best accelerated strategy the
//! CPU supports. Scalar and accelerated results must always agree.

pub mod benchmark;
pub mod config;
pub mod reduce;
pub mod region;
pub mod simd_feature_detection;

pub use benchmark::{
    execute_benchmark_session, execute_with, measure_all, run_session, run_session_reporting,
    run_session_with, BenchmarkResult, Measurement, Operation, Outcome, SessionData,
    SessionReport, EXIT_ABORTED, EXIT_MISMATCH, EXIT_SUCCESS,
};
pub use config::{BenchmarkConfig, REGION_SIZE};
pub use reduce::{available_strategies, Accelerated, IteratorAdaptors, Lanes, Reduction, Scalar};
#[cfg(target_arch = "x86_64")]
pub use reduce::{Avx2, Avx512};
pub use region::{
    copy_region, generate_byte_region, generate_integer_region, session_rng, ByteRegion,
    IntRegion,
};
pub use simd_feature_detection::SimdLevel;
