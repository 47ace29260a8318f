use common::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};

/// Elements per region in a session. Odd on purpose so every vector width
/// leaves a remainder.
pub const REGION_SIZE: usize = 1_000_003;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub region_length: usize,
    /// `None` seeds from the wall clock
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            region_length: REGION_SIZE,
            seed: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_region_length(mut self, region_length: usize) -> Self {
        self.region_length = region_length;
        self
    }

    pub fn validate(&self) -> HarnessResult<()> {
        if self.region_length == 0 {
            return Err(HarnessError::Configuration(
                "region length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
