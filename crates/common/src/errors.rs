use std::collections::TryReserveError;
use thiserror::Error;

/// @component: {"k":"C","id":"harness_errors","t":"Benchmark harness error types","m":{"cur":100,"tgt":100,"u":"%"}}
/// Error hierarchy for the benchmark harness.
///
/// Only region allocation can fail at runtime. Configuration errors are
/// caught before the first allocation so a session never starts half-built.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Allocation failed: {region} region of {length} elements: {source}")]
    Allocation {
        region: &'static str,
        length: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    pub fn allocation(region: &'static str, length: usize, source: TryReserveError) -> Self {
        Self::Allocation {
            region,
            length,
            source,
        }
    }

    /// True for errors that must abort the whole session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}
