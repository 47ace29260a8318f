pub mod errors;
pub mod structured_logging;

pub use errors::{HarnessError, HarnessResult};
pub use structured_logging::{
    init_structured_logging, ExecutionContext, LoggingConfig, OperationTimer,
    PerformanceMetrics, StructuredLogEntry,
};
