use anyhow::Result;
use clap::Parser;
use common::{init_structured_logging, LoggingConfig};
use intrinsics::{execute_with, BenchmarkConfig};
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "intrinsics-bench")]
#[command(about = "Times scalar and accelerated reductions over one random region")]
#[command(version)]
struct Cli {
    /// Seed for the region generator (default: wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Emit diagnostics on stderr as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Diagnostic level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_structured_logging(LoggingConfig {
        level: cli.log_level,
        json_output: cli.json_logs,
        ..LoggingConfig::default()
    })?;
    debug!(?cli, "starting benchmark session");

    let config = BenchmarkConfig {
        seed: cli.seed,
        ..BenchmarkConfig::default()
    };

    let status = execute_with(&config);
    std::process::exit(status);
}
