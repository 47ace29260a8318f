//! Benchmark driver.
//!
//! One session walks `Init -> GenerateData -> RunPair x5 -> Report -> Teardown`.
//! Each pair times the scalar call, then the accelerated call, against the
//! same borrowed regions. The timer brackets only the call itself.

use std::fmt;
use std::hint::black_box;
use std::time::Duration;

use common::{HarnessResult, OperationTimer};
use rand::Rng;
use tracing::{debug, error, info};

use crate::config::BenchmarkConfig;
use crate::reduce::{Accelerated, Reduction, Scalar};
use crate::region::{
    generate_byte_region, generate_integer_region, session_rng, ByteRegion, IntRegion,
};

pub const EXIT_SUCCESS: i32 = 0;
/// Session could not run (configuration or allocation failure)
pub const EXIT_ABORTED: i32 = 1;
/// Report was produced but some pair disagreed
pub const EXIT_MISMATCH: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Minimum,
    Maximum,
    Sum,
    Count,
    Compare,
}

impl Operation {
    /// Report order
    pub const ALL: [Operation; 5] = [
        Operation::Minimum,
        Operation::Maximum,
        Operation::Sum,
        Operation::Count,
        Operation::Compare,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Minimum => "minimum",
            Operation::Maximum => "maximum",
            Operation::Sum => "sum",
            Operation::Count => "count",
            Operation::Compare => "compare",
        }
    }

    /// Column label in the printed report
    pub const fn report_label(self) -> &'static str {
        match self {
            Operation::Minimum => "Min",
            Operation::Maximum => "Max",
            Operation::Sum => "Sum",
            Operation::Count => "Count",
            Operation::Compare => "Match",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Value(i64),
    Count(usize),
    Match(bool),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working for all three shapes.
        match self {
            Outcome::Value(value) => f.pad(&value.to_string()),
            Outcome::Count(count) => f.pad(&count.to_string()),
            Outcome::Match(true) => f.pad("True"),
            Outcome::Match(false) => f.pad("False"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub outcome: Outcome,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub operation: Operation,
    pub scalar: Measurement,
    pub accelerated: Measurement,
}

impl BenchmarkResult {
    pub fn is_consistent(&self) -> bool {
        self.scalar.outcome == self.accelerated.outcome
    }

    /// Scalar time over accelerated time. `None` when the accelerated call
    /// was below timer resolution.
    pub fn speedup(&self) -> Option<f64> {
        let accelerated = self.accelerated.duration.as_secs_f64();
        (accelerated > 0.0).then(|| self.scalar.duration.as_secs_f64() / accelerated)
    }
}

/// Regions owned by one session. Dropping this is the teardown step.
#[derive(Debug)]
pub struct SessionData {
    pub integers: IntRegion,
    pub original: ByteRegion,
    pub copy: ByteRegion,
}

impl SessionData {
    pub fn new(integers: IntRegion, original: ByteRegion) -> HarnessResult<Self> {
        let copy = original.duplicate()?;
        Ok(Self {
            integers,
            original,
            copy,
        })
    }

    pub fn generate<R: Rng>(rng: &mut R, length: usize) -> HarnessResult<Self> {
        let integers = generate_integer_region(rng, length)?;
        let original = generate_byte_region(rng, length)?;
        Self::new(integers, original)
    }

    /// Value `count` looks for: the last integer, so the count is at least one.
    pub fn probe(&self) -> i32 {
        self.integers.last_value().unwrap_or_default()
    }
}

/// @component: {"k":"C","id":"benchmark_session","t":"Scalar vs accelerated reduction session","m":{"cur":100,"tgt":100,"u":"%"},"f":["benchmark","simd"]}
/// Итог одной сессии: пять пар замеров в порядке отчёта
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub seed: u64,
    pub region_length: usize,
    pub scalar_label: &'static str,
    pub accelerated_label: &'static str,
    pub results: Vec<BenchmarkResult>,
}

impl SessionReport {
    pub fn is_consistent(&self) -> bool {
        self.results.iter().all(BenchmarkResult::is_consistent)
    }

    pub fn result(&self, operation: Operation) -> Option<&BenchmarkResult> {
        self.results.iter().find(|r| r.operation == operation)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scalar_tag = "(Scalar),".to_string();
        let accelerated_tag = format!("(Accelerated {}),", self.accelerated_label);
        let width = scalar_tag.len().max(accelerated_tag.len());

        for result in &self.results {
            for (tag, measurement) in [
                (&scalar_tag, &result.scalar),
                (&accelerated_tag, &result.accelerated),
            ] {
                writeln!(
                    f,
                    "{:<7} = {:>20} {:<width$} Duration = {:.6}",
                    result.operation.report_label(),
                    measurement.outcome,
                    tag,
                    measurement.duration.as_secs_f64(),
                    width = width,
                )?;
            }
        }
        Ok(())
    }
}

fn measure<F>(operation: Operation, variant: &'static str, items: usize, call: F) -> Measurement
where
    F: FnOnce() -> Outcome,
{
    let timer = OperationTimer::start(operation.name(), variant).with_items(items);
    let outcome = black_box(call());
    let duration = timer.finish();
    Measurement { outcome, duration }
}

fn run_pair<S, A>(operation: Operation, items: usize, scalar: S, accelerated: A) -> BenchmarkResult
where
    S: FnOnce() -> Outcome,
    A: FnOnce() -> Outcome,
{
    let scalar = measure(operation, "scalar", items, scalar);
    let accelerated = measure(operation, "accelerated", items, accelerated);
    let result = BenchmarkResult {
        operation,
        scalar,
        accelerated,
    };

    if !result.is_consistent() {
        error!(
            operation = operation.name(),
            scalar = %result.scalar.outcome,
            accelerated = %result.accelerated.outcome,
            "Scalar and accelerated results disagree"
        );
    }
    result
}

/// Run all five pairs against `data`, in report order.
pub fn measure_all(
    data: &SessionData,
    scalar: &dyn Reduction,
    accelerated: &dyn Reduction,
) -> Vec<BenchmarkResult> {
    let integers = data.integers.as_slice();
    let original = data.original.as_slice();
    let copy = data.copy.as_slice();
    let probe = data.probe();
    let n = integers.len();

    vec![
        run_pair(
            Operation::Minimum,
            n,
            || Outcome::Value(i64::from(scalar.minimum(black_box(integers)))),
            || Outcome::Value(i64::from(accelerated.minimum(black_box(integers)))),
        ),
        run_pair(
            Operation::Maximum,
            n,
            || Outcome::Value(i64::from(scalar.maximum(black_box(integers)))),
            || Outcome::Value(i64::from(accelerated.maximum(black_box(integers)))),
        ),
        run_pair(
            Operation::Sum,
            n,
            || Outcome::Value(scalar.sum(black_box(integers))),
            || Outcome::Value(accelerated.sum(black_box(integers))),
        ),
        run_pair(
            Operation::Count,
            n,
            || Outcome::Count(scalar.count(black_box(integers), probe)),
            || Outcome::Count(accelerated.count(black_box(integers), probe)),
        ),
        run_pair(
            Operation::Compare,
            original.len(),
            || Outcome::Match(scalar.compare(black_box(original), black_box(copy))),
            || Outcome::Match(accelerated.compare(black_box(original), black_box(copy))),
        ),
    ]
}

/// Session with the scalar loops against the best detected accelerated strategy.
pub fn run_session(config: &BenchmarkConfig) -> HarnessResult<SessionReport> {
    run_session_with(config, &Scalar, &Accelerated::detect())
}

pub fn run_session_with(
    config: &BenchmarkConfig,
    scalar: &dyn Reduction,
    accelerated: &dyn Reduction,
) -> HarnessResult<SessionReport> {
    run_session_reporting(config, scalar, accelerated, |_| {})
}

/// Same as [`run_session_with`], handing the finished report to `on_report`
/// while the session regions are still alive. Teardown follows it.
pub fn run_session_reporting<F>(
    config: &BenchmarkConfig,
    scalar: &dyn Reduction,
    accelerated: &dyn Reduction,
    on_report: F,
) -> HarnessResult<SessionReport>
where
    F: FnOnce(&SessionReport),
{
    config.validate()?;

    let (mut rng, seed) = session_rng(config.seed);
    info!(
        seed,
        region_length = config.region_length,
        scalar = scalar.label(),
        accelerated = accelerated.label(),
        "Benchmark session initialized"
    );

    let data = SessionData::generate(&mut rng, config.region_length)?;
    debug!(
        integers = data.integers.len(),
        bytes = data.original.len(),
        "Session data generated"
    );

    let results = measure_all(&data, scalar, accelerated);

    let report = SessionReport {
        seed,
        region_length: config.region_length,
        scalar_label: scalar.label(),
        accelerated_label: accelerated.label(),
        results,
    };
    for result in &report.results {
        info!(
            operation = result.operation.name(),
            scalar_secs = result.scalar.duration.as_secs_f64(),
            accelerated_secs = result.accelerated.duration.as_secs_f64(),
            speedup = result.speedup().unwrap_or(f64::NAN),
            consistent = result.is_consistent(),
            "Pair measured"
        );
    }

    // Отчёт отдаётся до освобождения регионов.
    on_report(&report);
    debug!("Session report emitted");

    drop(data);
    debug!("Session regions released");

    Ok(report)
}

/// Entry point for the process: one session with the default configuration.
///
/// Prints the report to stdout and returns the process status.
pub fn execute_benchmark_session() -> i32 {
    execute_with(&BenchmarkConfig::default())
}

pub fn execute_with(config: &BenchmarkConfig) -> i32 {
    let accelerated = Accelerated::detect();
    match run_session_reporting(config, &Scalar, &accelerated, |report| print!("{report}")) {
        Ok(report) => {
            if report.is_consistent() {
                EXIT_SUCCESS
            } else {
                error!(seed = report.seed, "Benchmark session finished with mismatches");
                EXIT_MISMATCH
            }
        }
        Err(err) => {
            error!(error = %err, fatal = err.is_fatal(), "Benchmark session aborted");
            EXIT_ABORTED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::Lanes;

    fn sample_data() -> SessionData {
        let integers = IntRegion::from(vec![5, -3, 8, 8, 0, -7, 8, 2, -3, 8]);
        let original = ByteRegion::from((0u8..10).collect::<Vec<_>>());
        SessionData::new(integers, original).unwrap()
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Match(true).to_string(), "True");
        assert_eq!(Outcome::Match(false).to_string(), "False");
        assert_eq!(format!("{:>6}", Outcome::Value(-7)), "    -7");
        assert_eq!(Outcome::Count(4).to_string(), "4");
    }

    #[test]
    fn test_measure_all_report_order() {
        let data = sample_data();
        let results = measure_all(&data, &Scalar, &Lanes);
        let order: Vec<Operation> = results.iter().map(|r| r.operation).collect();
        assert_eq!(order, Operation::ALL.to_vec());
        assert!(results.iter().all(BenchmarkResult::is_consistent));
    }

    #[test]
    fn test_inconsistent_pair_detected() {
        let result = BenchmarkResult {
            operation: Operation::Sum,
            scalar: Measurement {
                outcome: Outcome::Value(1),
                duration: Duration::from_micros(10),
            },
            accelerated: Measurement {
                outcome: Outcome::Value(2),
                duration: Duration::from_micros(5),
            },
        };
        assert!(!result.is_consistent());
        assert_eq!(result.speedup(), Some(2.0));
    }

    #[test]
    fn test_report_has_ten_lines_in_order() {
        let data = sample_data();
        let report = SessionReport {
            seed: 1,
            region_length: 10,
            scalar_label: "scalar",
            accelerated_label: "lanes",
            results: measure_all(&data, &Scalar, &Lanes),
        };
        let text = report.to_string();
        let labels: Vec<&str> = text
            .lines()
            .map(|line| line.split_whitespace().next().unwrap_or_default())
            .collect();
        assert_eq!(
            labels,
            ["Min", "Min", "Max", "Max", "Sum", "Sum", "Count", "Count", "Match", "Match"]
        );
        assert!(text.lines().nth(1).unwrap().contains("(Accelerated lanes),"));
        assert!(text.lines().last().unwrap().contains("True"));
    }

    #[test]
    fn test_zero_length_session_aborts() {
        let config = BenchmarkConfig::default().with_region_length(0);
        assert!(run_session(&config).is_err());
        assert_eq!(execute_with(&config), EXIT_ABORTED);
    }
}
