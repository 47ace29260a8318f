use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// @component: {"k":"C","id":"structured_logging","t":"JSON structured logging to stderr","m":{"cur":100,"tgt":100,"u":"%"},"f":["logging","json","timing"]}
/// Структурированная запись лога в JSON формате
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLogEntry {
    /// Временная метка в ISO 8601 формате
    pub timestamp: String,
    pub level: String,
    /// Целевой модуль
    pub target: String,
    pub message: String,
    /// Остальные поля события, на верхнем уровне JSON
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ExecutionContext>,
    /// Метрики замера, если событие их несёт
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
}

/// Process identity attached to every JSON record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub app_version: String,
    pub pid: u32,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            pid: std::process::id(),
        }
    }
}

/// Поля замера, извлечённые из события (`duration_ms`, `items_count`, `throughput`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub duration_ms: Option<f64>,
    pub items_processed: Option<u64>,
    /// Elements per second
    pub throughput: Option<f64>,
}

/// JSON слой: одна строка на событие, только в stderr (stdout занят отчётом).
pub struct JsonFormatter;

impl<S> Layer<S> for JsonFormatter
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let performance = visitor.extract_performance_metrics();

        let entry = StructuredLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: event.metadata().level().to_string(),
            target: event.metadata().target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
            context: Some(ExecutionContext::default()),
            performance,
        };

        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = writeln!(io::stderr(), "{}", json);
        }
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: HashMap<String, Value>,
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                Value::String(format!("{:?}", value)),
            );
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.fields.insert(field.name().to_string(), Value::Number(n));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), Value::Bool(value));
    }
}

impl JsonVisitor {
    fn extract_performance_metrics(&self) -> Option<PerformanceMetrics> {
        let metrics = PerformanceMetrics {
            duration_ms: self.fields.get("duration_ms").and_then(Value::as_f64),
            items_processed: self.fields.get("items_count").and_then(Value::as_u64),
            throughput: self.fields.get("throughput").and_then(Value::as_f64),
        };

        if metrics.duration_ms.is_some()
            || metrics.items_processed.is_some()
            || metrics.throughput.is_some()
        {
            Some(metrics)
        } else {
            None
        }
    }
}

/// Конфигурация логирования
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level when `RUST_LOG` is not set
    pub level: Level,
    pub json_output: bool,
    /// Only applies to the human-readable format
    pub color_output: bool,
    pub include_line_numbers: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_output: false,
            color_output: true,
            include_line_numbers: cfg!(debug_assertions),
        }
    }
}

/// Инициализация глобального subscriber. Повторный вызов возвращает ошибку.
pub fn init_structured_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    if config.json_output {
        let subscriber = Registry::default().with(env_filter).with(JsonFormatter);

        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_line_number(config.include_line_numbers)
            .with_ansi(config.color_output);

        let subscriber = Registry::default().with(env_filter).with(fmt_layer);

        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Brackets a single measured call.
///
/// The clock is read before anything is logged, so the returned duration
/// covers only the work between `start` and `finish`.
pub struct OperationTimer {
    start: Instant,
    operation: &'static str,
    variant: &'static str,
    items: Option<u64>,
}

impl OperationTimer {
    pub fn start(operation: &'static str, variant: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
            variant,
            items: None,
        }
    }

    pub fn with_items(mut self, items: usize) -> Self {
        self.items = Some(items as u64);
        self
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        let duration_ms = elapsed.as_secs_f64() * 1_000.0;

        match self.items {
            Some(items) => {
                let secs = elapsed.as_secs_f64();
                let throughput = if secs > 0.0 { items as f64 / secs } else { 0.0 };
                tracing::debug!(
                    operation = self.operation,
                    variant = self.variant,
                    duration_ms = duration_ms,
                    items_count = items,
                    throughput = throughput,
                    "Operation completed"
                );
            }
            None => {
                tracing::debug!(
                    operation = self.operation,
                    variant = self.variant,
                    duration_ms = duration_ms,
                    "Operation completed"
                );
            }
        }

        elapsed
    }
}
