use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_appender::{
    non_blocking,
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerOptions {
    pub is_dev: bool,
    pub enable_file: bool,
}

/// Installs the global subscriber: pretty console output filtered by `RUST_LOG`,
/// an optional JSON file sink, and the OpenTelemetry log bridge.
///
/// The returned guard flushes the file writer when dropped, so keep it alive for
/// the lifetime of the process.
pub fn init_logger(
    sdk_logger_provider: &SdkLoggerProvider,
    component: &str,
    options: LoggerOptions,
) -> Option<WorkerGuard> {
    let (file_layer, guard) = if options.enable_file {
        let log_dir = if options.is_dev { "./logs" } else { "/var/log/app" };
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, log_dir, format!("{component}.log"));
        let (file_writer, guard) = non_blocking(file_appender);

        let layer = fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .json()
            .with_filter(EnvFilter::new("info"));

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let default_console = if options.is_dev { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_console));

    let console_layer = fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_ansi(options.is_dev)
        .with_filter(console_filter);

    let otel_filter = ["hyper", "opentelemetry", "tonic", "h2", "sqlx"]
        .iter()
        .filter_map(|target| format!("{target}=off").parse().ok())
        .fold(EnvFilter::new("info"), |filter, directive| {
            filter.add_directive(directive)
        });

    let otel_layer = OpenTelemetryTracingBridge::new(sdk_logger_provider).with_filter(otel_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(otel_layer)
        .init();

    guard
}
