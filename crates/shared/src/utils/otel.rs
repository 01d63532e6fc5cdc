use crate::utils::metrics::{Method, Metrics, Status};
use anyhow::{Context as _, Result};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider,
};
use tokio::time::Instant;
use tracing::{error, info, warn};

/// OTLP exporters for traces, metrics and logs of one service.
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    logger_provider: SdkLoggerProvider,
}

impl Telemetry {
    pub fn init(service_name: &str, otel_endpoint: &str) -> Result<Self> {
        let resource = Resource::builder()
            .with_service_name(service_name.to_string())
            .build();

        let span_exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(otel_endpoint)
            .build()
            .context("Failed to create span exporter")?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_batch_exporter(span_exporter)
            .build();

        let metric_exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(otel_endpoint)
            .build()
            .context("Failed to create metric exporter")?;

        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource.clone())
            .with_periodic_exporter(metric_exporter)
            .build();

        let log_exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(otel_endpoint)
            .build()
            .context("Failed to create log exporter")?;

        let logger_provider = SdkLoggerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(log_exporter)
            .build();

        global::set_tracer_provider(tracer_provider.clone());
        global::set_meter_provider(meter_provider.clone());

        Ok(Self {
            tracer_provider,
            meter_provider,
            logger_provider,
        })
    }

    pub fn logger_provider(&self) -> &SdkLoggerProvider {
        &self.logger_provider
    }

    pub fn shutdown(self) -> Result<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.tracer_provider.shutdown() {
            errors.push(format!("tracer provider: {e}"));
        }
        if let Err(e) = self.meter_provider.shutdown() {
            errors.push(format!("meter provider: {e}"));
        }
        if let Err(e) = self.logger_provider.shutdown() {
            errors.push(format!("logger provider: {e}"));
        }

        if !errors.is_empty() {
            anyhow::bail!("Failed to shutdown providers:\n{}", errors.join("\n"));
        }

        Ok(())
    }
}

pub struct TracingContext {
    pub cx: Context,
    pub operation: String,
    pub start_time: Instant,
}

/// Opens one server span per service operation and closes it together with the
/// Prometheus sample for that operation.
#[derive(Clone)]
pub struct OperationTracer {
    scope: &'static str,
    metrics: Metrics,
}

impl OperationTracer {
    pub fn new(scope: &'static str, metrics: Metrics) -> Self {
        Self { scope, metrics }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn tracer(&self) -> BoxedTracer {
        global::tracer(self.scope)
    }

    pub fn start(&self, operation: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.tracer();
        let mut span = tracer
            .span_builder(operation.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation.to_string())],
        );

        TracingContext {
            cx: Context::current_with_span(span),
            operation: operation.to_string(),
            start_time,
        }
    }

    pub fn success(&self, ctx: &TracingContext, method: Method, message: &str) {
        info!("✅ Operation completed successfully: {message}");
        self.finish(ctx, method, Status::Success, message);
    }

    /// Client-caused failures are logged at warn, everything else at error.
    pub fn failure(&self, ctx: &TracingContext, method: Method, message: &str, client_error: bool) {
        if client_error {
            warn!("⚠️ Operation rejected: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }
        self.finish(ctx, method, Status::Error, message);
    }

    fn finish(&self, ctx: &TracingContext, method: Method, status: Status, message: &str) {
        let status_str = match status {
            Status::Success => "SUCCESS",
            Status::Error => "ERROR",
        };
        let elapsed = ctx.start_time.elapsed().as_secs_f64();

        let span = ctx.cx.span();
        span.add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        self.metrics
            .record(method, &ctx.operation, status, elapsed);

        span.end();
    }
}
