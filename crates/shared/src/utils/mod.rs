mod logs;
mod metrics;
mod otel;

pub use self::logs::{LoggerOptions, init_logger};
pub use self::metrics::{Method, Metrics, Status};
pub use self::otel::{OperationTracer, Telemetry, TracingContext};
