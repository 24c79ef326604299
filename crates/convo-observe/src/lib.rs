//! Observability for convo: subscriber setup and optional OpenTelemetry export.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, init_tracing, shutdown_tracing};
