//! Monitoring Module
//!
//! Structured logging setup for embedding applications.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LogLevel, LoggerConfig};
