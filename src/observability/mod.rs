//! Logging and span export.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer (stderr)
//!                            → tracing-opentelemetry → FileSpanExporter → JSON lines
//! ```
//!
//! The file exporter is only installed when a trace file is configured.

mod exporter;
mod init;

pub use init::init_tracing;
