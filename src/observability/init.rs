//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor the configuration sets one.
const DEFAULT_LEVEL: &str = "warn";

/// Installs the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. `"warn"`
///
/// Human-readable events go to stderr. When `config.trace_file` is set, spans
/// are also exported to that file as JSON lines.
///
/// Safe to call more than once; only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use feedscope::observability::init_tracing;
/// use feedscope::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let otel_layer = config.trace_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                // Span export is optional; keep going with stderr only.
                return None;
            }
        }
        let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", "feedscope")]);
        let provider = exporter::create_tracer_provider(path.clone(), resource);
        Some(OpenTelemetryLayer::new(provider.tracer("feedscope")))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
