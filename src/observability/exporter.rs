//! File-based OpenTelemetry span exporter.
//!
//! Each exported span becomes one JSON line. When the file grows past
//! [`MAX_FILE_SIZE_BYTES`] it is moved aside to `<file>.1` (replacing any older
//! backup) and a fresh file is started.

use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::Value;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Size after which the trace file is rotated (5 MB).
const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

struct FileSpanExporter {
    file_path: PathBuf,
    service: String,
    is_shutdown: bool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, resource: &Resource) -> Self {
        let service = resource
            .get(opentelemetry::Key::from_static_str("service.name"))
            .map_or_else(|| "feedscope".to_string(), |v| v.to_string());
        Self {
            file_path,
            service,
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> std::io::Result<()> {
        if fs::metadata(&self.file_path).is_ok_and(|m| m.len() > MAX_FILE_SIZE_BYTES) {
            fs::rename(&self.file_path, backup_path(&self.file_path))?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.file_path)?;
        for span in batch {
            writeln!(file, "{}", self.format_span(span))?;
        }
        file.flush()
    }

    fn format_span(&self, span: &SpanData) -> JsonValue {
        let attributes: Map<String, JsonValue> = span
            .attributes
            .iter()
            .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
            .collect();
        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| json!({ "name": event.name, "timeUnixNano": unix_nanos(event.timestamp) }))
            .collect();
        let parent = (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id));
        let error = match &span.status {
            Status::Error { description } => Some(description.to_string()),
            Status::Unset | Status::Ok => None,
        };

        json!({
            "service": self.service,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "name": span.name,
            "startTimeUnixNano": unix_nanos(span.start_time),
            "endTimeUnixNano": unix_nanos(span.end_time),
            "attributes": attributes,
            "events": events,
            "error": error,
        })
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch).map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("file_path", &self.file_path)
            .field("is_shutdown", &self.is_shutdown)
            .finish_non_exhaustive()
    }
}

/// `spans.log` -> `spans.log.1`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

/// Creates a tracer provider that exports every finished span to `file_path`.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
