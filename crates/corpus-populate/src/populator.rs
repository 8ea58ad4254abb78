//! Corpus driver: repeated emission up to an event or byte target.

use crate::error::PopulateError;
use corpus_generator::{EmissionPipeline, GenerationState};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for record writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// How much output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Exact number of records
    Events(u64),
    /// Stop once at least this many bytes are written
    Bytes(u64),
}

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of records written.
    pub events_written: u64,
    /// Bytes written, envelopes and newlines included.
    pub bytes_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating records.
    pub generation_duration: Duration,
    /// Time spent writing records.
    pub write_duration: Duration,
}

impl PopulateMetrics {
    /// Calculate events per second.
    pub fn events_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.events_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Bulk-indexing action line written before each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEnvelope {
    line: Vec<u8>,
}

impl BulkEnvelope {
    /// Envelope targeting the `<type>-<integration>.<stream>-default` data stream.
    pub fn new(
        data_stream_type: &str,
        integration: &str,
        data_stream: &str,
    ) -> Result<Self, PopulateError> {
        let index = format!("{data_stream_type}-{integration}.{data_stream}-default");
        let mut line = serde_json::to_vec(&serde_json::json!({ "create": { "_index": index } }))?;
        line.push(b'\n');
        Ok(Self { line })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.line
    }
}

/// Drives an emission pipeline into a sink.
pub struct CorpusDriver {
    pipeline: EmissionPipeline,
    state: GenerationState,
    envelope: Option<BulkEnvelope>,
}

impl CorpusDriver {
    pub fn new(pipeline: EmissionPipeline, state: GenerationState) -> Self {
        Self {
            pipeline,
            state,
            envelope: None,
        }
    }

    pub fn with_envelope(mut self, envelope: BulkEnvelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Generate records into `sink` until the target is reached.
    ///
    /// For a byte target, the planned event count is estimated once from the
    /// size of the first record. A failed write aborts the run; records
    /// already written stay in the sink.
    pub fn generate<W: Write>(
        &mut self,
        target: Target,
        sink: W,
    ) -> Result<PopulateMetrics, PopulateError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, sink);

        if let Target::Events(events) = target {
            self.state.set_total_events(events);
        }

        let mut generation_time = Duration::ZERO;
        let mut write_time = Duration::ZERO;
        let mut record = Vec::with_capacity(DEFAULT_BUFFER_SIZE);

        loop {
            let done = match target {
                Target::Events(events) => metrics.events_written >= events,
                Target::Bytes(bytes) => metrics.bytes_written >= bytes,
            };
            if done {
                break;
            }

            let gen_start = Instant::now();
            record.clear();
            if let Some(envelope) = &self.envelope {
                record.extend_from_slice(envelope.as_bytes());
            }
            self.pipeline.emit(&mut self.state, &mut record)?;
            record.push(b'\n');
            generation_time += gen_start.elapsed();

            if metrics.events_written == 0 {
                if let Target::Bytes(bytes) = target {
                    let planned = bytes.div_ceil(record.len() as u64).max(1);
                    self.state.set_total_events(planned);
                    info!(
                        "First record is {} bytes, planning {} events for {} bytes",
                        record.len(),
                        planned,
                        bytes
                    );
                }
            }

            let write_start = Instant::now();
            writer.write_all(&record)?;
            write_time += write_start.elapsed();

            metrics.events_written += 1;
            metrics.bytes_written += record.len() as u64;

            if metrics.events_written % 10000 == 0 {
                debug!(
                    "Written {} events ({} bytes)",
                    metrics.events_written, metrics.bytes_written
                );
            }
        }

        writer.flush()?;

        metrics.total_duration = start_time.elapsed();
        metrics.generation_duration = generation_time;
        metrics.write_duration = write_time;

        info!(
            "Corpus generation complete: {} events, {} bytes in {:?} ({:.2} events/sec)",
            metrics.events_written,
            metrics.bytes_written,
            metrics.total_duration,
            metrics.events_per_second()
        );

        Ok(metrics)
    }

    /// Generate records into a new file at `output_path`.
    pub fn populate<P: AsRef<Path>>(
        &mut self,
        output_path: P,
        target: Target,
    ) -> Result<PopulateMetrics, PopulateError> {
        let output_path = output_path.as_ref();
        info!(
            "Generating corpus file '{}' ({:?})",
            output_path.display(),
            target
        );

        let file = File::create(output_path)?;
        self.generate(target, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use corpus_core::{ConfigOverlay, FieldCatalog};
    use corpus_generator::{FieldBinder, PlaceholderEngine, TemplateEngine};
    use tempfile::TempDir;

    const FIELDS: &str = r#"
- name: event
  type: group
  fields:
    - name: kind
      type: keyword
      value: metric
    - name: sequence
      type: long
- name: "@timestamp"
  type: date
"#;

    fn driver(template: &[u8], overlay: &str, seed: u64) -> CorpusDriver {
        let catalog = FieldCatalog::from_yaml(FIELDS).unwrap();
        let overlay = ConfigOverlay::from_yaml(overlay).unwrap();
        let layout = PlaceholderEngine.parse(template).unwrap();
        let binder = FieldBinder::new(&catalog, &overlay);
        let mut state =
            GenerationState::seeded(seed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let pipeline = EmissionPipeline::compile(&layout, &binder, &mut state).unwrap();
        CorpusDriver::new(pipeline, state)
    }

    #[test]
    fn test_metrics() {
        let metrics = PopulateMetrics {
            events_written: 1000,
            bytes_written: 100000,
            total_duration: Duration::from_secs(10),
            generation_duration: Duration::from_secs(2),
            write_duration: Duration::from_secs(8),
        };

        assert_eq!(metrics.events_per_second(), 100.0);
        assert_eq!(metrics.bytes_per_second(), 10000.0);
        assert_eq!(PopulateMetrics::default().events_per_second(), 0.0);
    }

    #[test]
    fn test_event_target() {
        let mut driver = driver(br#"{"kind":{{.event.kind}}}"#, "", 42);
        let mut out = Vec::new();
        let metrics = driver.generate(Target::Events(5), &mut out).unwrap();

        assert_eq!(metrics.events_written, 5);
        assert_eq!(metrics.bytes_written, out.len() as u64);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"kind\":\"metric\"}\n".repeat(5)
        );
        assert_eq!(driver.state().total_events(), Some(5));
        assert_eq!(driver.state().event_index(), 5);
    }

    #[test]
    fn test_zero_events() {
        let mut driver = driver(br#"{"kind":{{.event.kind}}}"#, "", 42);
        let mut out = Vec::new();
        let metrics = driver.generate(Target::Events(0), &mut out).unwrap();
        assert_eq!(metrics.events_written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_byte_target_estimation() {
        // Every record is exactly 18 bytes: {"kind":"metric"}\n
        let mut driver = driver(br#"{"kind":{{.event.kind}}}"#, "", 42);
        let mut out = Vec::new();
        let metrics = driver.generate(Target::Bytes(100), &mut out).unwrap();

        assert_eq!(metrics.events_written, 6);
        assert_eq!(metrics.bytes_written, 108);
        assert_eq!(driver.state().total_events(), Some(6));
    }

    #[test]
    fn test_envelope_framing() {
        let envelope = BulkEnvelope::new("logs", "nginx", "access").unwrap();
        assert_eq!(
            envelope.as_bytes(),
            b"{\"create\":{\"_index\":\"logs-nginx.access-default\"}}\n"
        );

        let mut driver = driver(br#"{"kind":{{.event.kind}}}"#, "", 42).with_envelope(envelope);
        let mut out = Vec::new();
        driver.generate(Target::Events(2), &mut out).unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&out).unwrap().lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"create":{"_index":"logs-nginx.access-default"}}"#,
                r#"{"kind":"metric"}"#,
                r#"{"create":{"_index":"logs-nginx.access-default"}}"#,
                r#"{"kind":"metric"}"#,
            ]
        );
    }

    #[test]
    fn test_populate_file() {
        let mut driver = driver(
            br#"{"@timestamp":{{.@timestamp}},"seq":{{.event.sequence}}}"#,
            "fields:\n  - name: \"@timestamp\"\n    period: 1s\n",
            42,
        );
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("corpus.ndjson");

        let metrics = driver.populate(&output_path, Target::Events(10)).unwrap();
        assert_eq!(metrics.events_written, 10);

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(content.len() as u64, metrics.bytes_written);

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 10);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first["@timestamp"], "2024-01-01T00:00:00.000Z");
        assert_eq!(second["@timestamp"], "2024-01-01T00:00:01.000Z");
        assert!(first["seq"].is_i64());
    }

    #[test]
    fn test_deterministic_generation() {
        let template = br#"{"@timestamp":{{.@timestamp}},"seq":{{.event.sequence}}}"#;
        let mut out1 = Vec::new();
        let mut out2 = Vec::new();
        driver(template, "", 7)
            .generate(Target::Events(20), &mut out1)
            .unwrap();
        driver(template, "", 7)
            .generate(Target::Events(20), &mut out2)
            .unwrap();
        assert_eq!(out1, out2);
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_aborts() {
        let mut driver = driver(br#"{"kind":{{.event.kind}}}"#, "", 42);
        let result = driver.generate(Target::Events(100_000), FailingSink);
        assert!(matches!(result, Err(PopulateError::Io(_))));
    }
}
