//! End-to-end tests for the generate command.

use chrono::{TimeZone, Utc};
use corpus_gen::generate::run_generate;
use corpus_populate::{FieldSourceArgs, GenerateArgs, TemplateSyntax, DEFAULT_REGISTRY_URL};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIELDS: &str = r#"
- name: "@timestamp"
  type: date
- name: host
  type: group
  fields:
    - name: name
      type: keyword
      example: web-01.example
    - name: ip
      type: ip
- name: http.response.status_code
  type: long
  example: 200
- name: source.geo.location
  type: geo_point
- name: labels.*
  type: keyword
- name: data_stream.type
  type: constant_keyword
  value: logs
"#;

const OVERLAY: &str = r#"
fields:
  - name: "@timestamp"
    period: 1s
  - name: host.name
    cardinality: {numerator: 1, denominator: 10}
  - name: http.response.status_code
    enum: ["200", "404", "500"]
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn args(fields: Option<PathBuf>, output: PathBuf) -> GenerateArgs {
    GenerateArgs {
        source: FieldSourceArgs {
            fields,
            integration: None,
            data_stream: None,
            package_version: None,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            fetch_timeout_secs: 5,
        },
        config: None,
        template: None,
        template_syntax: TemplateSyntax::Placeholder,
        events: Some(50),
        size: None,
        seed: Some(42),
        start_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        output: Some(output),
        bulk: false,
        data_stream_type: "logs".to_string(),
    }
}

fn lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("{line}: {e}")))
        .collect()
}

#[tokio::test]
async fn test_generate_default_template() {
    let dir = TempDir::new().unwrap();
    let fields = write(dir.path(), "fields.yml", FIELDS);
    let output = dir.path().join("corpus.ndjson");

    let mut args = args(Some(fields), output.clone());
    args.config = Some(write(dir.path(), "overlay.yml", OVERLAY));

    let metrics = run_generate(args).await.unwrap();
    assert_eq!(metrics.events_written, 50);

    let records = lines(&output);
    assert_eq!(records.len(), 50);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["data_stream.type"], "logs");
        let status = record["http.response.status_code"].as_i64().unwrap();
        assert!([200, 404, 500].contains(&status));
        assert!(record["host.ip"].is_string());
        assert!(record["source.geo.location"].is_string());

        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, i as u32).unwrap();
        assert_eq!(
            record["@timestamp"],
            expected.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
        );
    }

    // 50 events at 1/10 cardinality: a new host name every 5 events
    for window in records.chunks(5) {
        assert!(window.iter().all(|r| r["host.name"] == window[0]["host.name"]));
    }
}

#[tokio::test]
async fn test_generate_is_deterministic_across_syntaxes() {
    let dir = TempDir::new().unwrap();
    let fields = write(dir.path(), "fields.yml", FIELDS);

    let placeholder = write(
        dir.path(),
        "event.tpl",
        r#"{"ts":{{.@timestamp}},"host":{{.host.name}},{{.labels.*}}}"#,
    );
    let function_call = write(
        dir.path(),
        "event.gotmpl",
        r#"{"ts":{{ generate "@timestamp" }},"host":{{ generate "host.name" }},{{ generate "labels.*" }}}"#,
    );

    let first = dir.path().join("first.ndjson");
    let mut first_args = args(Some(fields.clone()), first.clone());
    first_args.template = Some(placeholder);
    run_generate(first_args).await.unwrap();

    let second = dir.path().join("second.ndjson");
    let mut second_args = args(Some(fields), second.clone());
    second_args.template = Some(function_call);
    second_args.template_syntax = TemplateSyntax::FunctionCall;
    run_generate(second_args).await.unwrap();

    let first = std::fs::read(&first).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, std::fs::read(&second).unwrap());
}

#[tokio::test]
async fn test_generate_from_registry_with_bulk_and_size() {
    let mut server = mockito::Server::new_async().await;
    let _manifest = server
        .mock("GET", "/package/nginx/1.2.0/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"assets": ["/package/nginx/1.2.0/data_stream/access/fields/fields.yml"]}"#)
        .create_async()
        .await;
    let _fields = server
        .mock("GET", "/package/nginx/1.2.0/data_stream/access/fields/fields.yml")
        .with_status(200)
        .with_body(FIELDS)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nginx.ndjson");
    let mut args = args(None, output.clone());
    args.source.integration = Some("nginx".to_string());
    args.source.data_stream = Some("access".to_string());
    args.source.package_version = Some("1.2.0".to_string());
    args.source.registry_url = server.url();
    args.events = None;
    args.size = Some(16 * 1024);
    args.bulk = true;

    let metrics = run_generate(args).await.unwrap();
    assert!(metrics.bytes_written >= 16 * 1024);

    let records = lines(&output);
    assert_eq!(records.len() as u64, metrics.events_written * 2);
    for pair in records.chunks(2) {
        assert_eq!(pair[0]["create"]["_index"], "logs-nginx.access-default");
        assert_eq!(pair[1]["data_stream.type"], "logs");
    }
}

#[tokio::test]
async fn test_unknown_template_field_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let fields = write(dir.path(), "fields.yml", FIELDS);
    let output = dir.path().join("corpus.ndjson");

    let mut args = args(Some(fields), output.clone());
    args.template = Some(write(dir.path(), "bad.tpl", r#"{"x":{{.no.such.field}}}"#));

    let err = run_generate(args).await.unwrap_err();
    assert!(format!("{err:#}").contains("no.such.field"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_invalid_overlay_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let fields = write(dir.path(), "fields.yml", FIELDS);
    let output = dir.path().join("corpus.ndjson");

    let mut args = args(Some(fields), output.clone());
    args.config = Some(write(
        dir.path(),
        "overlay.yml",
        "fields:\n  - name: host.name\n    fuzziness: 2.0\n",
    ));

    assert!(run_generate(args).await.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_bulk_requires_stream_names() {
    let dir = TempDir::new().unwrap();
    let fields = write(dir.path(), "fields.yml", FIELDS);
    let output = dir.path().join("corpus.ndjson");

    let mut args = args(Some(fields), output.clone());
    args.bulk = true;

    assert!(run_generate(args).await.is_err());
    assert!(!output.exists());
}
