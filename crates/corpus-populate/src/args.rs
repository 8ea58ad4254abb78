//! CLI argument definitions for corpus generation.

use crate::error::PopulateError;
use crate::populator::Target;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use corpus_generator::{FunctionCallEngine, PlaceholderEngine, TemplateEngine};
use std::path::PathBuf;

/// Default package registry queried for field definitions.
pub const DEFAULT_REGISTRY_URL: &str = "https://epr.elastic.co";

/// Template syntax choice for CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TemplateSyntax {
    /// `{{.field.name}}` placeholders
    #[default]
    Placeholder,
    /// `{{ generate "field.name" }}` actions
    FunctionCall,
}

impl TemplateSyntax {
    pub fn engine(&self) -> Box<dyn TemplateEngine> {
        match self {
            TemplateSyntax::Placeholder => Box::new(PlaceholderEngine),
            TemplateSyntax::FunctionCall => Box::new(FunctionCallEngine),
        }
    }
}

/// Where field definitions come from.
#[derive(Args, Clone, Debug)]
pub struct FieldSourceArgs {
    /// Local fields.yml file (skips the package registry)
    #[arg(long, short = 'f', conflicts_with = "package_version")]
    pub fields: Option<PathBuf>,

    /// Integration package name (e.g. nginx)
    #[arg(long)]
    pub integration: Option<String>,

    /// Data stream within the integration (e.g. access)
    #[arg(long)]
    pub data_stream: Option<String>,

    /// Integration package version
    #[arg(long)]
    pub package_version: Option<String>,

    /// Package registry base URL
    #[arg(long, env = "CORPUS_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// Timeout in seconds for each registry request
    #[arg(long, default_value = "30")]
    pub fetch_timeout_secs: u64,
}

/// Arguments for the generate command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: FieldSourceArgs,

    /// Config overlay YAML file (a missing file means no overrides)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Template file (default: a JSON object with every field)
    #[arg(long, short = 't')]
    pub template: Option<PathBuf>,

    /// Syntax of the template file
    #[arg(long, value_enum, default_value_t = TemplateSyntax::Placeholder)]
    pub template_syntax: TemplateSyntax,

    /// Number of events to generate
    #[arg(long, short = 'n', conflicts_with = "size", required_unless_present = "size")]
    pub events: Option<u64>,

    /// Approximate output size (e.g. 500MB, 2GiB, 10240)
    #[arg(long, value_parser = parse_size)]
    pub size: Option<u64>,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Anchor for generated dates, RFC 3339 (default: now)
    #[arg(long, value_parser = parse_start_time)]
    pub start_time: Option<DateTime<Utc>>,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Precede each record with a bulk `create` action line
    #[arg(long)]
    pub bulk: bool,

    /// Data stream type used in bulk index names
    #[arg(long, default_value = "logs")]
    pub data_stream_type: String,
}

impl GenerateArgs {
    pub fn target(&self) -> Result<Target, PopulateError> {
        match (self.events, self.size) {
            (Some(events), None) => Ok(Target::Events(events)),
            (None, Some(bytes)) => Ok(Target::Bytes(bytes)),
            _ => Err(PopulateError::InvalidTarget(
                "exactly one of --events or --size is required".to_string(),
            )),
        }
    }
}

/// Parse a byte size with an optional unit. Units are powers of 1024.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let number: f64 = number
        .parse()
        .map_err(|_| format!("invalid size '{input}'"))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => 1 << 10,
        "m" | "mb" | "mib" => 1 << 20,
        "g" | "gb" | "gib" => 1 << 30,
        "t" | "tb" | "tib" => 1 << 40,
        other => return Err(format!("unknown size unit '{other}' in '{input}'")),
    };

    let bytes = number * multiplier as f64;
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(format!("size '{input}' is too large"));
    }
    Ok(bytes.round() as u64)
}

fn parse_start_time(input: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid start time '{input}': {e}"))
}
