//! Command-line interface for corpus-gen
//!
//! # Usage Examples
//!
//! ```bash
//! # Records from a local fields file with the default JSON template
//! corpus-gen generate --fields fields.yml --events 1000
//!
//! # Records from the package registry with a custom template and overlay
//! corpus-gen generate \
//!   --integration aws --data-stream dynamodb --package-version 2.4.0 \
//!   --config overlay.yml --template event.tpl \
//!   --size 1GiB --output dynamodb.ndjson
//!
//! # Function-call template syntax, bulk framing, fixed seed and start time
//! corpus-gen generate --fields fields.yml --events 100 \
//!   --template event.gotmpl --template-syntax function-call \
//!   --integration nginx --data-stream access --bulk \
//!   --seed 42 --start-time 2024-01-01T00:00:00Z
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to see progress on stderr.

use clap::{Parser, Subcommand};
use corpus_gen::generate::run_generate;
use corpus_populate::GenerateArgs;

#[derive(Parser)]
#[command(name = "corpus-gen")]
#[command(about = "Generate schema-conformant event corpora for testing")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate newline-delimited records
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so stdout can carry the corpus
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let metrics = run_generate(args).await?;
            tracing::info!(
                "Generated {} events ({} bytes) in {:?}, {:.2} events/sec, {:.2} bytes/sec",
                metrics.events_written,
                metrics.bytes_written,
                metrics.total_duration,
                metrics.events_per_second(),
                metrics.bytes_per_second()
            );
        }
    }

    Ok(())
}
