//! Generate command handler.

use anyhow::{bail, Context};
use corpus_core::{ConfigOverlay, FieldCatalog};
use corpus_generator::{
    default_template, EmissionPipeline, FieldBinder, GenerationState, TemplateEngine,
};
use corpus_populate::{
    BulkEnvelope, CorpusDriver, FieldSourceArgs, GenerateArgs, PopulateMetrics,
};
use field_source::{CachedFieldSource, PackageKey, RegistryClient};
use std::sync::Arc;
use std::time::Duration;

/// Run the generate command.
pub async fn run_generate(args: GenerateArgs) -> anyhow::Result<PopulateMetrics> {
    let catalog = load_catalog(&args.source).await?;
    tracing::info!("Using {} field definitions", catalog.len());

    let overlay = match &args.config {
        Some(path) => ConfigOverlay::from_file(path)
            .with_context(|| format!("Failed to load config overlay from {path:?}"))?,
        None => ConfigOverlay::default(),
    };
    tracing::debug!("Config overlay has {} overrides", overlay.len());

    let template = match &args.template {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read template file: {path:?}"))?,
        None => default_template(&catalog).context("Failed to build default template")?,
    };
    let layout = args
        .template_syntax
        .engine()
        .parse(&template)
        .context("Failed to parse template")?;

    let mut state = GenerationState::from_options(args.seed, args.start_time);
    let binder = FieldBinder::new(&catalog, &overlay);
    let pipeline = EmissionPipeline::compile(&layout, &binder, &mut state)
        .context("Failed to compile template")?;

    let mut driver = CorpusDriver::new(pipeline, state);
    if args.bulk {
        let (Some(integration), Some(data_stream)) =
            (&args.source.integration, &args.source.data_stream)
        else {
            bail!("--bulk requires --integration and --data-stream to name the target index");
        };
        driver = driver.with_envelope(BulkEnvelope::new(
            &args.data_stream_type,
            integration,
            data_stream,
        )?);
    }

    let target = args.target()?;
    let metrics = match &args.output {
        Some(path) => driver
            .populate(path, target)
            .with_context(|| format!("Failed to write corpus to {path:?}"))?,
        None => driver
            .generate(target, std::io::stdout().lock())
            .context("Failed to write corpus to stdout")?,
    };

    Ok(metrics)
}

async fn load_catalog(source: &FieldSourceArgs) -> anyhow::Result<Arc<FieldCatalog>> {
    if let Some(path) = &source.fields {
        let catalog = FieldCatalog::from_file(path)
            .and_then(FieldCatalog::ensure_not_empty)
            .with_context(|| format!("Failed to load field definitions from {path:?}"))?;
        return Ok(Arc::new(catalog));
    }

    let (Some(integration), Some(data_stream), Some(version)) = (
        &source.integration,
        &source.data_stream,
        &source.package_version,
    ) else {
        bail!(
            "either --fields or all of --integration, --data-stream and --package-version are required"
        );
    };

    let timeout = Duration::from_secs(source.fetch_timeout_secs);
    let client = RegistryClient::new(&source.registry_url, timeout)?;
    let cache = CachedFieldSource::with_limits(
        client,
        field_source::DEFAULT_MAX_CONCURRENT_FETCHES,
        timeout,
    );

    let key = PackageKey::new(integration, data_stream, version);
    tracing::info!("Fetching field definitions for {key} from {}", source.registry_url);
    cache
        .get(&key)
        .await
        .with_context(|| format!("Failed to load field definitions for {key}"))
}
