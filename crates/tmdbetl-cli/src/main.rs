//! tmdbetl - TMDB popular movie/TV extraction to CSV.

/// Application configuration (TOML + environment).
mod config;
/// Extraction pipeline.
mod pipeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, load_env_file, resolve_api_key, resolve_config_path};
use crate::pipeline::{PipelineParams, run_pipeline};
use tmdbetl_api::{MediaType, TmdbClient};

/// CLI argument parser.
///
/// With no arguments, extracts popular movies then popular TV series
/// (4 pages each) into `data/raw`.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory (reads `{dir}/config.toml`).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Only extract this media type ("movie" or "tv").
    #[arg(long)]
    media_type: Option<MediaType>,

    /// Number of popular pages to fetch per media type.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Locale for popular, details and genre requests (e.g. "en-US").
    #[arg(long)]
    language: Option<String>,

    /// Path to a `.env` file (default: search from the working directory).
    #[arg(long)]
    env_file: Option<PathBuf>,
}

/// Builds a `TmdbClient` from the `TMDB_API_KEY` environment variable and
/// the `[tmdb]` config section.
///
/// # Errors
///
/// Returns an error if `TMDB_API_KEY` is not set, the base URL override is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_key = resolve_api_key()?;

    let mut builder = TmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(ref raw) = config.tmdb.base_url {
        let url = Url::parse(raw).with_context(|| format!("invalid tmdb.base_url: {raw}"))?;
        builder = builder.base_url(url);
    }
    if let Some(interval) = config.tmdb.min_interval() {
        builder = builder.min_interval(interval);
    }

    builder.build().context("failed to build TMDB client")
}

/// Loads configuration, then runs the pipeline for every selected media type.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the API key is missing, or
/// any pipeline run fails.
#[instrument(skip_all)]
async fn run(cli: Cli) -> Result<()> {
    let env_loaded = load_env_file(cli.env_file.as_deref())?;
    if env_loaded {
        tracing::debug!("loaded .env file");
    }

    let mut config = if let Some(config_path) = resolve_config_path(cli.dir.as_ref()) {
        let config = AppConfig::load(&config_path)?;
        tracing::debug!(path = %config_path.display(), "configuration loaded");
        config
    } else {
        tracing::debug!("no config location resolvable, using defaults");
        AppConfig::default()
    };

    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(language) = cli.language {
        config.tmdb.language = language;
    }

    let layout = config.output.to_layout()?;
    let runs = config.select_runs(cli.media_type, cli.pages);
    let client = build_tmdb_client(&config)?;

    for run in &runs {
        let params = PipelineParams {
            media_type: run.media_type,
            pages: run.pages,
            language: &config.tmdb.language,
        };
        let summary = run_pipeline(&client, &params, &layout)
            .await
            .with_context(|| format!("{} pipeline failed", run.media_type))?;

        if summary.reviews_unavailable > 0 || summary.details_unavailable > 0 {
            tracing::warn!(
                reviews_unavailable = summary.reviews_unavailable,
                details_unavailable = summary.details_unavailable,
                "{} lookups degraded to empty data",
                run.media_type
            );
        }
        tracing::info!("Items: {}", summary.written.items_path.display());
        tracing::info!("Reviews: {}", summary.written.reviews_path.display());
        tracing::info!("Details: {}", summary.written.details_path.display());
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    run(Cli::parse()).await
}
