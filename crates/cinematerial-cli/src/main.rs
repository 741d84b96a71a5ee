//! cinematerial - Cinematerial movie poster lookup CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, API_SECRET_ENV, AppConfig, resolve_config_path};
use cinematerial_api::{
    CinematerialClient, CinematerialResult, ImdbId, LocalCinematerialApi, PosterQuery,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Request deadline in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Look up the posters of a movie.
    Search(TargetArgs),
    /// Print the signed API request URL without sending it.
    Url(TargetArgs),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Movie selection shared by `search` and `url`.
#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["id", "url"])))]
struct TargetArgs {
    /// IMDb id (e.g. "1375666" or "tt1375666").
    #[arg(long)]
    id: Option<String>,
    /// IMDb title page URL (e.g. "http://www.imdb.com/title/tt1375666/").
    #[arg(long)]
    url: Option<String>,
    /// Poster width in pixels (30-300, default: config or 300).
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i32>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Store credentials and defaults in the config file.
    Set(ConfigSetArgs),
    /// Show the effective configuration (secret redacted).
    Show,
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// Cinematerial API key.
    #[arg(long)]
    api_key: Option<String>,
    /// Cinematerial API secret.
    #[arg(long)]
    api_secret: Option<String>,
    /// Default poster width.
    #[arg(long)]
    default_width: Option<i32>,
}

/// Builds a `CinematerialClient` from the environment and config file.
///
/// `CINEMATERIAL_API_KEY` / `CINEMATERIAL_API_SECRET` override the file.
///
/// # Errors
///
/// Returns an error if a credential is missing or empty, or the client fails to build.
fn build_client(config: &AppConfig, timeout: Option<Duration>) -> Result<CinematerialClient> {
    let (api_key, api_secret) = config.credentials_with_env(|name| std::env::var(name).ok());

    let mut builder = CinematerialClient::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    if let Some(secret) = api_secret {
        builder = builder.api_secret(secret);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().context("failed to build Cinematerial client")
}

/// Turns the CLI target into a query, falling back to the configured width.
///
/// # Errors
///
/// Returns an error if `--id` is not an IMDb id.
fn build_query(args: &TargetArgs, config: &AppConfig) -> Result<PosterQuery> {
    let query = if let Some(ref url) = args.url {
        PosterQuery::by_url(url.as_str())
    } else {
        let raw = args.id.as_deref().context("either --id or --url is required")?;
        let imdb_id: ImdbId = raw
            .parse()
            .with_context(|| format!("invalid --id: {raw}"))?;
        PosterQuery::by_id(i64::from(imdb_id.get()))
    };

    Ok(match args.width.or(config.search.default_width) {
        Some(width) => query.width(width),
        None => query,
    })
}

/// Loads the config file.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the input is invalid or the API request fails.
#[instrument(skip_all)]
async fn run_search(
    args: &TargetArgs,
    dir: Option<&PathBuf>,
    timeout: Option<Duration>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_client(&config, timeout)?;
    let query = build_query(args, &config)?;

    let result = client
        .search(&query)
        .await
        .context("failed to look up posters")?;

    report_result(&result);
    Ok(())
}

/// Logs a lookup result.
fn report_result(result: &CinematerialResult) {
    if !result.is_found() {
        tracing::info!("No posters found");
        return;
    }

    tracing::info!("Title: {}", result.title.as_deref().unwrap_or("-"));
    tracing::info!("Year: {}", result.year.as_deref().unwrap_or("-"));
    tracing::info!("IMDb ID: {}", result.imdb_movie_id.as_deref().unwrap_or("-"));
    tracing::info!("Page: {}", result.page.as_deref().unwrap_or("-"));
    tracing::info!("Posters ({}):", result.posters().len());
    for poster in result.posters() {
        tracing::info!("  {}", poster.url);
    }
}

/// Runs the `url` subcommand.
///
/// Emits the signed URL outside any span, so it never reaches the
/// OpenTelemetry exporter.
///
/// # Errors
///
/// Returns an error if the input is invalid or the client fails to build.
fn run_url(args: &TargetArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_client(&config, None)?;
    let query = build_query(args, &config)?;

    let url = client
        .api_url(&query)
        .context("failed to build request URL")?;

    tracing::info!("{url}");
    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
#[instrument(skip_all)]
fn run_config_set(args: &ConfigSetArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;

    if let Some(ref key) = args.api_key {
        config.credentials.api_key = Some(key.clone());
    }
    if let Some(ref secret) = args.api_secret {
        config.credentials.api_secret = Some(secret.clone());
    }
    if let Some(width) = args.default_width {
        config.search.default_width = Some(width);
    }

    config.save(&config_path)?;
    tracing::info!("Saved config to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let (api_key, api_secret) = config.credentials_with_env(|name| std::env::var(name).ok());

    tracing::info!("Config file: {}", config_path.display());
    tracing::info!(
        "API key: {} (env: {API_KEY_ENV})",
        api_key.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "API secret: {} (env: {API_SECRET_ENV})",
        if api_secret.is_some() { "<set>" } else { "-" }
    );
    tracing::info!(
        "Default width: {}",
        config
            .search
            .default_width
            .map_or_else(|| String::from("-"), |w| w.to_string())
    );
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
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

    let cli = Cli::parse();
    let timeout = cli.timeout_secs.map(Duration::from_secs);
    match cli.command {
        Commands::Search(args) => run_search(&args, cli.dir.as_ref(), timeout).await,
        Commands::Url(args) => run_url(&args, cli.dir.as_ref()),
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Set(args) => run_config_set(&args, cli.dir.as_ref()),
            ConfigSubcommands::Show => run_config_show(cli.dir.as_ref()),
        },
    }
}
