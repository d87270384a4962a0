use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use bible_db::{FailurePolicy, Library, LoadMode, VersionSpec, default_versions};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use bible_counter::{AppState, LibraryIndex, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_DIR: &str = "data";
const MAX_PAGE_SIZE: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config()?;
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "reading versions from {} (mode: {:?})",
        config.data_dir.display(),
        config.load_mode
    );
    if config.disable_cache {
        info!("cache headers disabled");
    }

    let start = Instant::now();
    let library = Library::load(
        &config.data_dir,
        &config.versions,
        config.load_mode,
        config.failure_policy,
    )?;
    if library.is_empty() {
        bail!(
            "no Bible version could be loaded from {}",
            config.data_dir.display()
        );
    }
    let index = LibraryIndex::build(library);
    info!("library ready in {} ms", start.elapsed().as_millis());

    let state = AppState {
        index,
        max_page_size: MAX_PAGE_SIZE,
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    data_dir: PathBuf,
    load_mode: LoadMode,
    versions: Vec<VersionSpec>,
    failure_policy: FailurePolicy,
    disable_cache: bool,
}

fn load_config() -> anyhow::Result<Config> {
    let mut disable_cache = false;
    let mut strict = false;
    let mut cli_data_dir: Option<PathBuf> = None;
    let mut cli_load_mode: Option<LoadMode> = None;
    let mut cli_versions: Vec<VersionSpec> = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--strict" => strict = true,
            "--data-dir" => {
                if let Some(path) = args.next() {
                    cli_data_dir = Some(PathBuf::from(path));
                }
            }
            "--source" => {
                if let Some(raw) = args.next() {
                    cli_versions.push(VersionSpec::parse(&raw).map_err(anyhow::Error::msg)?);
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--data-dir=") {
                    cli_data_dir = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_load_mode = LoadMode::parse(mode);
                    if cli_load_mode.is_none() {
                        warn!("ignoring unknown load mode {mode:?}");
                    }
                } else if let Some(raw) = arg.strip_prefix("--source=") {
                    cli_versions.push(VersionSpec::parse(raw).map_err(anyhow::Error::msg)?);
                } else {
                    warn!("ignoring unknown argument {arg:?}");
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let data_dir = cli_data_dir
        .or_else(|| env::var("BIBLE_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let load_mode = cli_load_mode
        .or_else(|| {
            env::var("BIBLE_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(LoadMode::parse)
        })
        .unwrap_or_default();
    let versions = if !cli_versions.is_empty() {
        cli_versions
    } else if let Ok(raw) = env::var("BIBLE_VERSIONS") {
        parse_version_list(&raw)?
    } else {
        default_versions()
    };
    let failure_policy = if strict || env::var("BIBLE_STRICT").is_ok_and(|v| v == "1") {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Skip
    };

    Ok(Config {
        host,
        port,
        data_dir,
        load_mode,
        versions,
        failure_policy,
        disable_cache,
    })
}

/// Comma-separated `NAME=FILE[:SCHEMA]` entries.
fn parse_version_list(raw: &str) -> anyhow::Result<Vec<VersionSpec>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| VersionSpec::parse(s).map_err(anyhow::Error::msg))
        .collect()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
