//! Parley server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! flat-file review store and the graph record store under `data_dir`, and
//! serves both apps over HTTP: the JSON API under `/api` and the static
//! page shells at `/`.
//!
//! The admin code has no default; the server refuses to start without
//! `admin_code` in the config file or `PARLEY_ADMIN_CODE` in the
//! environment.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{
  Router,
  extract::Query,
  http::StatusCode,
  response::Html,
  routing::get,
};
use clap::Parser;
use parley_api::AppState;
use parley_core::session::AdminSecret;
use parley_graph::store::GraphStore;
use parley_store::{FlatFileStore, StorePaths};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Parley review portal and graph server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[derive(Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:        String,
  #[serde(default = "default_port")]
  port:        u16,
  /// Root for the distribution sheet, submission log, uploads and project
  /// files.
  #[serde(default = "default_data_dir")]
  data_dir:    PathBuf,
  /// Optional directory of `offensive.txt` / `defensive.txt` /
  /// `tactical.txt` skill vocabularies.
  catalog_dir: Option<PathBuf>,
  /// Shared secret for the admin view. Required.
  admin_code:  String,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("data")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PARLEY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig (is admin_code set?)")?;

  let data_dir = expand_tilde(&server_cfg.data_dir);

  // Open the flat-file stores.
  let paths = StorePaths::under(&data_dir);
  let projects_dir = paths.projects_dir.clone();
  let store = FlatFileStore::open(paths)
    .with_context(|| format!("failed to open review store under {data_dir:?}"))?;
  let graph = GraphStore::new(
    data_dir.join("graph_records.json"),
    server_cfg.catalog_dir.as_deref().map(expand_tilde),
  );

  // Build application state.
  let state = AppState::new(
    Arc::new(store),
    Arc::new(graph),
    AdminSecret::new(&server_cfg.admin_code),
    projects_dir,
  );

  let app = Router::new()
    .route("/", get(page))
    .nest("/api", parley_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

// ─── Static pages ─────────────────────────────────────────────────────────────

const REVIEW_PAGE: &str = include_str!("../assets/review.html");
const INPUT_PAGE: &str = include_str!("../assets/input.html");
const GRAPH_PAGE: &str = include_str!("../assets/graph.html");

#[derive(Deserialize)]
struct PageQuery {
  page: Option<String>,
}

/// `GET /?page=` — one shell per app: the review portal by default,
/// `input` for graph registration, `graph` for the visualization.
async fn page(
  Query(query): Query<PageQuery>,
) -> Result<Html<&'static str>, StatusCode> {
  match query.page.as_deref() {
    None | Some("review") => Ok(Html(REVIEW_PAGE)),
    Some("input") => Ok(Html(INPUT_PAGE)),
    Some("graph") => Ok(Html(GRAPH_PAGE)),
    Some(_) => Err(StatusCode::NOT_FOUND),
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
