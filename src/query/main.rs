//! Query server for point-to-region lookups.
//!
//! Loads a region catalog, builds a snapshot and answers lookups over HTTP.
//! The snapshot can be rebuilt from the catalog and swapped in while serving.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use geo_types::Coord;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use regionfind::catalog::{self, BuildStats, IngestMode};
use regionfind::pip::Loaded;
use regionfind::{Lookup, PipService, Snapshot};

mod config;
use config::{CatalogConfig, Config};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Point-to-region lookup server")]
struct Args {
    /// TOML config file; when given, the other options are ignored
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Region catalog (.json.gz) written by `ingest`
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Do not build the nearest-vertex fallback
    #[arg(long)]
    no_fallback: bool,

    /// Abort on the first malformed catalog record
    #[arg(long)]
    strict: bool,

    /// Log every lookup
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        if let Some(path) = &self.config {
            return Config::load_from_file(path);
        }

        let path = self
            .catalog
            .context("either --config or --catalog is required")?;

        Ok(Config {
            server: config::ServerConfig {
                listen: self.listen,
            },
            catalog: CatalogConfig {
                path,
                fallback: !self.no_fallback,
                strict: self.strict,
            },
        })
    }
}

/// Application state shared across handlers
struct AppState {
    service: PipService,
    catalog: CatalogConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.into_config()?;

    info!("Regionfind Query Server");
    info!("Loading catalog from {}", config.catalog.path.display());

    let source = config.catalog.clone();
    let (snapshot, _) = tokio::task::spawn_blocking(move || load_snapshot(&source)).await??;

    let state = Arc::new(AppState {
        service: PipService::new(snapshot),
        catalog: config.catalog,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/lookup", get(lookup_handler).post(batch_lookup_handler))
        .route("/v1/reload", post(reload_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read the catalog and build a snapshot. Blocking; run off the async runtime.
fn load_snapshot(source: &CatalogConfig) -> Result<(Snapshot, BuildStats)> {
    let records = catalog::load(&source.path)
        .with_context(|| format!("Failed to load catalog {}", source.path.display()))?;

    let mode = if source.strict {
        IngestMode::Strict
    } else {
        IngestMode::Lenient
    };

    let (snapshot, stats) = catalog::build_snapshot(&records, mode, source.fallback)
        .context("Failed to build region snapshot")?;

    info!(
        "Snapshot ready: {} regions ({} distinct ids), fallback: {}",
        snapshot.len(),
        stats.distinct_ids,
        snapshot.has_fallback()
    );
    Ok((snapshot, stats))
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let Loaded {
        snapshot,
        loaded_at,
    } = state.service.current();

    Json(HealthResponse {
        status: if snapshot.is_empty() { "degraded" } else { "ok" },
        regions: snapshot.len(),
        fallback: snapshot.has_fallback(),
        loaded_at,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    regions: usize,
    fallback: bool,
    loaded_at: DateTime<Utc>,
}

/// Single point lookup
async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupQueryParams>,
) -> Json<LookupResponse> {
    Json(state.service.lookup(params.point_lon, params.point_lat).into())
}

/// Batch lookup; body is `[[lon, lat], ...]`
async fn batch_lookup_handler(
    State(state): State<Arc<AppState>>,
    Json(points): Json<Vec<[f64; 2]>>,
) -> Result<Json<Vec<LookupResponse>>, (StatusCode, String)> {
    let points: Vec<Coord<f64>> = points.into_iter().map(|[x, y]| Coord { x, y }).collect();

    let results = tokio::task::spawn_blocking(move || state.service.lookup_many(&points))
        .await
        .map_err(|e| {
            error!("Batch lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(results.into_iter().map(LookupResponse::from).collect()))
}

/// Rebuild the snapshot from the catalog and swap it in
async fn reload_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, (StatusCode, String)> {
    let source = state.catalog.clone();

    let (snapshot, stats) = tokio::task::spawn_blocking(move || load_snapshot(&source))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            error!("Reload failed, keeping current snapshot: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        })?;

    let regions = snapshot.len();
    state.service.swap(snapshot);

    Ok(Json(ReloadResponse {
        regions,
        skipped: stats.skipped,
        distinct_ids: stats.distinct_ids,
        stale_bboxes: stats.stale_bboxes,
    }))
}

#[derive(Deserialize)]
struct LookupQueryParams {
    /// Point longitude
    #[serde(rename = "point.lon")]
    point_lon: f64,
    /// Point latitude
    #[serde(rename = "point.lat")]
    point_lat: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct LookupResponse {
    /// External id, -1 when nothing matched
    id: i64,
    distance: f64,
    #[serde(rename = "match")]
    kind: &'static str,
}

impl From<Lookup> for LookupResponse {
    fn from(lookup: Lookup) -> Self {
        Self {
            id: lookup.id(),
            distance: lookup.distance(),
            kind: lookup.kind(),
        }
    }
}

#[derive(Serialize)]
struct ReloadResponse {
    regions: usize,
    skipped: usize,
    distinct_ids: usize,
    stale_bboxes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_shape() {
        let json = serde_json::to_value(LookupResponse::from(Lookup::NotFound)).unwrap();
        assert_eq!(json["id"], -1);
        assert_eq!(json["distance"], 0.0);
        assert_eq!(json["match"], "not_found");

        let near = LookupResponse::from(Lookup::Nearest {
            id: 6001,
            distance: 0.25,
        });
        assert_eq!(
            near,
            LookupResponse {
                id: 6001,
                distance: 0.25,
                kind: "nearest"
            }
        );
    }

    #[test]
    fn test_args_require_catalog_without_config() {
        let args = Args::parse_from(["query"]);
        assert!(args.into_config().is_err());

        let args = Args::parse_from(["query", "--catalog", "c.json.gz", "--no-fallback"]);
        let config = args.into_config().unwrap();
        assert_eq!(config.catalog.path, PathBuf::from("c.json.gz"));
        assert!(!config.catalog.fallback);
        assert_eq!(config.server.listen, "0.0.0.0:3000");
    }
}
