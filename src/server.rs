//! HTTP surface: a single `POST /generate` endpoint.
//!
//! Validation failures get structured 400 bodies; render failures are
//! logged and surface as an opaque 500. Requests are otherwise independent,
//! with a semaphore bounding how many headless-Chrome instances run at
//! once.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Semaphore;

use crate::{metadata, poster, Error, PosterSize, RasterConfig, Result, Template};

/// JSON bodies larger than this are rejected by the framework
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Timeout for metadata fetches; keeps resolution time bounded even though
/// its failures never surface
const METADATA_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared per-process state: one HTTP client for metadata fetches and a cap
/// on concurrent rasterizations
#[derive(Clone)]
pub struct AppState {
    http: reqwest::Client,
    render_permits: Arc<Semaphore>,
    raster_defaults: RasterConfig,
}

impl AppState {
    pub fn new(max_renders: usize) -> Result<Self> {
        let raster_defaults = RasterConfig::default();

        let http = reqwest::Client::builder()
            .timeout(METADATA_FETCH_TIMEOUT)
            .user_agent(raster_defaults.user_agent.clone())
            .build()
            .map_err(|e| Error::Initialization(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            render_permits: Arc::new(Semaphore::new(max_renders)),
            raster_defaults,
        })
    }
}

/// Request body for `POST /generate`.
///
/// `url` is optional at the deserialization layer so an empty body parses
/// and can be answered with a structured 400.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub url: Option<String>,
    #[serde(default)]
    pub template: Option<Template>,
    pub size: Option<SizeParam>,
}

/// Requested dimensions, taken as signed so that negative values reach the
/// validation step and get the structured 400 instead of a deserialization
/// rejection
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SizeParam {
    pub w: i64,
    pub h: i64,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate_poster))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn run_server(addr: SocketAddr, max_renders: usize) -> Result<()> {
    let state = AppState::new(max_renders)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn generate_poster(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let Some(url) = req.url else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing url" }))).into_response();
    };

    let size = match req.size {
        Some(s) if s.w <= 0 || s.h <= 0 || s.w > u32::MAX as i64 || s.h > u32::MAX as i64 => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid size" })))
                .into_response();
        }
        Some(s) => PosterSize {
            width: s.w as u32,
            height: s.h as u32,
        },
        None => PosterSize::default(),
    };
    let template = req.template.unwrap_or_default();

    let meta = metadata::resolve(&state.http, &url).await;

    // Bound concurrent Chrome launches; the semaphore is never closed, so
    // acquisition only fails if the process is tearing down
    let _permit = match state.render_permits.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            tracing::error!("render permit unavailable: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    let config = RasterConfig {
        viewport: size,
        ..state.raster_defaults.clone()
    };

    let artifact = match poster::render_poster(&meta, &url, template, size, config).await {
        Ok(artifact) => artifact,
        Err(e) => {
            tracing::error!("Failed to render poster for {}: {}", url, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    match artifact.into_png_response().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to stream poster for {}: {}", url, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
