//! JSON HTTP service around the analysis pipeline.
//!
//! Routes:
//! - `POST /api/tasks/analyze/`  ranked tasks
//! - `POST /api/tasks/suggest/`  top three with explanations
//! - `GET  /api/strategies`      available profiles
//! - `GET  /api/health`

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use chrono_tz::Tz;
use serde_json::json;
use taskrank_core::{
    Analysis, AnalysisPipeline, AnalyzeRequest, Strategy, StrategyProfile, Suggestions,
    ValidationError, profiles, time::today_in,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;

/// Per-process settings shared by all handlers. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub timezone: Tz,
    pub default_strategy: Strategy,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            timezone: cfg.timezone()?,
            default_strategy: cfg.default_strategy()?,
        })
    }

    /// Built per request so a long-running server follows the calendar.
    fn pipeline(&self) -> AnalysisPipeline {
        AnalysisPipeline::new(today_in(self.timezone, Utc::now()))
            .with_default_strategy(self.default_strategy)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    BadRequest(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON format: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::BadRequest(m) => m,
        };
        warn!(error = %message, "rejected request");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/analyze", post(analyze_tasks))
        .route("/tasks/analyze/", post(analyze_tasks))
        .route("/tasks/suggest", post(suggest_tasks))
        .route("/tasks/suggest/", post(suggest_tasks))
        .route("/strategies", get(list_strategies))
        .route("/health", get(health_check))
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn analyze_tasks(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> std::result::Result<Json<Analysis>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(state.pipeline().analyze_request(req)?))
}

async fn suggest_tasks(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> std::result::Result<Json<Suggestions>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(state.pipeline().suggest_request(req)?))
}

async fn list_strategies() -> Json<Vec<StrategyProfile>> {
    Json(profiles())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "build": env!("TASKRANK_BUILD_SHA"),
    }))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(cfg: &Config, bind: Option<String>) -> Result<()> {
    let state = AppState::from_config(cfg)?;
    let app = build_router(state, &cfg.server.cors_origins);
    let addr = bind.unwrap_or_else(|| cfg.server.bind.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(
        %addr,
        strategy = %state.default_strategy,
        timezone = %state.timezone,
        "taskrank listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
