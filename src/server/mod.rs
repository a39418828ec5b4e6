//! HTTP API for the portfolio site
//!
//! # Routes
//!
//! - `GET /api/github-profile` - Aggregated profile (`{ "profile": ... }`)
//! - `GET /api/github-featured` - Repositories tagged `featured`
//! - `GET /api/github-projects` - Repositories tagged `portfolio`
//! - `GET /health` - Liveness
//! - `GET /metrics` - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use portfolio::config::PortfolioConfig;
//! use portfolio::server::PortfolioServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PortfolioConfig::default();
//!     let server = PortfolioServer::from_config(&config).expect("Failed to create server");
//!
//!     server.run("127.0.0.1:3000").await.expect("Server failed");
//! }
//! ```

use crate::config::PortfolioConfig;
use crate::github::{GitHubClient, GitHubSource};
use crate::metrics;
use crate::profile::{Profile, ProfileAggregator, TimedCache};
use crate::projects::{Project, ProjectSelector};
use crate::{PortfolioError, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Shared-cache policy advertised on profile responses
pub const PROFILE_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=86400";

/// Shared server state
struct AppState {
    aggregator: ProfileAggregator,
    projects: ProjectSelector,
}

/// HTTP server for the portfolio API
pub struct PortfolioServer {
    state: Arc<AppState>,
}

impl PortfolioServer {
    /// Create a server talking to GitHub as described by `config`
    pub fn from_config(config: &PortfolioConfig) -> Result<Self> {
        let client = GitHubClient::new(&config.github)?;
        let cache = Arc::new(TimedCache::new(config.cache.ttl()));
        Ok(Self::new(Arc::new(client), cache, &config.github.username))
    }

    /// Create a server over any upstream source
    pub fn new(
        source: Arc<dyn GitHubSource>,
        cache: Arc<TimedCache<Profile>>,
        username: &str,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                aggregator: ProfileAggregator::new(source.clone(), cache, username),
                projects: ProjectSelector::new(source, username),
            }),
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Self::build_router(self.state.clone())
    }

    fn build_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics_text))
            .route("/api/github-profile", get(github_profile))
            .route("/api/github-featured", get(github_featured))
            .route("/api/github-projects", get(github_projects))
            .layer(middleware::from_fn(log_requests))
            .with_state(state)
    }

    /// Run the server on the given address until Ctrl+C
    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| PortfolioError::Server(format!("Failed to bind {}: {}", addr, e)))?;

        info!(
            addr = addr,
            handle = %self.state.aggregator.username(),
            ttl_secs = self.state.aggregator.cache().ttl().as_secs(),
            "Portfolio API listening"
        );

        axum::serve(listener, Self::build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await
        }
    }
}

/// Request logging middleware
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        warn!(method = %method, path = %path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else {
        info!(method = %method, path = %path, status = status.as_u16(), elapsed_ms, "Request served");
    }

    response
}

// ============================================================================
// Response types
// ============================================================================

/// Successful profile response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn internal_error(message: &str, details: Option<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            details,
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn metrics_text() -> std::result::Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let body = metrics::encode_metrics()
        .map_err(|e| internal_error("Failed to encode metrics", Some(e.to_string())))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

async fn github_profile(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let profile = state.aggregator.get_profile().await.map_err(|e| {
        error!(error = %e, "Error fetching GitHub profile");
        internal_error("Failed to fetch GitHub profile", Some(e.to_string()))
    })?;

    Ok((
        [(header::CACHE_CONTROL, PROFILE_CACHE_CONTROL)],
        Json(ProfileResponse { profile }),
    ))
}

async fn github_featured(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<Project>>, (StatusCode, Json<ErrorResponse>)> {
    let projects = state.projects.featured().await.map_err(|e| {
        error!(error = %e, "Error fetching featured GitHub projects");
        internal_error("Failed to fetch featured GitHub projects", None)
    })?;

    Ok(Json(projects))
}

async fn github_projects(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<Project>>, (StatusCode, Json<ErrorResponse>)> {
    let projects = state.projects.portfolio().await.map_err(|e| {
        error!(error = %e, "Error fetching GitHub projects");
        internal_error("Failed to fetch GitHub projects", None)
    })?;

    Ok(Json(projects))
}
