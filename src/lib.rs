//! Portfolio - GitHub profile aggregation for a personal portfolio site
//!
//! Fetches a single account's public profile, repositories and yearly
//! contribution count from GitHub, derives summary statistics, and serves
//! them over a small JSON API with a time-limited in-process cache.
//!
//! # Architecture
//!
//! - **github**: Upstream REST/GraphQL client and the `GitHubSource` seam
//! - **profile**: Statistics, the timed cache and the profile aggregator
//! - **projects**: Topic-based selection of featured and portfolio projects
//! - **server**: axum HTTP API
//! - **web**: Site-side consumer of the API
//! - **config**: YAML configuration, environment overlay, base URL resolution

// Core modules
pub mod config;
pub mod error;
pub mod github;
pub mod profile;
pub mod projects;

// Surfaces
pub mod server;
pub mod web;

// Ambient
pub mod logging;
pub mod metrics;

// Re-exports
pub use error::{PortfolioError, Result};
