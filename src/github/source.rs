//! Upstream data source seam
//!
//! The aggregator and project selectors only talk to this trait, so tests
//! can drive them without a network.

use super::models::{GitHubRepo, GitHubUser};
use crate::Result;
use async_trait::async_trait;

/// Failure of the best-effort contribution count lookup.
///
/// Kept separate from [`crate::PortfolioError`]: callers absorb it locally
/// and it never reaches an aggregate result.
#[derive(Debug, thiserror::Error)]
pub enum ContributionError {
    #[error("GraphQL request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("GitHub GraphQL API error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("GraphQL error: {0}")]
    GraphQL(String),
    #[error("GraphQL response missing {0} property")]
    Shape(&'static str),
    #[error("GraphQL response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of profile, repository and contribution data for an account
#[async_trait]
pub trait GitHubSource: Send + Sync {
    /// Profile record (mandatory)
    async fn user(&self, handle: &str) -> Result<GitHubUser>;

    /// First page of owned repositories (mandatory)
    async fn repos(&self, handle: &str) -> Result<Vec<GitHubRepo>>;

    /// Total contribution count (best effort)
    async fn contributions(&self, handle: &str) -> std::result::Result<u64, ContributionError>;
}
