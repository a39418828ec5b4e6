//! Featured and portfolio project selection
//!
//! Repositories are curated on GitHub itself: a topic label marks which
//! ones appear in the homepage carousel and on the projects page.

use crate::github::{GitHubRepo, GitHubSource};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Topic marking repositories for the homepage carousel
pub const FEATURED_TOPIC: &str = "featured";

/// Topic marking repositories for the projects listing
pub const PORTFOLIO_TOPIC: &str = "portfolio";

/// Repository projected to the fields the site renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub updated_at: String,
    pub homepage: Option<String>,
}

impl From<GitHubRepo> for Project {
    fn from(repo: GitHubRepo) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            description: repo.description,
            html_url: repo.html_url,
            topics: repo.topics,
            stargazers_count: repo.stargazers_count,
            language: repo.language,
            updated_at: repo.updated_at,
            homepage: repo.homepage,
        }
    }
}

/// Repositories carrying `topic`, in upstream order
pub fn select_by_topic(repos: Vec<GitHubRepo>, topic: &str) -> Vec<Project> {
    repos
        .into_iter()
        .filter(|repo| repo.has_topic(topic))
        .map(Project::from)
        .collect()
}

/// Fetches the account's repositories and selects curated projects
pub struct ProjectSelector {
    source: Arc<dyn GitHubSource>,
    username: String,
}

impl ProjectSelector {
    pub fn new(source: Arc<dyn GitHubSource>, username: impl Into<String>) -> Self {
        Self {
            source,
            username: username.into(),
        }
    }

    /// Projects tagged for the homepage carousel
    pub async fn featured(&self) -> Result<Vec<Project>> {
        self.select(FEATURED_TOPIC).await
    }

    /// Projects tagged for the projects listing
    pub async fn portfolio(&self) -> Result<Vec<Project>> {
        self.select(PORTFOLIO_TOPIC).await
    }

    async fn select(&self, topic: &str) -> Result<Vec<Project>> {
        let repos = self.source.repos(&self.username).await?;
        let total = repos.len();
        let projects = select_by_topic(repos, topic);
        debug!(
            handle = %self.username,
            topic = topic,
            total = total,
            selected = projects.len(),
            "Selected projects by topic"
        );
        Ok(projects)
    }
}
