//! HTTP client for the portfolio API

use crate::config::{BaseUrlChain, PortfolioConfig};
use crate::profile::{Clock, Profile, SystemClock, TimedCache};
use crate::projects::Project;
use crate::{PortfolioError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of `/api/github-profile`
#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    #[serde(default)]
    profile: Option<Profile>,
}

/// Consumer of the portfolio API used when rendering pages
///
/// Keeps its own profile cache so repeated renders within the TTL do not
/// issue requests, and degrades to cached or empty data instead of failing.
pub struct SiteClient {
    base_url: String,
    client: reqwest::Client,
    cache: TimedCache<Profile>,
}

impl SiteClient {
    pub fn new(base_url: impl Into<String>, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            cache: TimedCache::with_clock(ttl, clock),
        })
    }

    /// Create a client for the base URL resolved from `config`
    pub fn from_config(config: &PortfolioConfig) -> Result<Self> {
        let base_url = BaseUrlChain::from_settings(&config.site).resolve();
        Self::new(base_url, config.cache.ttl(), Arc::new(SystemClock))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Aggregated profile, or `None` when nothing was ever fetched
    pub async fn profile(&self) -> Option<Profile> {
        if let Some(profile) = self.cache.get_fresh().await {
            debug!("Using cached GitHub profile");
            return Some(profile);
        }

        match self.fetch_profile().await {
            Ok(profile) => {
                self.cache.set(profile.clone()).await;
                Some(profile)
            }
            Err(e) => {
                error!(base_url = %self.base_url, error = %e, "Error fetching GitHub profile");
                let cached = self.cache.get().await.map(|(profile, _)| profile);
                if cached.is_some() {
                    warn!("Using cached GitHub profile as fallback");
                }
                cached
            }
        }
    }

    /// Homepage carousel projects, empty on failure
    pub async fn featured_projects(&self) -> Vec<Project> {
        self.get_json("/api/github-featured")
            .await
            .unwrap_or_else(|e| {
                error!(base_url = %self.base_url, error = %e, "Error fetching featured projects");
                Vec::new()
            })
    }

    /// Projects page listing, empty on failure
    pub async fn projects(&self) -> Vec<Project> {
        self.get_json("/api/github-projects")
            .await
            .unwrap_or_else(|e| {
                error!(base_url = %self.base_url, error = %e, "Error fetching projects");
                Vec::new()
            })
    }

    async fn fetch_profile(&self) -> Result<Profile> {
        let envelope: ProfileEnvelope = self.get_json("/api/github-profile").await?;
        envelope
            .profile
            .ok_or_else(|| PortfolioError::Parse("Response is missing the profile key".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortfolioError::Server(format!(
                "{} returned HTTP {}",
                path,
                status.as_u16()
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ManualClock;
    use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const HOUR: Duration = Duration::from_secs(3600);

    #[derive(Default)]
    struct SiteState {
        hits: AtomicUsize,
        failing: AtomicBool,
        omit_profile: AtomicBool,
    }

    fn profile_json(followers: u64) -> serde_json::Value {
        serde_json::json!({
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "name": "The Octocat",
            "bio": null,
            "location": null,
            "company": null,
            "blog": null,
            "twitter_username": null,
            "followers": followers,
            "following": 2,
            "publicRepos": 8,
            "totalStars": 42,
            "contributions": 365,
            "topLanguages": [{ "name": "Rust", "percentage": 100 }]
        })
    }

    fn project_json(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": format!("repo-{}", id),
            "description": null,
            "html_url": format!("https://github.com/octocat/repo-{}", id),
            "topics": ["featured"],
            "stargazers_count": 1,
            "language": "Rust",
            "updated_at": "2026-09-01T12:00:00Z",
            "homepage": null
        })
    }

    async fn profile_handler(
        State(state): State<Arc<SiteState>>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        let hit = state.hits.fetch_add(1, Ordering::SeqCst) as u64;
        if state.failing.load(Ordering::SeqCst) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch GitHub profile" })),
            );
        }
        if state.omit_profile.load(Ordering::SeqCst) {
            return (StatusCode::OK, Json(serde_json::json!({})));
        }
        (
            StatusCode::OK,
            Json(serde_json::json!({ "profile": profile_json(100 + hit) })),
        )
    }

    async fn featured_handler(
        State(state): State<Arc<SiteState>>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        if state.failing.load(Ordering::SeqCst) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch featured GitHub projects" })),
            );
        }
        (
            StatusCode::OK,
            Json(serde_json::json!([project_json(1), project_json(2)])),
        )
    }

    async fn spawn_site() -> (String, Arc<SiteState>) {
        let state = Arc::new(SiteState::default());
        let router = Router::new()
            .route("/api/github-profile", get(profile_handler))
            .route("/api/github-featured", get(featured_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}", addr), state)
    }

    fn client(base_url: &str) -> (SiteClient, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let client = SiteClient::new(base_url, HOUR, clock.clone()).unwrap();
        (client, clock)
    }

    #[tokio::test]
    async fn test_profile_cached_within_ttl() {
        let (base_url, site) = spawn_site().await;
        let (client, clock) = client(&base_url);

        let first = client.profile().await.unwrap();
        clock.advance(Duration::from_secs(60));
        let second = client.profile().await.unwrap();

        assert_eq!(site.hits.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(first.followers, 100);
        assert_eq!(first.top_languages[0].name, "Rust");
    }

    #[tokio::test]
    async fn test_profile_refetched_after_ttl() {
        let (base_url, site) = spawn_site().await;
        let (client, clock) = client(&base_url);

        client.profile().await.unwrap();
        clock.advance(HOUR);
        let refreshed = client.profile().await.unwrap();

        assert_eq!(site.hits.load(Ordering::SeqCst), 2);
        assert_eq!(refreshed.followers, 101);
    }

    #[tokio::test]
    async fn test_profile_falls_back_to_stale_cache() {
        let (base_url, site) = spawn_site().await;
        let (client, clock) = client(&base_url);

        let cached = client.profile().await.unwrap();
        site.failing.store(true, Ordering::SeqCst);
        clock.advance(HOUR * 3);

        assert_eq!(client.profile().await, Some(cached));
    }

    #[tokio::test]
    async fn test_missing_profile_key_is_a_failure() {
        let (base_url, site) = spawn_site().await;
        site.omit_profile.store(true, Ordering::SeqCst);
        let (client, _clock) = client(&base_url);

        assert!(client.profile().await.is_none());
    }

    #[tokio::test]
    async fn test_profile_none_without_cache() {
        let (base_url, site) = spawn_site().await;
        site.failing.store(true, Ordering::SeqCst);
        let (client, _clock) = client(&base_url);

        assert!(client.profile().await.is_none());
    }

    #[tokio::test]
    async fn test_project_lists() {
        let (base_url, site) = spawn_site().await;
        let (client, _clock) = client(&base_url);

        let featured = client.featured_projects().await;
        assert_eq!(featured.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        // route not served by this fake
        assert!(client.projects().await.is_empty());

        site.failing.store(true, Ordering::SeqCst);
        assert!(client.featured_projects().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_site() {
        let (client, _clock) = client("http://127.0.0.1:1/");
        assert_eq!(client.base_url(), "http://127.0.0.1:1");
        assert!(client.profile().await.is_none());
        assert!(client.featured_projects().await.is_empty());
    }
}
