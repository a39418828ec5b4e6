//! GitHub API client
//!
//! REST for the profile and repository list, GraphQL for the contribution
//! calendar. One request per call, no retries.

use super::models::{GitHubRepo, GitHubUser};
use super::source::{ContributionError, GitHubSource};
use crate::config::GitHubSettings;
use crate::Result;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Client-wide request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum page size accepted by the repository listing
const REPOS_PER_PAGE: u32 = 100;

const CONTRIBUTIONS_QUERY: &str = r#"
    query($username: String!) {
        user(login: $username) {
            contributionsCollection {
                contributionCalendar {
                    totalContributions
                    weeks {
                        contributionDays {
                            contributionCount
                        }
                    }
                }
            }
        }
    }
"#;

/// REST and GraphQL endpoints for a GitHub installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEndpoints {
    pub rest_base_url: String,
    pub graphql_url: String,
}

impl GitHubEndpoints {
    /// Derive endpoints from a GitHub URL.
    ///
    /// `github.com` and `api.github.com` map to the public API; anything else
    /// is treated as a GitHub Enterprise installation.
    pub fn from_url(url: &str) -> Self {
        let base_url = url.trim().trim_end_matches('/');
        if base_url.contains("api.github.com") {
            Self {
                rest_base_url: base_url.to_string(),
                graphql_url: "https://api.github.com/graphql".to_string(),
            }
        } else if base_url.contains("github.com") {
            Self {
                rest_base_url: "https://api.github.com".to_string(),
                graphql_url: "https://api.github.com/graphql".to_string(),
            }
        } else {
            Self {
                rest_base_url: format!("{}/api/v3", base_url),
                graphql_url: format!("{}/api/graphql", base_url),
            }
        }
    }
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContributionsData {
    user: Option<ContributionsUser>,
}

#[derive(Debug, Deserialize)]
struct ContributionsUser {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: Option<ContributionsCollection>,
}

#[derive(Debug, Deserialize)]
struct ContributionsCollection {
    #[serde(rename = "contributionCalendar")]
    contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Deserialize)]
struct ContributionCalendar {
    #[serde(rename = "totalContributions")]
    total_contributions: u64,
    #[serde(default)]
    weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Deserialize)]
struct ContributionWeek {
    #[serde(rename = "contributionDays", default)]
    contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Deserialize)]
struct ContributionDay {
    #[serde(rename = "contributionCount")]
    contribution_count: u64,
}

impl ContributionCalendar {
    fn day_total(&self) -> u64 {
        self.weeks
            .iter()
            .flat_map(|week| &week.contribution_days)
            .map(|day| day.contribution_count)
            .sum()
    }
}

/// Extract the total contribution count from a raw GraphQL response body
fn parse_contributions(body: &str) -> std::result::Result<u64, ContributionError> {
    let response: GraphQLResponse<ContributionsData> = serde_json::from_str(body)?;

    let data = match (response.data, response.errors) {
        (Some(data), _) => data,
        (None, Some(errors)) if !errors.is_empty() => {
            let message = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ContributionError::GraphQL(message));
        }
        (None, _) => return Err(ContributionError::Shape("data")),
    };

    let calendar = data
        .user
        .ok_or(ContributionError::Shape("user"))?
        .contributions_collection
        .ok_or(ContributionError::Shape("contributionsCollection"))?
        .contribution_calendar
        .ok_or(ContributionError::Shape("contributionCalendar"))?;

    debug!(
        total = calendar.total_contributions,
        day_total = calendar.day_total(),
        "Contribution calendar received"
    );

    Ok(calendar.total_contributions)
}

/// GitHub API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    endpoints: GitHubEndpoints,
    auth_token: Option<String>,
}

impl GitHubClient {
    /// Create a new client
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &GitHubSettings) -> Result<Self> {
        let user_agent = header::HeaderValue::from_str(&settings.user_agent).map_err(|e| {
            crate::PortfolioError::Config(format!("Invalid user agent: {}", e))
        })?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(header::USER_AGENT, user_agent);
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/vnd.github.v3+json"),
                );
                headers
            })
            .build()?;

        let endpoints = GitHubEndpoints::from_url(&settings.api_url);
        debug!(
            rest = %endpoints.rest_base_url,
            graphql = %endpoints.graphql_url,
            authenticated = settings.token.is_some(),
            "GitHub client configured"
        );

        Ok(Self {
            client,
            endpoints,
            auth_token: settings.token.clone(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn endpoints(&self) -> &GitHubEndpoints {
        &self.endpoints
    }

    fn user_url(&self, handle: &str) -> String {
        format!(
            "{}/users/{}",
            self.endpoints.rest_base_url,
            urlencoding::encode(handle)
        )
    }

    /// GET a REST resource and decode it, treating any non-2xx status as an error
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self.client.get(url);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(url = %url, status = status.as_u16(), body = %body, "GitHub API error");
        Err(crate::PortfolioError::Upstream {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetch the user profile record
    pub async fn fetch_user(&self, handle: &str) -> Result<GitHubUser> {
        debug!(handle = %handle, "Fetching GitHub profile");
        self.get_json(&self.user_url(handle)).await
    }

    /// Fetch the first page (up to 100) of repositories owned by the user
    pub async fn fetch_repos(&self, handle: &str) -> Result<Vec<GitHubRepo>> {
        let url = format!("{}/repos?per_page={}", self.user_url(handle), REPOS_PER_PAGE);
        debug!(handle = %handle, "Fetching GitHub repositories");
        let repos: Vec<GitHubRepo> = self.get_json(&url).await?;
        debug!(handle = %handle, count = repos.len(), "Repositories received");
        Ok(repos)
    }

    /// Fetch the total contribution count from the GraphQL contribution calendar
    pub async fn fetch_contributions(
        &self,
        handle: &str,
    ) -> std::result::Result<u64, ContributionError> {
        let body = serde_json::json!({
            "query": CONTRIBUTIONS_QUERY,
            "variables": { "username": handle },
        });

        debug!(
            handle = %handle,
            authenticated = self.is_authenticated(),
            "Fetching contribution count"
        );

        let mut request = self.client.post(&self.endpoints.graphql_url).json(&body);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(ContributionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_contributions(&text).inspect_err(|e| {
            debug!(error = %e, raw = %text, "Unusable GraphQL response");
        })
    }
}

#[async_trait]
impl GitHubSource for GitHubClient {
    async fn user(&self, handle: &str) -> Result<GitHubUser> {
        self.fetch_user(handle).await
    }

    async fn repos(&self, handle: &str) -> Result<Vec<GitHubRepo>> {
        self.fetch_repos(handle).await
    }

    async fn contributions(&self, handle: &str) -> std::result::Result<u64, ContributionError> {
        self.fetch_contributions(handle).await
    }
}
