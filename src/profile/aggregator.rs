//! Profile aggregation with cache and fallback

use super::cache::TimedCache;
use super::Profile;
use crate::github::GitHubSource;
use crate::{metrics, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Builds the [`Profile`] for one fixed account.
///
/// Fresh cache entries are returned without touching upstream. On a miss the
/// profile and repository list are mandatory; the contribution count is best
/// effort and defaults to 0. When a mandatory fetch fails, any cached profile
/// (fresh or stale) is returned instead of the error.
pub struct ProfileAggregator {
    source: Arc<dyn GitHubSource>,
    cache: Arc<TimedCache<Profile>>,
    username: String,
}

impl ProfileAggregator {
    pub fn new(
        source: Arc<dyn GitHubSource>,
        cache: Arc<TimedCache<Profile>>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            source,
            cache,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn cache(&self) -> &Arc<TimedCache<Profile>> {
        &self.cache
    }

    /// Aggregated profile for the configured account
    pub async fn get_profile(&self) -> Result<Profile> {
        if let Some(profile) = self.cache.get_fresh().await {
            metrics::record_cache_hit();
            debug!(handle = %self.username, "Returning cached profile data");
            return Ok(profile);
        }

        metrics::record_cache_miss();
        info!(handle = %self.username, "Cache expired or empty, fetching fresh data");

        let started = Instant::now();
        match self.aggregate().await {
            Ok(profile) => {
                metrics::record_aggregation_duration(started.elapsed().as_secs_f64());
                self.cache.set(profile.clone()).await;
                info!(
                    handle = %self.username,
                    total_stars = profile.total_stars,
                    contributions = profile.contributions,
                    "Profile aggregated"
                );
                Ok(profile)
            }
            Err(e) => {
                error!(handle = %self.username, error = %e, "Error fetching GitHub profile");

                if let Some((cached, freshness)) = self.cache.get().await {
                    metrics::record_cache_fallback();
                    warn!(
                        handle = %self.username,
                        freshness = ?freshness,
                        "Returning cached data as fallback due to error"
                    );
                    return Ok(cached);
                }

                Err(e)
            }
        }
    }

    async fn aggregate(&self) -> Result<Profile> {
        let handle = self.username.as_str();

        let user = async {
            self.source
                .user(handle)
                .await
                .inspect_err(|e| metrics::record_upstream_error("user", e.kind()))
        };
        let repos = async {
            self.source
                .repos(handle)
                .await
                .inspect_err(|e| metrics::record_upstream_error("repos", e.kind()))
        };

        let (mandatory, contributions) = tokio::join!(
            async { tokio::try_join!(user, repos) },
            self.contribution_count(handle)
        );
        let (user, repos) = mandatory?;

        Ok(Profile::assemble(user, &repos, contributions))
    }

    /// Contribution count, or 0 if the lookup fails for any reason
    async fn contribution_count(&self, handle: &str) -> u64 {
        match self.source.contributions(handle).await {
            Ok(count) => count,
            Err(e) => {
                metrics::record_contribution_fallback();
                warn!(handle = %handle, error = %e, "Error fetching contribution count, using 0");
                0
            }
        }
    }
}
