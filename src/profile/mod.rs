//! GitHub profile aggregation
//!
//! Combines the profile record, the repository list and the contribution
//! count into one [`Profile`], served through a time-limited cache.

mod aggregator;
pub mod cache;
pub mod stats;

pub use aggregator::ProfileAggregator;
pub use cache::{CacheEntry, Clock, Freshness, ManualClock, SystemClock, TimedCache};

use crate::github::{GitHubRepo, GitHubUser};
use serde::{Deserialize, Serialize};

/// Share of non-fork repositories written in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percentage: u32,
}

/// Aggregated profile as served by `/api/github-profile`
///
/// Identity and follower fields are copied from the upstream record; the
/// rest is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    pub followers: u64,
    pub following: u64,
    #[serde(rename = "publicRepos")]
    pub public_repos: u64,
    #[serde(rename = "totalStars")]
    pub total_stars: u64,
    pub contributions: u64,
    #[serde(rename = "topLanguages")]
    pub top_languages: Vec<LanguageShare>,
}

impl Profile {
    pub fn assemble(user: GitHubUser, repos: &[GitHubRepo], contributions: u64) -> Self {
        Self {
            login: user.login,
            avatar_url: user.avatar_url,
            name: user.name,
            bio: user.bio,
            location: user.location,
            company: user.company,
            blog: user.blog,
            twitter_username: user.twitter_username,
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            total_stars: stats::total_stars(repos),
            contributions,
            top_languages: stats::top_languages(repos),
        }
    }
}
