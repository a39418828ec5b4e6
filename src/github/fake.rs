//! In-memory GitHub stand-in for unit tests

use super::models::{GitHubRepo, GitHubUser};
use super::source::{ContributionError, GitHubSource};
use crate::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) fn sample_user() -> GitHubUser {
    GitHubUser {
        login: "octocat".to_string(),
        avatar_url: "https://avatars.githubusercontent.com/u/583231".to_string(),
        name: Some("The Octocat".to_string()),
        bio: Some("Building things".to_string()),
        location: Some("Amsterdam".to_string()),
        company: Some("@github".to_string()),
        blog: Some("https://octocat.dev".to_string()),
        twitter_username: None,
        followers: 120,
        following: 7,
        public_repos: 3,
    }
}

pub(crate) fn sample_repo(id: u64, language: Option<&str>, stars: u64, topics: &[&str]) -> GitHubRepo {
    GitHubRepo {
        id,
        name: format!("repo-{}", id),
        description: Some(format!("Repository {}", id)),
        html_url: format!("https://github.com/octocat/repo-{}", id),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        stargazers_count: stars,
        language: language.map(str::to_string),
        updated_at: "2026-09-01T12:00:00Z".to_string(),
        homepage: None,
        fork: false,
    }
}

/// Scriptable source that counts every upstream call
pub(crate) struct FakeGitHub {
    user: Mutex<GitHubUser>,
    repos: Mutex<Vec<GitHubRepo>>,
    contributions: Mutex<u64>,
    fail_user: AtomicBool,
    fail_repos: AtomicBool,
    fail_contributions: AtomicBool,
    calls: AtomicUsize,
}

impl FakeGitHub {
    pub(crate) fn new(repos: Vec<GitHubRepo>) -> Self {
        Self {
            user: Mutex::new(sample_user()),
            repos: Mutex::new(repos),
            contributions: Mutex::new(512),
            fail_user: AtomicBool::new(false),
            fail_repos: AtomicBool::new(false),
            fail_contributions: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_user(&self, user: GitHubUser) {
        *self.user.lock().unwrap() = user;
    }

    pub(crate) fn set_repos(&self, repos: Vec<GitHubRepo>) {
        *self.repos.lock().unwrap() = repos;
    }

    pub(crate) fn set_contributions(&self, count: u64) {
        *self.contributions.lock().unwrap() = count;
    }

    pub(crate) fn fail_user(&self, fail: bool) {
        self.fail_user.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_repos(&self, fail: bool) {
        self.fail_repos.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_contributions(&self, fail: bool) {
        self.fail_contributions.store(fail, Ordering::SeqCst);
    }

    /// Total upstream calls made so far
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubSource for FakeGitHub {
    async fn user(&self, _handle: &str) -> Result<GitHubUser> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_user.load(Ordering::SeqCst) {
            return Err(crate::PortfolioError::Upstream {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }
        Ok(self.user.lock().unwrap().clone())
    }

    async fn repos(&self, _handle: &str) -> Result<Vec<GitHubRepo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_repos.load(Ordering::SeqCst) {
            return Err(crate::PortfolioError::Upstream {
                status: 502,
                body: "Bad Gateway".to_string(),
            });
        }
        Ok(self.repos.lock().unwrap().clone())
    }

    async fn contributions(&self, _handle: &str) -> std::result::Result<u64, ContributionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_contributions.load(Ordering::SeqCst) {
            return Err(ContributionError::Shape("data"));
        }
        Ok(*self.contributions.lock().unwrap())
    }
}
