//! Configuration system
//!
//! Loads ~/.config/portfolio/config.yaml with support for:
//! - The GitHub account being showcased and an optional access token
//! - Profile cache expiration
//! - Server bind address
//! - Base URL resolution for the page-rendering side

mod base_url;
mod portfolio_config;

pub use base_url::{
    BaseUrlChain, BaseUrlProvider, DeploymentHost, ExplicitBaseUrl, LocalDevelopment,
    LOCAL_DEVELOPMENT_URL,
};
pub use portfolio_config::{
    CacheSettings, GitHubSettings, PortfolioConfig, ServerSettings, SiteSettings,
};
