//! Portfolio configuration file handling
//!
//! Loads ~/.config/portfolio/config.yaml and overlays environment variables.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upstream GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// Account whose profile and repositories are shown
    #[serde(default = "default_username")]
    pub username: String,

    /// Access token; requests are anonymous when unset
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// GitHub (or GitHub Enterprise) URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_username() -> String {
    "Klumpsy".to_string()
}

fn default_api_url() -> String {
    "https://github.com".to_string()
}

fn default_user_agent() -> String {
    "Portfolio-App".to_string()
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            username: default_username(),
            token: None,
            api_url: default_api_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// In-process profile cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Expiration window in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    3600
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Settings used by the page-rendering side to reach the API over HTTP
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Explicitly configured public base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Hostname provided by the hosting platform for the current deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_host: Option<String>,
}

/// Portfolio configuration
///
/// Represents the complete config.yaml file. Every section is optional and
/// falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub github: GitHubSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub site: SiteSettings,
}

impl PortfolioConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists there
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::PortfolioError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading portfolio configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            username = %config.github.username,
            ttl_secs = config.cache.ttl_secs,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving portfolio configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/portfolio/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("portfolio");
        path.push("config.yaml");
        path
    }

    /// Overlay values from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup. Empty values count as unset.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(username) = var("GITHUB_USERNAME") {
            self.github.username = username;
        }
        if let Some(token) = var("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(api_url) = var("GITHUB_API_URL") {
            self.github.api_url = api_url;
        }
        if let Some(ttl) = var("PORTFOLIO_CACHE_TTL_SECS") {
            self.cache.ttl_secs = ttl.trim().parse().map_err(|e| {
                crate::PortfolioError::Config(format!(
                    "Invalid PORTFOLIO_CACHE_TTL_SECS value '{}': {}",
                    ttl, e
                ))
            })?;
        }
        if let Some(bind) = var("PORTFOLIO_BIND") {
            self.server.bind = bind;
        }
        if let Some(base_url) = var("PORTFOLIO_BASE_URL") {
            self.site.base_url = Some(base_url);
        }
        if let Some(host) = var("VERCEL_URL") {
            self.site.deployment_host = Some(host);
        }

        if self.github.token.is_none() {
            tracing::info!("No GitHub token configured, upstream requests will be unauthenticated");
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PortfolioConfig::default();
        assert_eq!(config.github.username, "Klumpsy");
        assert!(config.github.token.is_none());
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert!(config.site.base_url.is_none());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: PortfolioConfig =
            serde_yaml::from_str("github:\n  username: octocat\ncache:\n  ttl_secs: 1800\n")
                .unwrap();
        assert_eq!(config.github.username, "octocat");
        assert_eq!(config.github.user_agent, "Portfolio-App");
        assert_eq!(config.cache.ttl_secs, 1800);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_save_and_load_skips_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");

        let mut config = PortfolioConfig::default();
        config.github.username = "octocat".to_string();
        config.github.token = Some("secret".to_string());
        config.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret"));

        let loaded = PortfolioConfig::load(&path).unwrap();
        assert_eq!(loaded.github.username, "octocat");
        assert!(loaded.github.token.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = PortfolioConfig::load(temp_dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(crate::PortfolioError::Config(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "github: [not, a, map").unwrap();
        let result = PortfolioConfig::load(&path);
        assert!(matches!(result, Err(crate::PortfolioError::Yaml(_))));
    }

    #[test]
    fn test_env_overlay() {
        let config = PortfolioConfig::default()
            .apply_vars(lookup(&[
                ("GITHUB_USERNAME", "octocat"),
                ("GITHUB_TOKEN", "ghp_123"),
                ("PORTFOLIO_CACHE_TTL_SECS", "1800"),
                ("PORTFOLIO_BASE_URL", "https://example.dev"),
                ("VERCEL_URL", "portfolio-abc.vercel.app"),
            ]))
            .unwrap();

        assert_eq!(config.github.username, "octocat");
        assert_eq!(config.github.token.as_deref(), Some("ghp_123"));
        assert_eq!(config.cache.ttl_secs, 1800);
        assert_eq!(config.site.base_url.as_deref(), Some("https://example.dev"));
        assert_eq!(
            config.site.deployment_host.as_deref(),
            Some("portfolio-abc.vercel.app")
        );
    }

    #[test]
    fn test_empty_env_values_are_unset() {
        let config = PortfolioConfig::default()
            .apply_vars(lookup(&[("GITHUB_TOKEN", ""), ("GITHUB_USERNAME", "  ")]))
            .unwrap();
        assert!(config.github.token.is_none());
        assert_eq!(config.github.username, "Klumpsy");
    }

    #[test]
    fn test_invalid_ttl() {
        let result =
            PortfolioConfig::default().apply_vars(lookup(&[("PORTFOLIO_CACHE_TTL_SECS", "soon")]));
        assert!(matches!(result, Err(crate::PortfolioError::Config(_))));
    }
}
