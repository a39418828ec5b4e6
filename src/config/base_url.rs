//! Public base URL resolution
//!
//! Server-rendered pages reach the API over HTTP, so they need the public
//! base URL of the current deployment. Providers are consulted in order and
//! the chain always ends with the local development address.

use super::SiteSettings;

/// Address used when nothing else is configured
pub const LOCAL_DEVELOPMENT_URL: &str = "http://localhost:3000";

/// A single source of a base URL
pub trait BaseUrlProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// The base URL this provider knows about, if any
    fn base_url(&self) -> Option<String>;
}

/// Explicitly configured base URL
#[derive(Debug, Clone)]
pub struct ExplicitBaseUrl(pub Option<String>);

impl BaseUrlProvider for ExplicitBaseUrl {
    fn name(&self) -> &str {
        "explicit"
    }

    fn base_url(&self) -> Option<String> {
        self.0
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// Hostname handed out by the hosting platform (no scheme)
#[derive(Debug, Clone)]
pub struct DeploymentHost(pub Option<String>);

impl BaseUrlProvider for DeploymentHost {
    fn name(&self) -> &str {
        "deployment"
    }

    fn base_url(&self) -> Option<String> {
        let host = self.0.as_deref()?.trim().trim_end_matches('/');
        if host.is_empty() {
            return None;
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Some(host.to_string())
        } else {
            Some(format!("https://{}", host))
        }
    }
}

/// Hardcoded local development address
#[derive(Debug, Clone, Default)]
pub struct LocalDevelopment;

impl BaseUrlProvider for LocalDevelopment {
    fn name(&self) -> &str {
        "local"
    }

    fn base_url(&self) -> Option<String> {
        Some(LOCAL_DEVELOPMENT_URL.to_string())
    }
}

/// Ordered list of providers, highest priority first
pub struct BaseUrlChain {
    providers: Vec<Box<dyn BaseUrlProvider>>,
}

impl BaseUrlChain {
    /// Standard chain: explicit URL, then deployment host, then localhost
    pub fn from_settings(settings: &SiteSettings) -> Self {
        Self::new(vec![
            Box::new(ExplicitBaseUrl(settings.base_url.clone())),
            Box::new(DeploymentHost(settings.deployment_host.clone())),
        ])
    }

    /// Build a chain from custom providers. The local development provider
    /// is always appended as the final fallback.
    pub fn new(mut providers: Vec<Box<dyn BaseUrlProvider>>) -> Self {
        providers.push(Box::new(LocalDevelopment));
        Self { providers }
    }

    /// First base URL any provider yields
    pub fn resolve(&self) -> String {
        for provider in &self.providers {
            if let Some(url) = provider.base_url() {
                tracing::debug!(provider = provider.name(), url = %url, "Resolved base URL");
                return url;
            }
            tracing::trace!(provider = provider.name(), "Base URL provider has no value");
        }

        LOCAL_DEVELOPMENT_URL.to_string()
    }
}
