//! GitHub upstream
//!
//! Typed access to the REST profile and repository endpoints and the
//! GraphQL contribution calendar.

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod models;
mod source;

pub use client::{GitHubClient, GitHubEndpoints};
pub use models::{GitHubRepo, GitHubUser};
pub use source::{ContributionError, GitHubSource};
