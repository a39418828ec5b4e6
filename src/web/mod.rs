//! Site-side consumer of the portfolio API
//!
//! Page rendering reads from:
//! - /api/github-profile - Profile header and stats
//! - /api/github-featured - Homepage carousel
//! - /api/github-projects - Projects page

mod client;

pub use client::SiteClient;
