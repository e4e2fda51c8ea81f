// GitHub API module.
// Provides the client and types for listing public gists.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient, token_from_env};
pub use types::{GistSummary, RateLimit};
