//! Fetch a GitHub user's public gists through a TTL cache and render them as
//! a sidebar HTML list.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod widget;

pub use error::{ConfigError, FetchError, GistError, Result};
pub use fetcher::{GistFetcher, cache_key};
pub use github::{GistSummary, GitHubClient};
pub use widget::{GistWidget, WidgetConfig, WidgetForm, WidgetWrap};
