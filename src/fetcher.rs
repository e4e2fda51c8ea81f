//! Cached gist fetching.
//!
//! A listing is cached per username. Successful listings live for a day,
//! failures for an hour; a cached failure is served as a failure without
//! contacting GitHub.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheStore, CachedGists, FAILURE_TTL, SUCCESS_TTL};
use crate::error::FetchError;
use crate::github::{GistSummary, GitHubClient};

const CACHE_KEY_PREFIX: &str = "public_github_gists_";

/// Cache key for a user's listing. The requested count is not part of it.
pub fn cache_key(user: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, user)
}

pub struct GistFetcher {
    client: GitHubClient,
    store: Arc<dyn CacheStore>,
}

impl GistFetcher {
    pub fn new(client: GitHubClient, store: Arc<dyn CacheStore>) -> Self {
        Self { client, store }
    }

    /// Return up to `count` of `user`'s public gists in upstream order.
    ///
    /// Never fails loudly: upstream and cache-store problems all come back as
    /// a `FetchError`, and store errors degrade to a cache miss.
    pub async fn fetch(&self, user: &str, count: u32) -> Result<Vec<GistSummary>, FetchError> {
        let key = cache_key(user);

        match self.store.get(&key) {
            Ok(Some(CachedGists::Gists(gists))) => {
                debug!(user, count = gists.len(), "gist cache hit");
                return Ok(gists);
            }
            Ok(Some(CachedGists::Failed)) => {
                debug!(user, "cached gist failure");
                return Err(FetchError::Cached);
            }
            Ok(None) => debug!(user, "gist cache miss"),
            Err(e) => warn!(user, error = %e, "gist cache read failed, treating as miss"),
        }

        info!(user, count, "fetching gists from GitHub");
        let result = match self.client.list_user_gists(user, count).await {
            Ok(gists) if gists.is_empty() => Err(FetchError::EmptyResult),
            Ok(gists) => Ok(gists),
            Err(e) => Err(FetchError::from(e)),
        };

        match result {
            Ok(gists) => {
                self.store_value(&key, &CachedGists::Gists(gists.clone()), SUCCESS_TTL);
                Ok(gists)
            }
            Err(e) => {
                warn!(user, error = %e, "gist fetch failed");
                self.store_value(&key, &CachedGists::Failed, FAILURE_TTL);
                Err(e)
            }
        }
    }

    /// Drop the cached listing for `user` so the next fetch goes upstream.
    pub fn invalidate(&self, user: &str) {
        if let Err(e) = self.store.delete(&cache_key(user)) {
            warn!(user, error = %e, "failed to delete cached gists");
        }
    }

    fn store_value(&self, key: &str, value: &CachedGists, ttl: std::time::Duration) {
        if let Err(e) = self.store.set(key, value, ttl) {
            warn!(key, error = %e, "failed to write gist cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileStore, ManualClock, MemoryStore, paths, store};
    use chrono::TimeDelta;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        server: MockServer,
        clock: Arc<ManualClock>,
        fetcher: GistFetcher,
    }

    async fn harness() -> Harness {
        let server = MockServer::start().await;
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let client = GitHubClient::new(&server.uri(), None).unwrap();
        Harness {
            server,
            clock,
            fetcher: GistFetcher::new(client, store),
        }
    }

    fn one_gist() -> serde_json::Value {
        serde_json::json!([{
            "id": "1",
            "description": "",
            "html_url": "https://gist.github.com/1",
            "created_at": "2024-01-02T00:00:00Z"
        }])
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.unwrap_or_default().len()
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("octocat"), "public_github_gists_octocat");
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_gist_id_title() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .and(query_param("per_page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .mount(&h.server)
            .await;

        let gists = h.fetcher.fetch("octocat", 5).await.unwrap();
        assert_eq!(gists.len(), 1);
        assert_eq!(gists[0].description, "");
        assert_eq!(gists[0].display_title(), "Gist ID: 1");
        assert_eq!(gists[0].display_date().as_deref(), Some("1/2/2024"));
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .mount(&h.server)
            .await;

        let first = h.fetcher.fetch("octocat", 5).await.unwrap();
        let second = h.fetcher.fetch("octocat", 5).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(request_count(&h.server).await, 1);
    }

    #[tokio::test]
    async fn test_success_expires_after_a_day() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .mount(&h.server)
            .await;

        h.fetcher.fetch("octocat", 5).await.unwrap();
        h.clock.advance(TimeDelta::hours(23));
        h.fetcher.fetch("octocat", 5).await.unwrap();
        assert_eq!(request_count(&h.server).await, 1);

        h.clock.advance(TimeDelta::hours(1) + TimeDelta::seconds(1));
        h.fetcher.fetch("octocat", 5).await.unwrap();
        assert_eq!(request_count(&h.server).await, 2);
    }

    #[tokio::test]
    async fn test_failure_is_cached_for_an_hour() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&h.server)
            .await;

        let err = h.fetcher.fetch("octocat", 10).await.unwrap_err();
        assert_eq!(err, FetchError::UpstreamError { status: 404 });

        h.clock.advance(TimeDelta::minutes(59));
        let err = h.fetcher.fetch("octocat", 10).await.unwrap_err();
        assert_eq!(err, FetchError::Cached);
        assert_eq!(request_count(&h.server).await, 1);

        h.clock.advance(TimeDelta::minutes(1) + TimeDelta::seconds(1));
        assert!(h.fetcher.fetch("octocat", 10).await.is_err());
        assert_eq!(request_count(&h.server).await, 2);
    }

    #[tokio::test]
    async fn test_empty_listing_is_a_failure() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&h.server)
            .await;

        let err = h.fetcher.fetch("octocat", 10).await.unwrap_err();
        assert_eq!(err, FetchError::EmptyResult);
        assert_eq!(
            h.fetcher.fetch("octocat", 10).await.unwrap_err(),
            FetchError::Cached
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_failure() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\":"))
            .mount(&h.server)
            .await;

        let err = h.fetcher.fetch("octocat", 10).await.unwrap_err();
        assert!(matches!(err, FetchError::ParseFailure(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(MemoryStore::with_clock(clock));
        // Nothing listens on the discard port.
        let client = GitHubClient::new("http://127.0.0.1:9", None).unwrap();
        let fetcher = GistFetcher::new(client, store.clone());

        let err = fetcher.fetch("octocat", 10).await.unwrap_err();
        assert!(matches!(err, FetchError::UpstreamUnavailable(_)));
        assert_eq!(
            store.get(&cache_key("octocat")).unwrap(),
            Some(CachedGists::Failed)
        );
    }

    #[tokio::test]
    async fn test_counts_share_one_entry() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .expect(1)
            .mount(&h.server)
            .await;

        let small = h.fetcher.fetch("octocat", 1).await.unwrap();
        let large = h.fetcher.fetch("octocat", 50).await.unwrap();

        assert_eq!(small, large);
        assert_eq!(request_count(&h.server).await, 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .mount(&h.server)
            .await;

        h.fetcher.fetch("octocat", 5).await.unwrap();
        h.fetcher.invalidate("octocat");
        h.fetcher.fetch("octocat", 5).await.unwrap();

        assert_eq!(request_count(&h.server).await, 2);
    }

    #[tokio::test]
    async fn test_bad_date_on_one_gist_keeps_listing() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "1", "description": "dated", "created_at": "2024-01-02T00:00:00Z"},
                {"id": "2", "description": "blank date", "created_at": ""}
            ])))
            .mount(&h.server)
            .await;

        let gists = h.fetcher.fetch("octocat", 10).await.unwrap();
        assert_eq!(gists.len(), 2);
        assert_eq!(gists[0].display_date().as_deref(), Some("1/2/2024"));
        assert!(gists[1].created_at.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_cache_file_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let entry = paths::entry_path(temp_dir.path(), &cache_key("octocat"));
        std::fs::write(&entry, "not json").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None).unwrap();
        let fetcher = GistFetcher::new(client, Arc::new(FileStore::new(temp_dir.path())));

        let gists = fetcher.fetch("octocat", 5).await.unwrap();
        assert_eq!(gists.len(), 1);
        assert_eq!(request_count(&server).await, 1);

        let rewritten = store::read_entry(&entry).unwrap().unwrap();
        assert_eq!(rewritten.value, CachedGists::Gists(gists));
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_returns_gists() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the cache directory should be makes every write fail.
        let blocked_root = temp_dir.path().join("blocked");
        std::fs::write(&blocked_root, "").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/gists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_gist()))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None).unwrap();
        let store = Arc::new(FileStore::new(&blocked_root));
        let fetcher = GistFetcher::new(client, store.clone());

        assert!(fetcher.fetch("octocat", 5).await.is_ok());
        assert!(store.set("k", &CachedGists::Failed, FAILURE_TTL).is_err());

        // Nothing was cached, so the next call goes upstream again.
        assert!(fetcher.fetch("octocat", 5).await.is_ok());
        assert_eq!(request_count(&server).await, 2);
    }
}
