// GitHub API endpoint functions.
// Typed methods for the gist listing endpoints of the REST API.

use tracing::debug;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::GistSummary;

impl GitHubClient {
    /// List a user's public gists, newest first, up to `per_page` items.
    pub async fn list_user_gists(&self, user: &str, per_page: u32) -> Result<Vec<GistSummary>> {
        let params = [("per_page", per_page.to_string())];
        let response = self
            .get_with_params(
                &format!("/users/{}/gists", urlencoding::encode(user)),
                &params,
            )
            .await?;

        // Decode from text so a bad body surfaces as a JSON error, not a transport one.
        let body = response.text().await?;
        let gists: Vec<GistSummary> = serde_json::from_str(&body)?;

        let rate_limit = self.rate_limit();
        debug!(
            user,
            count = gists.len(),
            remaining = rate_limit.remaining,
            "listed gists"
        );
        Ok(gists)
    }
}
