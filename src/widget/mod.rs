// Sidebar widget: options, update handling, and HTML output.

pub mod config;
pub mod render;

pub use config::{WidgetConfig, WidgetForm, normalize_count};
pub use render::{WidgetWrap, escape_html, render_widget};

use crate::fetcher::GistFetcher;

/// A configured widget instance.
#[derive(Debug, Clone, Default)]
pub struct GistWidget {
    pub config: WidgetConfig,
    pub wrap: WidgetWrap,
}

impl GistWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            wrap: WidgetWrap::default(),
        }
    }

    /// Fetch this instance's gists and render them. Empty when there is nothing to show.
    pub async fn render(&self, fetcher: &GistFetcher) -> String {
        if self.config.github_user.is_empty() {
            return String::new();
        }

        let result = fetcher
            .fetch(&self.config.github_user, self.config.effective_count())
            .await;
        render_widget(&self.config, &result, &self.wrap)
    }

    /// Apply submitted form values, invalidating cached listings.
    pub fn apply_form(&mut self, form: &WidgetForm, fetcher: &GistFetcher) {
        self.config = WidgetConfig::update(&self.config, form, fetcher);
    }
}
