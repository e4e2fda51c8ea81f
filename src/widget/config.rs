// Widget instance options.
// Typed record of one placement's settings and the update transition.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fetcher::GistFetcher;

pub const DEFAULT_GIST_COUNT: u32 = 10;
pub const MAX_GIST_COUNT: u32 = 100;
pub const DEFAULT_LINK_TEXT: &str = "See my GitHub profile";

/// Clamp a requested count to 1..=100, falling back to 10.
pub fn normalize_count(count: u32) -> u32 {
    if (1..=MAX_GIST_COUNT).contains(&count) {
        count
    } else {
        DEFAULT_GIST_COUNT
    }
}

/// Saved options for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub title: String,
    pub github_user: String,
    pub gist_count: u32,
    pub show_date: bool,
    pub show_profile_link: bool,
    pub link_text: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            github_user: String::new(),
            gist_count: DEFAULT_GIST_COUNT,
            show_date: false,
            show_profile_link: false,
            link_text: DEFAULT_LINK_TEXT.to_string(),
        }
    }
}

/// Raw values as submitted from an edit form.
///
/// Checkbox fields are present (`Some`, any value) when ticked.
#[derive(Debug, Clone, Default)]
pub struct WidgetForm {
    pub title: String,
    pub github_user: String,
    pub gist_count: String,
    pub show_date: Option<String>,
    pub show_profile_link: Option<String>,
    pub link_text: String,
}

impl WidgetConfig {
    /// Count to request, clamped to the allowed range.
    pub fn effective_count(&self) -> u32 {
        normalize_count(self.gist_count)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_user.is_empty() {
            return Err(ConfigError::MissingUser);
        }
        Ok(())
    }

    /// Build the next config from submitted form values.
    ///
    /// Cached listings for both the previous and the new username are dropped
    /// so the next render fetches under the new settings.
    pub fn update(old: &WidgetConfig, form: &WidgetForm, fetcher: &GistFetcher) -> WidgetConfig {
        let next = WidgetConfig {
            title: sanitize_text_field(&form.title),
            github_user: sanitize_text_field(&form.github_user),
            gist_count: parse_absint(&form.gist_count),
            show_date: is_checked(&form.show_date),
            show_profile_link: is_checked(&form.show_profile_link),
            link_text: sanitize_text_field(&form.link_text),
        };

        if !old.github_user.is_empty() {
            fetcher.invalidate(&old.github_user);
        }
        if !next.github_user.is_empty() && next.github_user != old.github_user {
            fetcher.invalidate(&next.github_user);
        }

        next
    }
}

fn is_checked(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| !v.is_empty() && v != "0")
}

/// Parse a leading integer and take its absolute value; anything else is 0.
fn parse_absint(value: &str) -> u32 {
    let value = value.trim();
    let unsigned = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u64>()
        .map_or(0, |n| n.min(u64::from(u32::MAX)) as u32)
}

/// Strip tags, drop control characters, collapse whitespace, and trim.
fn sanitize_text_field(value: &str) -> String {
    let mut stripped = String::with_capacity(value.len());
    let mut in_tag = false;
    for c in value.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() && !c.is_whitespace() => {}
            c => stripped.push(c),
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
