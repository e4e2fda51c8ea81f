// GitHub API response types.
// Defines the gist summary record and rate limit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Public gist as listed by `/users/{user}/gists`.
///
/// Only the fields the widget displays are kept; the rest of the upstream
/// object is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistSummary {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "html_url", default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl GistSummary {
    /// Title shown in the list: the description, or the id when there is none.
    pub fn display_title(&self) -> String {
        if self.description.is_empty() {
            format!("Gist ID: {}", self.id)
        } else {
            self.description.clone()
        }
    }

    /// Creation date as `M/D/YYYY`, without zero padding.
    pub fn display_date(&self) -> Option<String> {
        self.created_at.map(|dt| dt.format("%-m/%-d/%Y").to_string())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Null, empty, or unparseable timestamps read as no timestamp.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
