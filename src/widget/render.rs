// HTML rendering for the gist list widget.

use crate::error::FetchError;
use crate::github::GistSummary;

use super::config::WidgetConfig;

const PROFILE_BASE: &str = "https://github.com/";
const DEFAULT_PROFILE_TEXT: &str = "Github Profile";

/// Markup placed around the widget and its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetWrap {
    pub before_widget: String,
    pub after_widget: String,
    pub before_title: String,
    pub after_title: String,
}

impl Default for WidgetWrap {
    fn default() -> Self {
        Self {
            before_widget: r#"<div class="widget list_gists">"#.to_string(),
            after_widget: "</div>".to_string(),
            before_title: r#"<h3 class="widget-title">"#.to_string(),
            after_title: "</h3>".to_string(),
        }
    }
}

/// Render the widget for a fetch result.
///
/// Produces an empty string when no user is configured or the fetch failed,
/// whatever the failure was.
pub fn render_widget(
    config: &WidgetConfig,
    result: &Result<Vec<GistSummary>, FetchError>,
    wrap: &WidgetWrap,
) -> String {
    if config.github_user.is_empty() {
        return String::new();
    }
    let Ok(gists) = result else {
        return String::new();
    };

    let mut out = String::new();
    out.push_str(&wrap.before_widget);

    if !config.title.is_empty() {
        out.push_str(&wrap.before_title);
        out.push_str(&escape_html(&config.title));
        out.push_str(&wrap.after_title);
    }

    out.push_str("<ul>");
    for gist in gists {
        render_item(&mut out, gist, config.show_date);
    }
    out.push_str("</ul>");

    if config.show_profile_link {
        let text = if config.link_text.is_empty() {
            DEFAULT_PROFILE_TEXT
        } else {
            config.link_text.as_str()
        };
        out.push_str(&format!(
            r#"<p class="github_link"><a href="{}{}" target="_blank">{}</a></p>"#,
            PROFILE_BASE,
            escape_html(&config.github_user),
            escape_html(text)
        ));
    }

    out.push_str(&wrap.after_widget);
    out
}

fn render_item(out: &mut String, gist: &GistSummary, show_date: bool) {
    let title = escape_html(&gist.display_title());

    out.push_str(r#"<li class="gist_item">"#);
    if gist.url.is_empty() {
        out.push_str(&title);
    } else {
        out.push_str(&format!(
            r#"<a class="gist_title" href="{}" target="_blank">{}</a>"#,
            escape_html(&gist.url),
            title
        ));
    }

    if show_date {
        if let Some(date) = gist.display_date() {
            out.push_str(&format!(
                r#"<br /><span class="gist_date">Created:{}</span>"#,
                date
            ));
        }
    }
    out.push_str("</li>");
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    escaped
}
