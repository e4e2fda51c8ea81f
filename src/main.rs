use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gistlist::cache::{CacheStore, FileStore, MemoryStore, paths};
use gistlist::config::AppConfig;
use gistlist::github::token_from_env;
use gistlist::{GistFetcher, GistWidget, GitHubClient, WidgetConfig, widget::normalize_count};

#[derive(Parser, Debug)]
#[command(name = "gistlist")]
#[command(about = "List a GitHub user's public gists as a sidebar widget")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./gistlist.yaml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep cached listings in memory only
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a widget as HTML
    Render(RenderArgs),
    /// Print a user's gists as JSON
    Fetch {
        user: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u32,
    },
    /// Drop the cached listing for a user
    Clear { user: String },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Widget name from the config file
    widget: Option<String>,
    #[arg(long)]
    user: Option<String>,
    #[arg(short = 'n', long)]
    count: Option<u32>,
    #[arg(long)]
    title: Option<String>,
    /// Show creation dates
    #[arg(long, overrides_with = "no_date")]
    date: bool,
    /// Hide creation dates even when the widget config shows them
    #[arg(long, overrides_with = "date")]
    no_date: bool,
    /// Append a link to the GitHub profile
    #[arg(long, overrides_with = "no_link")]
    link: bool,
    /// Drop the profile link even when the widget config has one
    #[arg(long, overrides_with = "link")]
    no_link: bool,
    #[arg(long)]
    link_text: Option<String>,
}

impl RenderArgs {
    /// Overlay command-line options onto a configured (or default) widget.
    fn into_config(self, base: WidgetConfig) -> WidgetConfig {
        WidgetConfig {
            title: self.title.unwrap_or(base.title),
            github_user: self.user.unwrap_or(base.github_user),
            gist_count: self.count.unwrap_or(base.gist_count),
            show_date: overlay_flag(self.date, self.no_date, base.show_date),
            show_profile_link: overlay_flag(self.link, self.no_link, base.show_profile_link),
            link_text: self.link_text.unwrap_or(base.link_text),
        }
    }
}

/// `--x` forces on, `--no-x` forces off, neither keeps the configured value.
fn overlay_flag(on: bool, off: bool, configured: bool) -> bool {
    if off { false } else { on || configured }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let store: Arc<dyn CacheStore> = if cli.no_cache {
        Arc::new(MemoryStore::new())
    } else {
        let dir = config
            .cache_dir
            .clone()
            .or_else(paths::cache_dir)
            .ok_or("could not determine cache directory")?;
        Arc::new(FileStore::new(dir))
    };

    let token = token_from_env();
    let client = GitHubClient::with_timeout(&config.api_base, token.as_deref(), config.timeout())?;
    let fetcher = GistFetcher::new(client, store);

    match cli.command {
        Command::Render(args) => {
            let base = match &args.widget {
                Some(name) => config.widget(name)?.clone(),
                None => WidgetConfig::default(),
            };
            let widget_config = args.into_config(base);
            widget_config.validate()?;

            let html = GistWidget::new(widget_config).render(&fetcher).await;
            if !html.is_empty() {
                println!("{}", html);
            }
        }
        Command::Fetch { user, count } => {
            if let Ok(gists) = fetcher.fetch(&user, normalize_count(count)).await {
                println!("{}", serde_json::to_string_pretty(&gists)?);
            }
        }
        Command::Clear { user } => fetcher.invalidate(&user),
    }

    Ok(())
}
