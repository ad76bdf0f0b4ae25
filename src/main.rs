//! `feedscope` command-line front end.
//!
//! Drives the library against an in-memory address bar:
//!
//! - `decode <URL>`: show the filter state a URL describes
//! - `apply <URL> [operations]`: run store operations and print the synced URL
//! - `link`: build a deep link for one facet value or a search
//! - `filter <URL> --items <FILE>`: apply the URL's filters to a JSON content list
//!
//! Global flags: `--config <FILE>` (TOML), `--base-url <URL>`, `--no-persist`.

#![allow(clippy::multiple_crate_versions)]

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use url::Url;

use feedscope::app::{feed, handle_event};
use feedscope::codec::{self, Facet};
use feedscope::domain::{ContentItem, FilterMode, FilterState, SortBy, SortDirection, TimeRange, ViewMode};
use feedscope::infrastructure::{Location, MemoryLocation};
use feedscope::{Config, Event, FeedSession, FeedscopeError, Result};

#[derive(Debug, Parser)]
#[command(name = "feedscope", version, about = "Faceted feed filters with shareable URLs")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL for generated links
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Neither load nor save stored preferences
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the filter state encoded in a URL
    Decode {
        url: String,
    },
    /// Apply operations to the state of a URL and print the resulting URL
    Apply(ApplyArgs),
    /// Print a deep link for a single facet value or search
    Link(LinkArgs),
    /// Filter a JSON list of content items with the state of a URL
    Filter {
        url: String,
        /// JSON array of content items
        #[arg(long, value_name = "FILE")]
        items: PathBuf,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Debug, Args)]
struct ApplyArgs {
    url: String,
    /// Preset to apply first: all, trending, following, saved
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    reset_filters: bool,
    #[arg(long)]
    reset_search: bool,
    #[arg(long = "toggle-platform", value_name = "PLATFORM")]
    platforms: Vec<String>,
    #[arg(long = "toggle-subtype", value_name = "SUBTYPE")]
    subtypes: Vec<String>,
    #[arg(long = "toggle-category", value_name = "CATEGORY")]
    categories: Vec<String>,
    /// any or all
    #[arg(long)]
    platform_mode: Option<FilterMode>,
    /// any or all
    #[arg(long)]
    subtype_mode: Option<FilterMode>,
    #[arg(long)]
    search: Option<String>,
    /// recent, popular, trending or alpha
    #[arg(long)]
    sort: Option<SortBy>,
    /// asc or desc
    #[arg(long)]
    dir: Option<SortDirection>,
    /// all, 24h, 7d, 30d or 90d
    #[arg(long)]
    time: Option<TimeRange>,
    /// card, compact or list
    #[arg(long)]
    view: Option<ViewMode>,
    #[arg(long)]
    hide_read: Option<bool>,
    #[arg(long)]
    saved_only: Option<bool>,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct LinkArgs {
    #[arg(long)]
    platform: Option<String>,
    #[arg(long)]
    subtype: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    search: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match load_config(&cli) {
        Ok(config) => {
            feedscope::observability::init_tracing(&config);
            match run(cli.command, &config) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "command failed");
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if cli.no_persist {
        config.persist = false;
    }
    Ok(config)
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Decode { url } => decode(&url, config),
        Command::Apply(args) => apply(args, config),
        Command::Link(args) => link(&args, config),
        Command::Filter { url, items, page } => filter(&url, &items, page, config),
    }
}

fn decode(url: &str, config: &Config) -> Result<()> {
    let state = FilterState::from_patch(&codec::decode_href(url));
    let base = Url::parse(url).or_else(|_| Url::parse(&config.base_url))?;

    println!("{}", serde_json::to_string_pretty(&state)?);
    println!("url: {}", codec::share_url(&base, &state));
    println!("summary: {}", feedscope::app::filter_summary(&state));
    Ok(())
}

fn apply(args: ApplyArgs, config: &Config) -> Result<()> {
    let mut location = MemoryLocation::new(args.url.clone());
    let mut session = feedscope::initialize(config, &location.href())?;

    for event in apply_events(args) {
        handle_event(&mut session, &event);
    }
    session.sync_location(&mut location);

    println!("{}", location.href());
    println!("summary: {}", session.store().filter_summary());
    session.shutdown();
    Ok(())
}

fn apply_events(args: ApplyArgs) -> Vec<Event> {
    let mut events = Vec::new();
    events.extend(args.preset.map(Event::ApplyPreset));
    if args.reset_filters {
        events.push(Event::ResetFilters);
    }
    if args.reset_search {
        events.push(Event::ResetSearch);
    }
    events.extend(args.platforms.into_iter().map(Event::TogglePlatform));
    events.extend(args.subtypes.into_iter().map(Event::ToggleSubtype));
    events.extend(args.categories.into_iter().map(Event::ToggleCategory));
    events.extend(args.platform_mode.map(Event::SetPlatformMode));
    events.extend(args.subtype_mode.map(Event::SetSubtypeMode));
    events.extend(args.search.map(Event::SetSearchQuery));
    events.extend(args.sort.map(Event::SetSortBy));
    events.extend(args.dir.map(Event::SetSortDirection));
    events.extend(args.time.map(Event::SetTimeRange));
    events.extend(args.view.map(Event::SetViewMode));
    events.extend(args.hide_read.map(Event::SetHideReadPosts));
    events.extend(args.saved_only.map(Event::SetOnlyShowSavedPosts));
    events
}

fn link(args: &LinkArgs, config: &Config) -> Result<()> {
    let base = Url::parse(&config.base_url)?;
    let url = match (&args.platform, &args.subtype, &args.category, &args.search) {
        (Some(platform), ..) => codec::facet_link(&base, Facet::Platform, platform),
        (_, Some(subtype), ..) => codec::facet_link(&base, Facet::Subtype, subtype),
        (_, _, Some(category), _) => codec::facet_link(&base, Facet::Category, category),
        (_, _, _, Some(query)) => codec::search_link(&base, query),
        (None, None, None, None) => {
            return Err(FeedscopeError::Config("nothing to link to".to_string()));
        }
    };
    println!("{url}");
    Ok(())
}

fn filter(url: &str, items_path: &Path, page: usize, config: &Config) -> Result<()> {
    let contents = std::fs::read_to_string(items_path)?;
    let items: Vec<ContentItem> = serde_json::from_str(&contents)?;

    let session = FeedSession::start(
        &Config {
            persist: false,
            ..config.clone()
        },
        Box::new(feedscope::storage::MemoryStorage::new()),
        url,
    )?;

    let now = Utc::now();
    let view = feed::view(session.state(), &items, page, now);

    println!("{} ({} of {} items)", session.store().filter_summary(), view.items.len(), view.total_items);
    for item in &view.items {
        println!("  {:<12} {:<40} {}", item.id, item.title, item.time_ago(now));
    }
    println!("page {}/{} · {} view", view.page, view.total_pages, view.view_mode);
    Ok(())
}
