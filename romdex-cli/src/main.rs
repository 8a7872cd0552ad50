//! romdex CLI
//!
//! Command-line interface for scraping game metadata from remote catalogs.

mod session;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::mpsc;

use romdex_core::{GameRecord, QuotaState, RegionTag};
use romdex_sources::{
    Credentials, HttpTransport, SOURCE_NAMES, ScrapeOptions, SourceAdapter, config_path,
    for_source,
};
use session::{SessionEvent, TargetOutcome};

#[derive(Parser)]
#[command(name = "romdex")]
#[command(about = "Scrape game metadata from remote catalog services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Common arguments for commands that query a catalog source.
#[derive(Args, Clone)]
struct SourceArgs {
    /// Catalog source to query (see `romdex sources`)
    #[arg(short, long, default_value = "igdb")]
    source: String,

    /// Region priority order for dates and media (e.g., us,eu,jp)
    #[arg(long, value_delimiter = ',')]
    region_prios: Option<Vec<RegionTag>>,

    /// Preferred language for descriptions (e.g., en, fr)
    #[arg(long, default_value = "en")]
    language: String,

    /// Skip cover art URLs
    #[arg(long)]
    no_covers: bool,

    /// Skip screenshot URLs
    #[arg(long)]
    no_screenshots: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a catalog for games matching a term on one platform
    Search {
        /// Game title to search for
        term: String,

        /// Platform name or alias (e.g., amiga, snes, ps1)
        #[arg(short, long)]
        platform: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scrape full metadata records for one or more titles
    Scrape {
        /// Game titles to scrape
        #[arg(required = true)]
        terms: Vec<String>,

        /// Platform name or alias the titles belong to
        #[arg(short, long)]
        platform: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Maximum number of titles looked up concurrently
        #[arg(short, long, default_value_t = 2)]
        workers: usize,

        /// Print records as JSON instead of field listings
        #[arg(long)]
        json: bool,
    },

    /// List the known catalog sources
    Sources,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            term,
            platform,
            source,
            json,
        } => {
            run_search(&term, &platform, &source, json);
        }
        Commands::Scrape {
            terms,
            platform,
            source,
            workers,
            json,
        } => {
            run_scrape(terms, &platform, &source, workers, json);
        }
        Commands::Sources => run_sources(),
    }
}

/// Build the requested adapter, printing guidance when the source name or
/// its credentials are bad.
fn build_adapter(args: &SourceArgs, quota: &Arc<QuotaState>) -> Option<Box<dyn SourceAdapter>> {
    let transport = match HttpTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!(
                "{} Failed to build HTTP client: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return None;
        }
    };

    let mut options = ScrapeOptions::default();
    if let Some(ref priorities) = args.region_prios {
        options = options.with_region_priorities(priorities.clone());
    }
    options.language = args.language.clone();
    options.fetch_covers = !args.no_covers;
    options.fetch_screenshots = !args.no_screenshots;

    let credentials = Credentials::load();
    match for_source(
        &args.source,
        Arc::new(transport),
        Arc::clone(quota),
        options,
        &credentials,
    ) {
        Ok(adapter) => Some(adapter),
        Err(e) => {
            eprintln!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), e);
            if SOURCE_NAMES.contains(&args.source.as_str()) {
                if let Some(path) = config_path() {
                    eprintln!();
                    eprintln!("Credentials can also go in {}", path.display());
                }
            }
            None
        }
    }
}

/// Run the search command.
fn run_search(term: &str, platform: &str, args: &SourceArgs, json: bool) {
    let quota = Arc::new(QuotaState::new());
    let Some(adapter) = build_adapter(args, &quota) else {
        return;
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("/-\\|"),
        );
        pb.set_message(format!("Searching {} for {}...", adapter.name(), term));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let candidates = match adapter.search(term, platform).await {
            Ok(candidates) => candidates,
            Err(e) => {
                pb.finish_and_clear();
                eprintln!(
                    "{} Search failed: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                return;
            }
        };
        pb.finish_and_clear();

        if json {
            match serde_json::to_string_pretty(&candidates) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Failed to serialize candidates: {}", e),
            }
            return;
        }

        if candidates.is_empty() {
            if quota.is_exhausted() {
                println!(
                    "{} Request quota exhausted",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                );
            } else {
                println!(
                    "{} No matches for \"{}\" on {}",
                    "?".if_supports_color(Stdout, |t| t.yellow()),
                    term,
                    platform,
                );
            }
            return;
        }

        println!(
            "{} {} match(es) for \"{}\" on {}:",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            candidates.len(),
            term,
            platform,
        );
        println!();
        for candidate in &candidates {
            println!(
                "  {} [{}]",
                candidate.title.if_supports_color(Stdout, |t| t.bold()),
                candidate
                    .id
                    .to_string()
                    .if_supports_color(Stdout, |t| t.cyan()),
            );
            println!("    Platform: {}", candidate.platform);
        }
    });
}

/// Run the scrape command.
fn run_scrape(terms: Vec<String>, platform: &str, args: &SourceArgs, workers: usize, json: bool) {
    let quota = Arc::new(QuotaState::new());
    let Some(adapter) = build_adapter(args, &quota) else {
        return;
    };

    if !json {
        println!(
            "Scraping {} title(s) for {} from {}",
            terms.len(),
            platform.if_supports_color(Stdout, |t| t.cyan()),
            adapter.name().if_supports_color(Stdout, |t| t.cyan()),
        );
        println!();
    }

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("/-\\|"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let session = session::scrape_terms(
            adapter.as_ref(),
            terms,
            platform,
            &quota,
            workers,
            events_tx,
        );
        let progress = async {
            while let Some(event) = events_rx.recv().await {
                match event {
                    SessionEvent::Searching { index, total, term } => {
                        pb.set_message(format!("[{}/{}] Looking up {}", index + 1, total, term));
                    }
                    SessionEvent::Scraped { title } => {
                        pb.set_message(format!("Scraped {}", title));
                    }
                    SessionEvent::NotFound { term } => {
                        pb.set_message(format!("No match for {}", term));
                    }
                    SessionEvent::Skipped { term } => {
                        pb.set_message(format!("Skipped {}", term));
                    }
                    SessionEvent::Done => {}
                }
            }
        };
        let (outcomes, _) = tokio::join!(session, progress);
        pb.finish_and_clear();

        if json {
            let records: Vec<&GameRecord> = outcomes
                .iter()
                .filter_map(|outcome| match outcome {
                    TargetOutcome::Scraped(record) => Some(record),
                    _ => None,
                })
                .collect();
            match serde_json::to_string_pretty(&records) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Failed to serialize records: {}", e),
            }
            return;
        }

        let mut scraped = 0usize;
        let mut not_found = 0usize;
        let mut skipped = 0usize;

        for outcome in &outcomes {
            match outcome {
                TargetOutcome::Scraped(record) => {
                    scraped += 1;
                    print_record(record);
                }
                TargetOutcome::NotFound { term } => {
                    not_found += 1;
                    println!(
                        "{} No match for \"{}\" on {}",
                        "?".if_supports_color(Stdout, |t| t.yellow()),
                        term,
                        platform,
                    );
                    println!();
                }
                TargetOutcome::Skipped { term } => {
                    skipped += 1;
                    println!(
                        "{} Skipped \"{}\" (quota exhausted)",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        term,
                    );
                    println!();
                }
            }
        }

        println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
        if scraped > 0 {
            println!(
                "  {} {} scraped",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                scraped,
            );
        }
        if not_found > 0 {
            println!(
                "  {} {} not found",
                "?".if_supports_color(Stdout, |t| t.yellow()),
                not_found,
            );
        }
        if skipped > 0 {
            println!(
                "  {} {} skipped (quota exhausted)",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                skipped,
            );
        }
        if let Some(remaining) = quota.remaining() {
            println!("  Quota: {} requests remaining today", remaining);
        }
    });
}

/// Print one populated record as an indented field listing.
fn print_record(record: &GameRecord) {
    let title = record.title.as_deref().unwrap_or("(untitled)");
    println!(
        "{} [{}] {}",
        title.if_supports_color(Stdout, |t| t.bold()),
        record
            .id
            .to_string()
            .if_supports_color(Stdout, |t| t.cyan()),
        format!("({} fields)", record.populated_fields())
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if let Some(ref platform) = record.platform {
        println!("  Platform: {}", platform);
    }
    if let Some(ref date) = record.release_date {
        println!("  Released: {}", date);
    }
    if let Some(ref developer) = record.developer {
        println!("  Developer: {}", developer);
    }
    if let Some(ref publisher) = record.publisher {
        println!("  Publisher: {}", publisher);
    }
    if let Some(rating) = record.rating {
        println!("  Rating: {:.2}", rating);
    }
    if let Some(ages) = record.ages {
        println!("  Ages: {}", ages);
    }
    if let Some(players) = record.players {
        println!("  Players: {}", players);
    }
    if let Some(ref tags) = record.tags {
        println!("  Tags: {}", tags);
    }
    if let Some(ref cover) = record.cover_url {
        println!("  Cover: {}", cover);
    }
    if let Some(ref screenshot) = record.screenshot_url {
        println!("  Screenshot: {}", screenshot);
    }
    if let Some(ref description) = record.description {
        println!("  {}", description);
    }
    println!();
}

/// List the known catalog sources and the credentials each one wants.
fn run_sources() {
    println!("{}", "Known sources:".if_supports_color(Stdout, |t| t.bold()));
    println!();

    for &name in SOURCE_NAMES {
        match name {
            "igdb" => {
                println!(
                    "  {} [{}]",
                    name.if_supports_color(Stdout, |t| t.bold()),
                    "IGDB.com".if_supports_color(Stdout, |t| t.cyan()),
                );
                println!("    Credentials: ROMDEX_IGDB_APIKEY");
            }
            "screenscraper" => {
                println!(
                    "  {} [{}]",
                    name.if_supports_color(Stdout, |t| t.bold()),
                    "ScreenScraper.fr".if_supports_color(Stdout, |t| t.cyan()),
                );
                println!("    Credentials: ROMDEX_SS_DEVID, ROMDEX_SS_DEVPASSWORD");
                println!("    Optional: ROMDEX_SS_SSID, ROMDEX_SS_SSPASSWORD (account quota)");
            }
            other => {
                println!("  {}", other.if_supports_color(Stdout, |t| t.bold()));
            }
        }
    }

    println!();
    if let Some(path) = config_path() {
        println!("Config file: {}", path.display());
    }
}
