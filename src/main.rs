//! wcloud - sentiment word cloud layout
//!
//! Reads a JSON array of scored messages, ranks their salient phrases by
//! sentiment and prints the positioned cloud as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_wcloud::config::{Config, DEFAULT_CONFIG_FILE};
use sentiment_wcloud::{count_range, messages_for_person, preview, Message, WordCloud};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Lay out a sentiment word cloud from scored messages
///
/// Examples:
///   wcloud --input messages.json
///   wcloud --input messages.json --person 3 --spread 1.4 --preview cloud.png
///   wcloud --init-config
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON file with an array of messages
    #[clap(short, long, value_parser, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Only use messages written about this person
    #[clap(long, value_parser, value_name = "ID")]
    person: Option<i64>,

    /// Maximum number of entries in the cloud
    #[clap(short, long, value_parser, value_name = "COUNT")]
    limit: Option<usize>,

    /// Spread multiplier for the spiral placement
    #[clap(short, long, value_parser)]
    spread: Option<f64>,

    /// Write the positioned entries here instead of stdout
    #[clap(short, long, value_parser, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Save a PNG preview of the layout
    #[clap(long, value_parser, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Preview background, any CSS color
    #[clap(long, value_parser, value_name = "COLOR")]
    background: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wcloud.toml in the current directory
    #[clap(short, long, value_parser, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long, action)]
    verbose: bool,

    /// Only log errors
    #[clap(short, long, action, conflicts_with = "verbose")]
    quiet: bool,

    /// Write a default .wcloud.toml and exit
    #[clap(long, action)]
    init_config: bool,
}

impl Args {
    fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("wcloud failed: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists", DEFAULT_CONFIG_FILE);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;
    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::load_default()
            .context("Failed to load .wcloud.toml")?
            .unwrap_or_default(),
    };

    if let Some(limit) = args.limit {
        config.cloud.limit = limit;
    }
    if let Some(spread) = args.spread {
        config.cloud.spread = spread;
    }
    if let Some(background) = &args.background {
        config.preview.background = background.clone();
    }

    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    let input = args.input.as_deref().context("--input is required")?;
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut messages: Vec<Message> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse messages from {}", input.display()))?;

    if let Some(person_id) = args.person {
        messages = messages_for_person(&messages, person_id);
        info!("{} messages for person {}", messages.len(), person_id);
    }

    let cloud = WordCloud::default()
        .with_limit(config.cloud.limit)
        .with_spread(config.cloud.spread);
    let entries = cloud.build(&messages);
    let positioned = cloud.layout(&entries);
    info!(
        "{} messages -> {} entries ({} fallback placements)",
        messages.len(),
        positioned.len(),
        positioned.iter().filter(|entry| entry.fallback).count()
    );

    let json = serde_json::to_string_pretty(&positioned)?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    if let Some(path) = &args.preview {
        let (min, max) = count_range(&entries).unwrap_or((0, 0));
        let background = preview::parse_background(&config.preview.background)
            .with_context(|| format!("Invalid background {:?}", config.preview.background))?;
        let image = preview::draw_layout(
            &positioned,
            min,
            max,
            config.preview.width,
            config.preview.height,
            background,
        );
        preview::save_preview(&image, path)
            .with_context(|| format!("Failed to save preview to {}", path.display()))?;
        info!("Preview saved to {}", path.display());
    }

    Ok(())
}
