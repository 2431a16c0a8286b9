mod app;
mod config;
mod effects;
mod logging;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gallery_core::Query;
use gallery_engine::{EngineHandle, HttpSearchClient};
use gallery_logging::gallery_info;
use log::LevelFilter;

use self::app::GalleryApp;
use self::effects::EffectRunner;
use self::logging::LogDestination;

/// Browse a photo search index as a paged grid and delete hits by id.
#[derive(Debug, Parser)]
#[command(name = "gallery", version)]
struct Cli {
    /// RON config file; defaults are used when it does not exist.
    #[arg(long, default_value = "gallery.ron")]
    config: PathBuf,
    /// Search term, overriding the configured query term.
    #[arg(long)]
    query: Option<String>,
    /// Where log records go.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,
    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    let config = config::load(&cli.config)?;
    let query = match cli.query {
        Some(term) => Query {
            term,
            ..config.query.clone()
        },
        None => config.query.clone(),
    };

    let client = Arc::new(
        HttpSearchClient::new(config.service.fetch_settings())
            .context("failed to set up search client")?,
    );
    let engine = EngineHandle::new(client.clone(), client).context("failed to start engine")?;
    gallery_info!("Starting gallery for {}", query);

    let stdout = io::stdout();
    let mut app = GalleryApp::new(&config, EffectRunner::new(engine), stdout.lock());
    app.run(io::stdin().lock(), query)
}
