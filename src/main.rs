use anyhow::{Context, Result};
use clap::Parser;
use sentiview::app::{App, AppOptions};
use sentiview::config::{Config, Provider};
use sentiview::pipeline::Pipeline;
use sentiview::resources::{self, AssetLocator};
use sentiview::sentiment::VaderScorer;
use sentiview::{logging, translate, tui};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sentiview")]
#[command(about = "Translate text to English and classify its sentiment", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip translation and score text as typed
    #[arg(long)]
    offline: bool,

    /// Where to write logs (defaults to the local data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = logging::init(cli.log_file.clone());

    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if cli.offline {
        config.translation.provider = Provider::None;
    }

    let translator =
        translate::from_config(&config.translation).context("Failed to set up translator")?;
    let (pipeline, messages) = Pipeline::new(
        translator,
        Arc::new(VaderScorer::new()),
        config.pipeline.workers,
    );

    let help_icon = resources::load_help_icon(&config.ui, &AssetLocator::from_environment());

    let options = AppOptions {
        tick_rate: config.ui.tick_rate(),
        shutdown_grace: config.pipeline.shutdown_grace(),
    };
    let mut app = App::new(pipeline, messages, options, help_icon);

    tracing::info!(log = ?log_path, "starting sentiview");
    tui::install_panic_hook();
    let mut terminal = tui::init().context("Failed to initialize terminal")?;

    let result = app.run(&mut terminal);

    tui::restore().context("Failed to restore terminal")?;
    terminal.show_cursor()?;
    app.shutdown().await;

    result
}
