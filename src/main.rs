pub mod app;
pub mod config;
pub mod control;
pub mod event;
pub mod export;
pub mod io;
pub mod logging;
pub mod prediction;
pub mod ranking;
pub mod sequence;
pub mod sequence_stylizing;
pub mod tui;
pub mod ui;

use anyhow::{bail, Context, Result};
use app::App;
use clap::{Args, Parser, Subcommand};
use config::{ViewerArgs, ViewerConfig};
use control::handle_input;
use event::EventHandler;
use logging::{init_logging, LogTarget};
use prediction::ResultSet;
use ratatui::prelude::{CrosstermBackend, Terminal};
use shadow_rs::shadow;
use std::path::PathBuf;
use tui::Tui;

shadow!(build);

/// Milliseconds between UI ticks
const TICK_RATE: u64 = 250;

#[derive(Debug, Parser)]
#[command(
    version,
    long_version = build::CLAP_LONG_VERSION,
    about = "Predict protein binding sites and inspect them in the terminal",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Protein sequence to analyse right away (single-letter amino acid codes)
    sequence: Option<String>,

    /// Read the sequence from the first record of a FASTA file (.gz supported)
    #[clap(short, long)]
    fasta: Option<PathBuf>,

    #[command(flatten)]
    viewer: ViewerArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the predictor without the UI and write the ranked table as CSV
    Predict(PredictArgs),
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// Protein sequence (single-letter amino acid codes)
    sequence: Option<String>,

    /// Read the sequence from the first record of a FASTA file (.gz supported)
    #[clap(short, long)]
    fasta: Option<PathBuf>,

    /// Output CSV file, stdout if omitted
    #[clap(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    viewer: ViewerArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Predict(args)) => run_predict(args),
        None => {
            let input = io::sequence_input(cli.sequence.as_deref(), cli.fasta.as_deref())?;
            run_viewer(&cli.viewer, input)
        }
    }
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let config = ViewerConfig::from_args(&args.viewer)?;
    let _logger = init_logging(&config.log_level, LogTarget::Stderr)?;
    log::debug!("{}", config.describe());

    let Some(input) = io::sequence_input(args.sequence.as_deref(), args.fasta.as_deref())? else {
        bail!("No input: give a sequence or --fasta");
    };
    let mut predictor = config.build_predictor()?;
    let result = ResultSet::submit(&input, predictor.as_mut())
        .map_err(|err| anyhow::anyhow!("{err} ({})", err.detail()))?;

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create `{}`", path.display()))?;
            export::write_csv(&result, file)?;
            log::info!(
                "wrote {} predictions to {}",
                result.annotations().len(),
                path.display()
            );
        }
        None => export::write_csv(&result, std::io::stdout().lock())?,
    }
    Ok(())
}

fn run_viewer(args: &ViewerArgs, input: Option<String>) -> Result<()> {
    let config = ViewerConfig::from_args(args)?;
    // stderr belongs to the terminal UI
    let _logger = init_logging(&config.log_level, LogTarget::Directory(&config.log_dir))?;
    log::info!("{}", config.describe());

    // Initialize App
    let mut app = App::new(config)?;
    if let Some(input) = input {
        app.set_input(&input);
        app.submit();
    }

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(TICK_RATE);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    // Start the main loop.
    while !app.quit {
        tui.draw(&mut app)?;
        let update = handle_input(&app, tui.events.next()?);
        app.apply(update);
    }

    tui.exit()?;
    log::info!("exiting");
    Ok(())
}
