//! Replay a recorded canvas session headlessly.

use clap::Parser;
use funnelboard_app::{
    ReplayError, ReplayReport, ShortcutRegistry, load_config, replay_file, write_report,
};
use funnelboard_core::{Canvas, CanvasConfig, FunnelDocument};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "funnelboard-replay",
    about = "Replay a Funnelboard canvas session"
)]
struct Args {
    /// Session script (JSON array of events)
    #[arg(short, long, required_unless_present = "list_shortcuts")]
    script: Option<PathBuf>,

    /// Canvas config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting document (JSON)
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// Where to write the final report; printed to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for drop jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Print keyboard shortcuts and exit
    #[arg(long)]
    list_shortcuts: bool,
}

fn run(args: Args) -> Result<(), ReplayError> {
    if args.list_shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CanvasConfig::default(),
    };

    let document = match &args.document {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
                path: path.clone(),
                source,
            })?;
            FunnelDocument::from_json(&json).map_err(|source| ReplayError::Document {
                path: path.clone(),
                source,
            })?
        }
        None => FunnelDocument::new(),
    };

    let mut canvas = Canvas::with_document(document, config);
    if let Some(seed) = args.seed {
        canvas.set_placement_seed(seed);
    }

    let Some(script) = &args.script else {
        return Ok(());
    };
    let stats = replay_file(&mut canvas, script)?;
    let report = ReplayReport::new(&canvas, stats);

    match &args.output {
        Some(path) => {
            write_report(&report, path)?;
            log::info!("Wrote report to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
