//! Main application entry point.

use clap::Parser;
use inkboard_app::{ScriptError, Session, load_config};
use inkboard_core::{Canvas, EditorConfig, FileStorage};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "inkboard", about = "Play whiteboard interaction scripts against a headless canvas")]
struct Cli {
    /// Editor config (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for saved boards.
    #[arg(long, env = "INKBOARD_DIR")]
    dir: Option<PathBuf>,

    /// Script to run; stdin when omitted.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting Inkboard");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("inkboard: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ScriptError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EditorConfig::default(),
    };
    let storage = match cli.dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    log::debug!("Boards stored in {}", storage.base_path().display());

    let source = match &cli.script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let mut session = Session::new(Canvas::with_config(config)?, Box::new(storage), io::stdout().lock());
    session.run_script(&source)
}
