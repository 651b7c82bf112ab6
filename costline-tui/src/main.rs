use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use costline_tui::{App, AppError, ledger, paths};
use simplelog::{Config, LevelFilter, WriteLogger};
use tabledom::Terminal;

/// Environment variable overriding the log level.
const LOG_LEVEL_VAR: &str = "COSTLINE_LOG";

fn log_level() -> LevelFilter {
    std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Debug)
}

fn init_logging() {
    let Some(path) = paths::prepare_log_dir() else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            if WriteLogger::init(log_level(), Config::default(), file).is_ok() {
                log::info!("logging to {}", path.display());
            }
        }
        Err(e) => eprintln!("Cannot create log file {}: {e}", path.display()),
    }
}

fn run(ledger_path: Option<PathBuf>) -> Result<(), AppError> {
    let rows = match &ledger_path {
        Some(path) => ledger::load(path)?,
        None => {
            log::info!("no ledger given, using the sample");
            ledger::sample()
        }
    };

    let mut app = App::new(rows);
    let mut terminal = Terminal::new()?;
    app.run(&mut terminal)
}

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args_os().skip(1);
    let ledger_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        eprintln!("Usage: costline-tui [LEDGER.json]");
        return ExitCode::FAILURE;
    }

    match run(ledger_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
