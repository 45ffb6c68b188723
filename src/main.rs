// src/main.rs

use std::process::ExitCode;

use encounterdag::{cli, logging};

fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("encounterdag: {err:#}");
        return ExitCode::FAILURE;
    }

    match encounterdag::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("encounterdag error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
