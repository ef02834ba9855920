use speclint::cli::run_cli;
use speclint::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = init_logging(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }

    match run_cli() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
