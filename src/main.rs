use std::path::PathBuf;

use anyhow::Result;
use colored::*;

use matrix_monitor::commands;

fn main() -> Result<()> {
    let matches = commands::build_cli().get_matches();

    let log_file = matches.get_one::<PathBuf>("log-file");
    if let Err(e) = matrix_monitor::init_logging(log_file.map(PathBuf::as_path)) {
        eprintln!("{}", format!("Warning: logging disabled: {}", e).yellow());
    }

    match matches.subcommand() {
        Some(("config", sub_matches)) => {
            commands::config::handle_config(&matches, sub_matches)?;
        }
        Some(("snapshot", _)) => {
            commands::snapshot(&matches)?;
        }
        Some(("run", _)) | None => {
            commands::run(&matches)?;
        }
        Some((other, _)) => {
            println!("Unknown command '{}'.", other);
            println!("Use 'matrix-monitor --help' for more information.");
        }
    }

    Ok(())
}
