//! bgroups CLI - parameter file management for breakout group planning.

use breakout_groups::cli::{Cli, Commands};
use breakout_groups::commands::{self, ConfigLocation, Output};
use breakout_groups::logging;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    logging::init_logging(cli.verbose);

    let result = ConfigLocation::resolve(cli.data_dir, cli.file)
        .and_then(|location| run_command(cli.command, &location, human));

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run_command(
    command: Option<Commands>,
    location: &ConfigLocation,
    human: bool,
) -> Result<(), breakout_groups::Error> {
    match command.unwrap_or(Commands::Params) {
        Commands::Reconcile => output(&commands::reconcile(location)?, human),
        Commands::Show { no_comments } => output(&commands::show(location, no_comments)?, human),
        Commands::Params => output(&commands::params(location)?, human),
        Commands::Path => output(&commands::path(location)?, human),
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
