//! PESV Sizing - company size classification for vehicular-safety diagnostics
//!
//! A CLI tool that records a company's fleet and driver questionnaire and
//! classifies the company's size from the totals.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use pesv_app::config::Config;
use pesv_app::logging::init_logger;

fn main() {
    let cli = Cli::parse();

    let log_json = cli.log_json || Config::load().map(|c| c.log_json).unwrap_or(false);
    init_logger(cli.verbose, log_json);

    if let Err(e) = commands::execute(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
