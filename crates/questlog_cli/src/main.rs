//! `questlog` command-line entry point.
//!
//! # Responsibility
//! - Parse flags and environment, initialise logging when a log directory is
//!   configured, and dispatch to one handler per command group.
//! - Print errors to stderr and exit with status 1.

mod cli;
mod handlers;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use handlers::Context;
use questlog_core::{init_logging, ServiceError};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ServiceError>() {
                Some(service_err) => eprintln!("Error [{}]: {err:#}", service_err.code()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(cli.effective_log_level(), log_dir)?;
    }

    let mut ctx = Context::open(&cli.db, cli.json)?;
    match cli.command {
        Commands::User(action) => handlers::handle_user(&ctx, action),
        Commands::Campaign(action) => handlers::handle_campaign(&ctx, action),
        Commands::Location(command) => handlers::handle_location(&ctx, command),
        Commands::Organization(command) => handlers::handle_organization(&ctx, command),
        Commands::Character(command) => handlers::handle_character(&ctx, command),
        Commands::Event(command) => handlers::handle_event(&ctx, command),
        Commands::Note(command) => handlers::handle_note(&mut ctx, command),
    }
}
