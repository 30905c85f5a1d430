//! adminkit - command-line front end for the dashboard access-control core

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::commands::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let outcome = commands::run(&cli)?;
    println!("{}", outcome.output.trim_end());

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
