//! Refchain CLI Binary
//!
//! Command-line interface for running reference workflows.

use anyhow::Context;
use clap::Parser;
use refchain::logging::init_logging;
use refchain::tooling::cli::{Cli, CliContext};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = CliContext::new(cli.workspace.clone(), cli.config.clone())
        .context("initializing workspace")?;

    let logging = cli.logging_config(&context.config().logging);
    init_logging(Some(&logging), cli.log_file.clone()).context("initializing logging")?;

    let output = context.execute(&cli.command).await?;
    println!("{}", output);
    Ok(())
}
