// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vex - deployment automation CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod presenter;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use color::ColorMode;
use presenter::ConsolePresenter;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vex_core::CachePolicy;
use vex_engine::Orchestrator;

#[derive(Parser)]
#[command(
    name = "vex",
    version,
    about = "Orchestrates software deployments across environments",
    arg_required_else_help = false
)]
struct Cli {
    /// Final step of the plan; every earlier step runs first
    step: Option<String>,

    /// Target environment (defaults to the first one declared)
    environment: Option<String>,

    /// Control color output
    #[arg(long, value_enum, default_value_t = ColorMode::Always)]
    color: ColorMode,

    /// Cache TTL in seconds for the `test` step (0 means always re-run)
    #[arg(long = "cache-ttl", value_name = "SECONDS", default_value_t = 0)]
    cache_ttl: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // help and version displays are not errors
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            };
        }
    };
    color::set_mode(cli.color);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(step) = cli.step.clone() else {
        // no arguments: show help, succeed
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    match run(&cli, &step).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", color::red(&format!("Error: {e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, step: &str) -> Result<()> {
    let project_path = std::env::current_dir()?;
    let environment = cli.environment.clone().unwrap_or_default();

    let cancel = CancellationToken::new();
    let ctrl_c_guard = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_guard.cancel();
        }
    });

    let mut orchestrator = Orchestrator::new(
        project_path,
        CachePolicy::from_secs(cli.cache_ttl),
        Arc::new(ConsolePresenter),
    );
    orchestrator.execute_plan(step, &environment, &cancel).await?;
    Ok(())
}
