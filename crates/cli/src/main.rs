// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stepflow - dev-loop CLI for interview configurations.
//!
//! Loads an interview YAML config and drives one interview end to end from
//! the terminal, the same `advance`/`recursive_ask` cycle `stepflow-server`
//! runs per request, minus the token/HTTP layer.

mod color;
mod env;
mod error;
mod repl;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use stepflow_core::InterviewId;

#[derive(Parser)]
#[command(name = "stepflow", version, about = "Drive a stepflow interview from a terminal")]
struct Cli {
    /// Interview config file (YAML). Falls back to `STEPFLOW_CONFIG_FILE`.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the interviews defined in the config file
    List,
    /// Drive one interview interactively to completion
    Run {
        /// Interview id, as declared in the config file
        interview: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let matches = Cli::command().styles(color::styles()).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .or_else(env::config_file)
        .ok_or(CliError::NoConfigFile)?;
    let config = stepflow_config::load_config(&config_path)?;

    match cli.command {
        Commands::List => {
            for interview in &config.interviews {
                let title = interview
                    .title
                    .as_ref()
                    .and_then(|t| t.render(&stepflow_core::Value::Map(Default::default())).ok())
                    .unwrap_or_default();
                println!("{}\tv{}\t{}", interview.id, interview.version, title);
            }
            Ok(())
        }
        Commands::Run { interview } => {
            let id = InterviewId::new(interview);
            let interview = config
                .by_id(&id)
                .ok_or_else(|| CliError::UnknownInterview(id.clone()))?;
            repl::run(interview)?;
            Ok(())
        }
    }
}
