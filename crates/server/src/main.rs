// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stepflow-server: loads the interview config and encryption key named by
//! the environment (spec §6) and serves `POST /update` over HTTP.

use std::process::ExitCode;
use std::sync::Arc;
use stepflow_adapters::{CompositeDispatcher, HookTimeouts, InlineRegistry};
use stepflow_core::SystemClock;
use stepflow_server::{env, router, AppState};
use stepflow_storage::TokenKey;

fn main() -> ExitCode {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("stepflow-server {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("usage: stepflow-server [--help | --version]");
                return ExitCode::FAILURE;
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("stepflow-server {}", env!("CARGO_PKG_VERSION"));
    println!("Serves the interview engine's POST /update endpoint over HTTP.");
    println!();
    println!("Configured entirely through the environment (spec §6):");
    println!("    STEPFLOW_CONFIG_FILE           path to the interviews YAML (required)");
    println!("    STEPFLOW_ENCRYPTION_KEY_FILE   path to a base64 32-byte state-token key (required)");
    println!("    STEPFLOW_ROOT_PATH             path prefix used to build update_url (default: \"\")");
    println!("    STEPFLOW_BIND_ADDR             host:port to listen on (default: 0.0.0.0:8080)");
}

#[tokio::main(flavor = "multi_thread")]
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::config_file().ok_or("STEPFLOW_CONFIG_FILE is not set")?;
    let key_path = env::encryption_key_file().ok_or("STEPFLOW_ENCRYPTION_KEY_FILE is not set")?;

    let config = stepflow_config::load_config(&config_path)?;
    let key = TokenKey::from_file(&key_path)?;

    tracing::info!(
        interviews = config.interviews.len(),
        path = %config_path.display(),
        "loaded interview config"
    );

    let state = AppState {
        config: Arc::new(config),
        key,
        dispatcher: Arc::new(CompositeDispatcher::new(
            InlineRegistry::new(),
            HookTimeouts::default(),
        )),
        clock: Arc::new(SystemClock),
        root_path: env::root_path(),
        scheme: std::env::var("STEPFLOW_SCHEME").unwrap_or_else(|_| "https".to_string()),
    };

    let bind_addr = env::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "stepflow-server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
