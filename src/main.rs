//! todo-board CLI
//!
//! Serves todo lists as HTML pages and a JSON API and manages their files.

use std::process::ExitCode;

use clap::Parser;
use todo_board::cli::Cli;
use todo_board::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Longest `RUST_LOG` value accepted before falling back to the default
const MAX_FILTER_LEN: usize = 4096;

/// Filter used when `RUST_LOG` is unset or unusable
const DEFAULT_FILTER: &str = "warn";

fn log_filter() -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(raw) if !raw.trim().is_empty() && raw.len() <= MAX_FILTER_LEN => {
            EnvFilter::try_new(raw.trim()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::new(DEFAULT_FILTER),
    }
}

fn main() -> ExitCode {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(log_filter())
        .init();

    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    let json = cli.json;

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = emit_error(&command, &err, json);
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
