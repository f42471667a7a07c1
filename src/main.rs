// src/main.rs
// =============================================================================
// This is the entry point of getignore.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the GitHub client from the options
// 3. Dispatch to the list or get handler
// 4. Exit with a proper code (0 = success, 1 = some files failed, 2 = error)
//
// Ctrl-C cancels whatever requests are still in flight; a `get` that was
// interrupted still writes the files that finished.
//
// Rust concepts used:
// - #[tokio::main]: Turns async main into a runtime entry point
// - Arc: The GitHub client is shared by every concurrent download
// - tokio::spawn: The Ctrl-C watcher runs beside the main task
// =============================================================================

mod cli;
mod config;
mod contents;
mod context;
mod github;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use cli::{Cli, Commands};
use config::{ClientConfig, SourceConfig, TOKEN_ENV_VAR};
use context::Context;
use github::{Getter, HttpApi};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout stays clean for the merged output
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let source = SourceConfig::new(&cli.repo, &cli.branch, &cli.suffix)?;

    let token = cli.token.or_else(|| std::env::var(TOKEN_ENV_VAR).ok());
    let client_config = ClientConfig::default()
        .with_base_url(&cli.api_url)?
        .with_token(token);
    let api = HttpApi::new(client_config).context("failed to create HTTP client")?;
    let getter = Getter::new(Arc::new(api), source);

    let (mut ctx, cancel) = Context::with_cancel();
    if let Some(secs) = cli.timeout {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling outstanding requests");
            cancel.cancel();
        }
    });

    match cli.command {
        Commands::List { json } => handle_list(&getter, &ctx, json).await,
        Commands::Get { names, output } => {
            handle_get(&getter, &ctx, &names, output.as_deref()).await
        }
    }
}

// Handles the 'list' subcommand
async fn handle_list(getter: &Getter, ctx: &Context, json: bool) -> Result<i32> {
    let files = getter.list(ctx).await?;
    info!(count = files.len(), "listed templates");

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        for file in &files {
            println!("{}", file);
        }
    }

    Ok(0)
}

// Handles the 'get' subcommand
//
// Whatever downloaded is written out even when some names failed; the
// combined error for the rest goes to stderr and the exit code is 1.
async fn handle_get(
    getter: &Getter,
    ctx: &Context,
    names: &[String],
    output: Option<&Path>,
) -> Result<i32> {
    let result = getter.get(ctx, names).await?;

    if !result.contents.is_empty() {
        let merged = contents::merge(&result.contents);
        write_output(output, &merged)?;
        info!(
            count = result.contents.len(),
            source = %getter.source().repository,
            "merged templates"
        );
    }

    match result.err {
        Some(err) => {
            warn!(failed = err.failures().len(), "some templates could not be fetched");
            eprint!("{}", err);
            Ok(1)
        }
        None => Ok(0),
    }
}

fn write_output(output: Option<&Path>, merged: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, merged)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{}", merged);
            Ok(())
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a CancelHandle instead of just exiting on Ctrl-C?
//    - Downloads that already finished are kept and written out
//    - Downloads still running end with "download cancelled" in the error
//
// 2. Why `{:#}` when printing errors?
//    - anyhow prints the whole context chain on one line with the alternate
//      format, e.g. "failed to write out: Permission denied"
// -----------------------------------------------------------------------------
