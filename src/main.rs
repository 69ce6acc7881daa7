use std::{
    fs::OpenOptions,
    path::PathBuf,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, Result};
use clap::Parser;
use console::style;
use fondant::{
    cli::{Cli, Commands},
    constants::{COMPLETE_EMOJI, ERROR_EMOJI},
    preview::{process_preview, PreviewArgs},
    show::{process_show, ShowArgs},
    validate::{process_validate, ValidateArgs},
};
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{self, filter::LevelFilter, prelude::*, EnvFilter};

fn setup_logging(level: Option<EnvFilter>) -> Result<()> {
    let log_path = PathBuf::from("fondant.log");

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(&log_path)?;

    // Prioritize user-provided level, otherwise read from RUST_LOG env var
    // for log level, fall back to "info" if not set.
    let env_filter = if let Some(filter) = level {
        filter
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let formatting_layer = BunyanFormattingLayer::new("fondant".into(), file);
    let level_filter = LevelFilter::from_str(&env_filter.to_string())?;

    let subscriber = tracing_subscriber::registry()
        .with(formatting_layer.with_filter(level_filter))
        .with(JsonStorageLayer);

    set_global_default(subscriber).expect("Failed to set global default subscriber");

    Ok(())
}

#[tokio::main(worker_threads = 4)]
async fn main() {
    match run().await {
        Ok(()) => {
            println!(
                "\n{}{}",
                COMPLETE_EMOJI,
                style("Command successful.").green().bold().dim()
            );
        }
        Err(err) => {
            println!(
                "\n{}{} {}",
                ERROR_EMOJI,
                style("Error running command (re-run needed):").red(),
                err,
            );
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    solana_logger::setup_with_default("solana=off");

    let cli = Cli::parse();

    if let Some(user_filter) = cli.log_level {
        let filter = match EnvFilter::from_str(&user_filter) {
            Ok(filter) => filter,
            Err(_) => {
                return Err(anyhow!(
                    "Invalid log level: {:?}.\n Valid levels are: trace, debug, info, warn, error.",
                    user_filter
                ))
            }
        };
        setup_logging(Some(filter))?;
    } else {
        setup_logging(None)?;
    }

    tracing::info!("Rolling out the fondant.");

    let interrupted = Arc::new(AtomicBool::new(true));
    let ctrl_handler = interrupted.clone();

    ctrlc::set_handler(move || {
        if ctrl_handler.load(Ordering::SeqCst) {
            println!(
                "\n\n{}{} Operation aborted.",
                ERROR_EMOJI,
                style("Error running command (re-run needed):").red(),
            );
            std::process::exit(1);
        }
        ctrl_handler.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    match cli.command {
        Commands::Validate {
            config,
            keypair,
            rpc_url,
            check_on_chain,
        } => process_validate(ValidateArgs {
            config,
            keypair,
            rpc_url,
            check_on_chain,
        })?,
        Commands::Show { config } => process_show(ShowArgs { config })?,
        Commands::Preview {
            config,
            label,
            wallet,
            quantity,
            context,
            allowlist,
            keypair,
            rpc_url,
            fetch_balance,
        } => process_preview(PreviewArgs {
            config,
            label,
            wallet,
            quantity,
            context,
            allowlist,
            keypair,
            rpc_url,
            fetch_balance,
        })?,
    }

    Ok(())
}
