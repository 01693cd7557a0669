// src/main.rs

mod catalog;
mod cli;
mod config;
mod errors;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::Config;
use errors::ShowroomError;
use tui::{run_tui, tracing_layer::TuiLogCollectorLayer, UILogEntry};

// RUST_LOG wins over everything else, then the given directive.
fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Installs the global subscriber.
///
/// In TUI mode events go to the in-app Logs view instead of stderr, which the
/// alternate screen would garble. The returned guard flushes the log file on drop.
fn init_tracing(
    directive: &str,
    config: &Config,
    tui_sender: Option<mpsc::UnboundedSender<UILogEntry>>,
) -> Result<Option<WorkerGuard>> {
    let stderr_layer = match tui_sender {
        Some(_) => None,
        None => Some(fmt::layer().with_writer(std::io::stderr).with_target(false)),
    };
    let tui_layer = tui_sender.map(TuiLogCollectorLayer::new);

    let (file_layer, guard) = if config.logging.to_file {
        let log_dir = config.logging.resolved_log_dir();
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
        let appender = tracing_appender::rolling::daily(&log_dir, "showroom.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(directive))
        .with(stderr_layer)
        .with(tui_layer)
        .with(file_layer)
        .try_init()
        .context("Setting default tracing subscriber failed")?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = Cli::parse();
    let cli_directive = cli_args.log_level.map(|level| level.as_directive());

    // Config loading happens before the real subscriber exists, so its
    // messages go to a short-lived stderr subscriber.
    let bootstrap = fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter(cli_directive.unwrap_or("warn")))
        .finish();
    let loaded = tracing::subscriber::with_default(bootstrap, || Config::load(cli_args.config.as_deref()));
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli_args.config.is_some() {
                return Err(e);
            }
            eprintln!("Proceeding with default configuration due to error: {:#}", e);
            Config::default()
        }
    };

    let directive = cli_directive.unwrap_or(config.logging.level.as_str()).to_string();
    let (log_sender, log_receiver) = mpsc::unbounded_channel();
    let tui_mode = cli_args.command.is_none();
    let _log_guard = init_tracing(&directive, &config, tui_mode.then_some(log_sender))?;

    info!("Starting showroom");
    debug!("Loaded app config: {:?}", config);

    let catalog_path = config
        .resolve_catalog_path(cli_args.catalog.as_deref())
        .ok_or(ShowroomError::NoCatalog)?;
    let items = catalog::load_catalog(&catalog_path)?;

    let context = cli::resolve_view_context(
        cli_args.brand.as_deref(),
        cli_args.used,
        config.catalog.default_view,
    )?;
    debug!("View context: {:?}", context);
    let mut engine = catalog::FilterEngine::new(items, context);

    match cli_args.command {
        Some(command) => {
            cli::handle_command(command, &mut engine, &config)?;
        }
        None => {
            info!("No subcommand provided, launching TUI");
            run_tui(Arc::new(config), engine, catalog_path, log_receiver).await?;
        }
    }

    info!("showroom shutting down");
    Ok(())
}
