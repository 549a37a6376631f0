use anyhow::Context;
use cadence_app::commands::{expand, explain};
use cadence_app::{Cli, Commands};
use cadence_core::config::load_config;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if !cli.verbose {
        if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
            if let Err(e) = filter_handle.modify(|current| *current = filter) {
                tracing::warn!(error = %e, "Failed to update log filter from config");
            }
        } else {
            tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
        }
    }

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Expand(args) => expand::run(&mut stdout, args, &config)?,
        Commands::Explain(args) => explain::run(&mut stdout, args)?,
    }

    Ok(())
}
