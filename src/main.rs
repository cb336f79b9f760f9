// SPDX-License-Identifier: PMPL-1.0-or-later

//! heraldbot CLI — one-shot pipeline stage notifier entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use heraldbot::actions::{self, RunContext};
use heraldbot::config::Config;
use heraldbot::discord::DiscordClient;
use heraldbot::notify::{self, StageNotice};

/// heraldbot: CI Pipeline Stage Herald
///
/// Posts and updates pipeline stage notices in a Discord channel, threading
/// successive stage updates under one top-level status message. Inputs
/// arrive through the GitHub Actions environment; the created message and
/// thread IDs are echoed back as job outputs on the start path.
#[derive(Parser)]
#[command(name = "heraldbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = Config::from_inputs().context("failed to read action configuration")?;
    let context = RunContext::from_env().context("failed to read run context")?;
    let notice = StageNotice::from_inputs().context("failed to read stage inputs")?;

    let client = DiscordClient::new(&config);

    let created = notify::run(&client, &config, &context, &notice)
        .await
        .context("failed to perform stage notice")?;

    if let Some(thread) = created {
        actions::set_output("DISCORD_MESSAGE_ID", &thread.message_id)
            .context("failed to record message id output")?;
        actions::set_output("DISCORD_THREAD_ID", &thread.thread_id)
            .context("failed to record thread id output")?;
        tracing::info!(
            "created thread {} from message {}",
            thread.thread_id,
            thread.message_id
        );
    }

    Ok(())
}
