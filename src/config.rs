// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration module for heraldbot
//!
//! # Security considerations
//!
//! - The bot token is read from the action inputs and stored in memory only.
//!   It is never logged, serialized, or included in error messages.

use crate::actions;
use crate::error::Result;

/// Default Discord REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token used for the `Authorization` header.
    pub bot_token: String,

    /// Channel the top-level notification message lives in.
    pub channel: String,

    /// Discord API base URL (overridable for tests via `DISCORD_API_URL`).
    pub api_url: String,
}

impl Config {
    /// Build configuration from the action inputs.
    pub fn from_inputs() -> Result<Self> {
        Ok(Self {
            bot_token: actions::required_input("DISCORD_BOT_TOKEN")?,
            channel: actions::required_input("DISCORD_CHANNEL")?,
            api_url: std::env::var("DISCORD_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}
