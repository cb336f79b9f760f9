// SPDX-License-Identifier: PMPL-1.0-or-later

//! Discord REST API client module
//!
//! A thin typed wrapper over the three message endpoints heraldbot needs:
//! sending a message, starting a thread from a message, and editing a
//! message. Posting into a thread reuses the send endpoint because a thread
//! ID is usable wherever a channel ID is.
//!
//! # Security considerations
//!
//! - The bot token is passed only to the `Authorization` header. It is never
//!   logged, serialized, or included in error messages.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};

/// Discord REST API client
pub struct DiscordClient {
    client: Client,
    base_url: String,
    token: String,
}

impl DiscordClient {
    /// Create a new Discord client
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.clone(),
            token: config.bot_token.clone(),
        }
    }

    /// Send a message into a channel or thread, returning the created message.
    pub async fn send_message(&self, channel_id: &str, payload: &MessageSend) -> Result<Message> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(payload)
            .send()
            .await?;

        parse_response("send message", response).await
    }

    /// Start a thread anchored to an existing message.
    pub async fn start_thread(
        &self,
        channel_id: &str,
        message_id: &str,
        payload: &ThreadStart,
    ) -> Result<ThreadChannel> {
        let url = format!(
            "{}/channels/{}/messages/{}/threads",
            self.base_url, channel_id, message_id
        );
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(payload)
            .send()
            .await?;

        parse_response("start thread", response).await
    }

    /// Replace the embeds of an existing message.
    pub async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        payload: &MessageEdit,
    ) -> Result<Message> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, channel_id, message_id
        );
        let response = self
            .client
            .patch(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(payload)
            .send()
            .await?;

        parse_response("edit message", response).await
    }
}

/// Surface any non-success status as a fatal error carrying the failing
/// operation, status, and response body.
async fn parse_response<T: DeserializeOwned>(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            operation,
            status,
            body,
        });
    }

    Ok(response.json().await?)
}

/// Payload for creating a message.
#[derive(Debug, Serialize)]
pub struct MessageSend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

/// Payload for editing a message's embeds.
#[derive(Debug, Serialize)]
pub struct MessageEdit {
    pub embeds: Vec<Embed>,
}

/// Payload for starting a thread from a message.
#[derive(Debug, Serialize)]
pub struct ThreadStart {
    pub name: String,
    /// Minutes of inactivity before Discord archives the thread.
    pub auto_archive_duration: u32,
}

/// A structured message block: author link, checklist fields, color.
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Message object from the Discord API. Only the fields heraldbot consumes
/// are deserialized.
#[derive(Debug, Deserialize)]
pub struct Message {
    pub id: String,
}

/// Thread channel object returned when a thread is started.
#[derive(Debug, Deserialize)]
pub struct ThreadChannel {
    pub id: String,
    pub name: String,
}
