// SPDX-License-Identifier: PMPL-1.0-or-later

//! Path selection and the four notification flows.
//!
//! Exactly one flow runs per invocation, chosen purely from which optional
//! inputs were supplied: no thread yet means Start; an existing thread plus
//! an error or cancel input means ReportError or ReportCanceled; an existing
//! thread alone means Update.

use chrono::Utc;
use tracing::info;

use crate::actions::{self, RunContext};
use crate::config::Config;
use crate::discord::{
    DiscordClient, Embed, EmbedAuthor, EmbedField, MessageEdit, MessageSend, ThreadStart,
};
use crate::error::{Error, Result};
use crate::stage::{colors, Stage, FAIL_MARKER};

/// Minutes of inactivity before the notification thread archives (7 days).
const AUTO_ARCHIVE_MINUTES: u32 = 60 * 24 * 7;

/// Identifiers tying an invocation to an existing notification thread.
/// Owned by the workflow across invocations, passed as job outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    pub thread_id: String,
    pub message_id: String,
}

impl ThreadRef {
    /// The two thread inputs must be supplied both-or-neither.
    fn from_pair(thread_id: Option<String>, message_id: Option<String>) -> Result<Option<Self>> {
        match (thread_id, message_id) {
            (Some(thread_id), Some(message_id)) => Ok(Some(Self {
                thread_id,
                message_id,
            })),
            (None, None) => Ok(None),
            _ => Err(Error::InvalidInput(
                "must set both or neither of DISCORD_THREAD_ID and DISCORD_THREAD_MESSAGE_ID"
                    .to_string(),
            )),
        }
    }
}

/// Everything one invocation needs beyond the client itself.
#[derive(Debug, Clone)]
pub struct StageNotice {
    pub stage: Stage,
    pub thread: Option<ThreadRef>,
    pub stage_error: Option<String>,
    pub canceled_message: Option<String>,
    /// Short status text shown in the current checklist field.
    pub status: String,
    /// Long status text posted into the thread.
    pub status_long: String,
    /// Role mention included when reporting an error.
    pub ping_role: Option<String>,
}

impl StageNotice {
    /// Gather the stage inputs from the action environment, failing fast on
    /// an unknown stage or an inconsistent thread-id/message-id pairing.
    pub fn from_inputs() -> Result<Self> {
        Ok(Self {
            stage: actions::required_input("STAGE")?.parse()?,
            thread: ThreadRef::from_pair(
                actions::get_input("DISCORD_THREAD_ID"),
                actions::get_input("DISCORD_THREAD_MESSAGE_ID"),
            )?,
            stage_error: actions::get_input("STAGE_ERROR"),
            canceled_message: actions::get_input("CANCELED_MESSAGE"),
            status: actions::get_input("STAGE_STATUS").unwrap_or_default(),
            status_long: actions::get_input("STAGE_STATUS_LONG").unwrap_or_default(),
            ping_role: actions::get_input("PING_ROLE"),
        })
    }

    /// Select which flow this invocation runs. The error input wins when
    /// both an error and a cancel message are present.
    pub fn flow(&self) -> Flow<'_> {
        match &self.thread {
            None => Flow::Start,
            Some(thread) => {
                if let Some(error) = self.stage_error.as_deref() {
                    Flow::ReportError { thread, error }
                } else if let Some(message) = self.canceled_message.as_deref() {
                    Flow::ReportCanceled { thread, message }
                } else {
                    Flow::Update(thread)
                }
            }
        }
    }
}

/// The four notification flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow<'a> {
    Start,
    Update(&'a ThreadRef),
    ReportError {
        thread: &'a ThreadRef,
        error: &'a str,
    },
    ReportCanceled {
        thread: &'a ThreadRef,
        message: &'a str,
    },
}

/// Run the selected flow. Returns the thread reference the caller should
/// record as job outputs; `None` for flows reusing an existing thread.
pub async fn run(
    client: &DiscordClient,
    config: &Config,
    context: &RunContext,
    notice: &StageNotice,
) -> Result<Option<ThreadRef>> {
    match notice.flow() {
        Flow::Start => Ok(Some(start_thread(client, config, context, notice).await?)),
        Flow::Update(thread) => {
            update_thread(client, config, context, notice, thread).await?;
            Ok(None)
        }
        Flow::ReportError { thread, error } => {
            report_error(client, config, context, notice, thread, error).await?;
            Ok(None)
        }
        Flow::ReportCanceled { thread, message } => {
            report_canceled(client, config, context, notice, thread, message).await?;
            Ok(None)
        }
    }
}

/// Top-level embed summarizing the whole pipeline at the current stage.
fn header_embed(context: &RunContext, notice: &StageNotice, failed: bool) -> Embed {
    let fields = notice
        .stage
        .checklist(&notice.status, failed)
        .into_iter()
        .map(|entry| EmbedField {
            name: entry.label.to_string(),
            value: entry.value,
            inline: true,
        })
        .collect();

    Embed {
        author: Some(EmbedAuthor {
            name: context.embed_title(),
            url: context.run_url(),
        }),
        description: None,
        fields,
        color: if failed { colors::RED } else { notice.stage.color() },
        timestamp: Some(Utc::now().to_rfc3339()),
    }
}

/// Embed posted into the thread for this stage's status text.
fn status_embed(color: u32, description: &str) -> Embed {
    Embed {
        author: None,
        description: Some(description.to_string()),
        fields: Vec::new(),
        color,
        timestamp: None,
    }
}

/// Start flow: send the top message, start the thread from it, post the
/// initial status into the thread.
async fn start_thread(
    client: &DiscordClient,
    config: &Config,
    context: &RunContext,
    notice: &StageNotice,
) -> Result<ThreadRef> {
    info!(
        "starting notification thread for {} in channel {}",
        context.thread_title(),
        config.channel
    );

    let message = client
        .send_message(
            &config.channel,
            &MessageSend {
                content: None,
                embeds: vec![header_embed(context, notice, false)],
            },
        )
        .await?;

    let thread = client
        .start_thread(
            &config.channel,
            &message.id,
            &ThreadStart {
                name: context.thread_title(),
                auto_archive_duration: AUTO_ARCHIVE_MINUTES,
            },
        )
        .await?;

    client
        .send_message(
            &thread.id,
            &MessageSend {
                content: None,
                embeds: vec![status_embed(notice.stage.color(), &notice.status_long)],
            },
        )
        .await?;

    Ok(ThreadRef {
        thread_id: thread.id,
        message_id: message.id,
    })
}

/// Update flow: rewrite the top message for the current stage and post the
/// status into the thread.
async fn update_thread(
    client: &DiscordClient,
    config: &Config,
    context: &RunContext,
    notice: &StageNotice,
    thread: &ThreadRef,
) -> Result<()> {
    info!("updating stage {} in thread {}", notice.stage, thread.thread_id);

    client
        .edit_message(
            &config.channel,
            &thread.message_id,
            &MessageEdit {
                embeds: vec![header_embed(context, notice, false)],
            },
        )
        .await?;

    client
        .send_message(
            &thread.thread_id,
            &MessageSend {
                content: None,
                embeds: vec![status_embed(notice.stage.color(), &notice.status_long)],
            },
        )
        .await?;

    Ok(())
}

/// ReportError flow: flip the top message to the failed state and post the
/// error detail into the thread with a role mention in the raw content, so
/// the ping escapes the embed.
async fn report_error(
    client: &DiscordClient,
    config: &Config,
    context: &RunContext,
    notice: &StageNotice,
    thread: &ThreadRef,
    error: &str,
) -> Result<()> {
    info!("reporting failure of stage {} in thread {}", notice.stage, thread.thread_id);

    let mut header = header_embed(context, notice, true);
    header.description = Some(format!("{FAIL_MARKER} {error} {FAIL_MARKER}"));

    client
        .edit_message(&config.channel, &thread.message_id, &MessageEdit {
            embeds: vec![header],
        })
        .await?;

    client
        .send_message(
            &thread.thread_id,
            &MessageSend {
                content: notice.ping_role.clone(),
                embeds: vec![status_embed(colors::RED, &notice.status_long)],
            },
        )
        .await?;

    Ok(())
}

/// ReportCanceled flow: grey out the top message with the cancel text and
/// post the cancellation note into the thread.
async fn report_canceled(
    client: &DiscordClient,
    config: &Config,
    context: &RunContext,
    notice: &StageNotice,
    thread: &ThreadRef,
    message: &str,
) -> Result<()> {
    info!("reporting cancellation in thread {}", thread.thread_id);

    let mut header = header_embed(context, notice, true);
    header.description = Some(message.to_string());
    header.color = colors::GREY;

    client
        .edit_message(&config.channel, &thread.message_id, &MessageEdit {
            embeds: vec![header],
        })
        .await?;

    client
        .send_message(
            &thread.thread_id,
            &MessageSend {
                content: None,
                embeds: vec![status_embed(colors::GREY, &notice.status_long)],
            },
        )
        .await?;

    Ok(())
}
