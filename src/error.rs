// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for heraldbot

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for heraldbot
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown stage '{0}'")]
    UnknownStage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord API error: {operation} returned {status}: {body}")]
    Api {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Actions context error: {0}")]
    Context(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
