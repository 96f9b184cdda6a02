//! Core error types for coursegate-core.
//!
//! This module defines the error hierarchy using thiserror. Every failure
//! that reaches the UI boundary is eventually rendered as a single
//! user-facing message via [`CompletionError::user_message`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for coursegate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Part completion request errors
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Page model errors
    #[error("Page error: {0}")]
    Page(#[from] PageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from the "mark part complete" round trip.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The request never produced a response (DNS, connect, body decode...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status. `message` is the server's JSON `message`
    /// when the body parsed, otherwise synthesized from the status line.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered `{"success": false}`.
    #[error("Rejected: {message}")]
    Rejected { message: String },

    /// The endpoint URL could not be built.
    #[error("Invalid endpoint URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl CompletionError {
    /// Text shown in the blocking notification for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CompletionError::Transport(_) | CompletionError::InvalidUrl { .. } => {
                "An error occurred while updating status. Please try again.".to_string()
            }
            CompletionError::Http { message, .. } | CompletionError::Rejected { message } => {
                format!("Failed to update status: {message}")
            }
        }
    }
}

/// Page model errors.
#[derive(Error, Debug)]
pub enum PageError {
    /// No part with this identifier exists on the page
    #[error("Unknown part: {0}")]
    UnknownPart(String),

    /// An attribute is present but its value cannot be used
    #[error("Invalid value for attribute '{attribute}': {value}")]
    InvalidAttribute { attribute: String, value: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
