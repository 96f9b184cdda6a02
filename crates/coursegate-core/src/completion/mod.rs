//! Part completion.
//!
//! [`CompletionClient`] performs the `update_part_status` round trip;
//! [`PartCompletionNotifier`] turns its result into page updates.

mod client;
mod notifier;

pub use client::CompletionClient;
pub use notifier::{CompletionOutcome, PartCompletionNotifier};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the cookie holding the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the token is sent in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// What kind of content a part holds.
///
/// Decides what happens after a successful completion: ordinary parts
/// reveal their quiz in place, introductions reload the part from the
/// server so server-rendered affordances reflect the new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Part,
    Introduction,
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "part" => Ok(ContentKind::Part),
            "intro" | "introduction" => Ok(ContentKind::Introduction),
            other => Err(format!("unknown content kind '{other}' (expected part|introduction)")),
        }
    }
}

/// Body of a completion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Value of the `csrftoken` cookie in a `Cookie` header string.
pub fn csrf_token(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix("csrftoken="))
        .map(str::to_string)
}
