//! HTTP client for the `update_part_status` endpoint.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{CompletionResponse, CSRF_HEADER};
use crate::error::CompletionError;
use crate::navigation::mount_prefix;
use crate::storage::ServerConfig;

pub struct CompletionClient {
    http: Client,
    base_url: Url,
    url_prefix: Option<String>,
}

impl CompletionClient {
    pub fn new(config: &ServerConfig) -> Result<Self, CompletionError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| CompletionError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            url_prefix: config.update_part_status_url.clone(),
        })
    }

    /// Endpoint URL for `part_id` as seen from a page at `current_path`.
    ///
    /// A configured URL prefix is used verbatim; otherwise the standard
    /// route is built under the detected mount point.
    pub fn endpoint(&self, current_path: &str, part_id: &str) -> Result<Url, CompletionError> {
        let path = match &self.url_prefix {
            Some(prefix) => format!("{prefix}{part_id}/"),
            None => format!("{}/update_part_status/{part_id}/", mount_prefix(current_path)),
        };
        self.base_url
            .join(&path)
            .map_err(|e| CompletionError::InvalidUrl {
                url: path,
                message: e.to_string(),
            })
    }

    /// POST the completion for `part_id`.
    ///
    /// Returns the parsed body only when the server reports `success: true`.
    pub async fn mark_complete(
        &self,
        current_path: &str,
        part_id: &str,
        csrf_token: Option<&str>,
    ) -> Result<CompletionResponse, CompletionError> {
        let url = self.endpoint(current_path, part_id)?;
        debug!(%url, "marking part complete");

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({}));
        match csrf_token {
            Some(token) => request = request.header(CSRF_HEADER, token),
            None => warn!("no csrftoken cookie, sending completion without anti-forgery token"),
        }

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(body) => body
                    .get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Server error: {}", status.as_u16())),
                Err(_) => format!(
                    "Server error: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )
                .trim_end()
                .to_string(),
            };
            return Err(CompletionError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = resp.json().await?;
        if body.success {
            Ok(body)
        } else {
            Err(CompletionError::Rejected {
                message: body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}
