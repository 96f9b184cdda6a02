//! Auto-dismiss for server-rendered flash messages.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::page::FlashView;
use crate::storage::FlashConfig;

pub struct FlashDismisser {
    delay: Duration,
}

impl FlashDismisser {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Hide the page's flash messages after the delay.
    ///
    /// Returns `None` when the page has no flash messages. Must be called
    /// from within a tokio runtime.
    pub fn schedule(&self, view: Arc<dyn FlashView>) -> Option<FlashHandle> {
        if !view.has_flash_messages() {
            return None;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => false,
                _ = tokio::time::sleep(delay) => {
                    view.hide_flash_messages();
                    debug!("flash messages dismissed");
                    true
                }
            }
        });
        Some(FlashHandle { token, task })
    }
}

impl From<&FlashConfig> for FlashDismisser {
    fn from(config: &FlashConfig) -> Self {
        Self::new(Duration::from_secs(config.dismiss_after_secs))
    }
}

pub struct FlashHandle {
    token: CancellationToken,
    task: JoinHandle<bool>,
}

impl FlashHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True when the messages were hidden.
    pub async fn join(self) -> bool {
        self.task.await.unwrap_or(false)
    }
}
