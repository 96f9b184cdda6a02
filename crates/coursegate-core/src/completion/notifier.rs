//! Applies a completion round trip to the page.
//!
//! ```text
//! POST ──ok──> progress affordances ──Part──────────> hide content, reveal quiz
//!   │                               └─Introduction──> navigate to part (or reload)
//!   └─err──> blocking alert, page untouched
//! ```

use std::sync::Arc;
use tracing::{info, warn};

use super::{CompletionClient, ContentKind};
use crate::navigation::{fetch_current_part_url, ContentView, CourseNameResolver};
use crate::page::{CourseView, Navigator, UserAlerts};

/// What the page ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Content hidden and the quiz view revealed.
    QuizRevealed,
    /// Content hidden; the part has no quiz view to reveal.
    ContentHidden,
    /// Introduction part re-navigated to this URL.
    Navigated(String),
    /// Introduction part whose course name could not be resolved.
    Reloaded,
    /// Request failed; the alert text shown.
    Failed(String),
}

pub struct PartCompletionNotifier {
    client: CompletionClient,
    view: Arc<dyn CourseView>,
    navigator: Arc<dyn Navigator>,
    alerts: Arc<dyn UserAlerts>,
    course_name: Option<String>,
    csrf_token: Option<String>,
}

impl PartCompletionNotifier {
    pub fn new(
        client: CompletionClient,
        view: Arc<dyn CourseView>,
        navigator: Arc<dyn Navigator>,
        alerts: Arc<dyn UserAlerts>,
    ) -> Self {
        Self {
            client,
            view,
            navigator,
            alerts,
            course_name: None,
            csrf_token: None,
        }
    }

    /// Wire every concern to one page object.
    pub fn for_page<P>(client: CompletionClient, page: Arc<P>) -> Self
    where
        P: CourseView + Navigator + UserAlerts + 'static,
    {
        Self::new(client, page.clone(), page.clone(), page)
    }

    /// Course name tried before parsing it out of the current path.
    pub fn with_course_name(mut self, course_name: Option<String>) -> Self {
        self.course_name = course_name;
        self
    }

    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }

    pub async fn complete(&self, part_id: &str, kind: ContentKind) -> CompletionOutcome {
        let current_path = self.navigator.current_path();

        if let Err(e) = self
            .client
            .mark_complete(&current_path, part_id, self.csrf_token.as_deref())
            .await
        {
            warn!(part = %part_id, "completion failed: {e}");
            let message = e.user_message();
            self.alerts.alert(&message);
            return CompletionOutcome::Failed(message);
        }

        info!(part = %part_id, ?kind, "part marked complete");
        if !self.view.mark_progress_complete(part_id) {
            warn!(part = %part_id, "no progress indicator for part");
        }

        match kind {
            ContentKind::Part => self.reveal_quiz(part_id),
            ContentKind::Introduction => self.reload_part(part_id, &current_path),
        }
    }

    fn reveal_quiz(&self, part_id: &str) -> CompletionOutcome {
        self.view.hide_content(part_id);
        if !self.view.reveal_quiz(part_id) {
            return CompletionOutcome::ContentHidden;
        }
        let quiz_target = format!("contentquiz-{part_id}");
        self.view.scroll_into_view(&quiz_target);
        self.view.activate_nav(&quiz_target);
        CompletionOutcome::QuizRevealed
    }

    fn reload_part(&self, part_id: &str, current_path: &str) -> CompletionOutcome {
        let resolver = CourseNameResolver::standard(self.course_name.clone(), current_path);
        match resolver.resolve() {
            Some(course) => {
                let url = fetch_current_part_url(current_path, &course, part_id, ContentView::Part);
                self.navigator.navigate(&url);
                CompletionOutcome::Navigated(url)
            }
            None => {
                warn!(part = %part_id, "course name unknown, reloading page");
                self.navigator.reload();
                CompletionOutcome::Reloaded
            }
        }
    }
}
