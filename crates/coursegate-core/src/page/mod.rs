//! Page surface.
//!
//! The components never touch a concrete document. They talk to the page
//! through the narrow traits below, one per concern, and [`Page`] is the
//! in-memory implementation used by the CLI and the tests.

mod state;

pub use state::{
    FlashMessage, NavControl, Page, PageState, PartView, ProgressIndicator, QuizAction,
    RetryButton, ViewPane, ATTR_PART_ID, ATTR_WINDOW_CLOSED_TIME,
};

/// Display surface for unlock countdowns.
pub trait CountdownView: Send + Sync {
    /// Write `text` into the display target `countdown-<part_id>`, if present.
    fn render_countdown(&self, part_id: &str, text: &str);

    /// Enable the element and replace its label.
    fn unlock(&self, element_id: &str, label: &str);
}

/// Progress and content panes of a course page.
pub trait CourseView: Send + Sync {
    /// Mark the progress indicator complete, show the tick, update the
    /// tooltip and enable the quiz action. Returns false when the part has
    /// no complete progress affordance set, in which case nothing changes.
    fn mark_progress_complete(&self, part_id: &str) -> bool;

    fn hide_content(&self, part_id: &str);

    /// Reveal `contentquiz-<part_id>`. Returns false when there is no quiz view.
    fn reveal_quiz(&self, part_id: &str) -> bool;

    fn scroll_into_view(&self, target: &str);

    /// Deactivate every navigation control, then activate the one pointing
    /// at `target`. No-op when no control points at `target`.
    fn activate_nav(&self, target: &str);
}

/// Browser location.
pub trait Navigator: Send + Sync {
    /// Path component of the current location.
    fn current_path(&self) -> String;

    /// Full-page navigation.
    fn navigate(&self, url: &str);

    fn reload(&self);
}

/// Blocking user-facing notifications.
pub trait UserAlerts: Send + Sync {
    fn alert(&self, message: &str);
}

/// Server-rendered flash messages.
pub trait FlashView: Send + Sync {
    fn has_flash_messages(&self) -> bool;
    fn hide_flash_messages(&self);
}
