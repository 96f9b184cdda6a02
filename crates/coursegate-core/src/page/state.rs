//! In-memory page model.
//!
//! `PageState` is plain serde data so a rendered page can be captured as
//! JSON, driven by the components, and written back. `Page` wraps it in a
//! mutex and implements every page trait.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{CountdownView, CourseView, FlashView, Navigator, UserAlerts};
use crate::completion::ContentKind;
use crate::error::{PageError, Result};

/// Attribute carrying the timestamp at which the previous attempt window closed.
pub const ATTR_WINDOW_CLOSED_TIME: &str = "data-window-closed-time";
/// Attribute carrying the opaque part identifier.
pub const ATTR_PART_ID: &str = "data-part-id";

const PROGRESS_COMPLETE_TOOLTIP: &str = "Progress: 100%";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressIndicator {
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub tick_visible: bool,
    #[serde(default)]
    pub tooltip: String,
}

/// The per-part quiz button (`quiz-<id>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAction {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPane {
    #[serde(default)]
    pub visible: bool,
}

/// Everything the page renders for one course part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartView {
    pub part_id: String,
    #[serde(default)]
    pub progress: Option<ProgressIndicator>,
    #[serde(default)]
    pub quiz_action: Option<QuizAction>,
    #[serde(default)]
    pub content: Option<ViewPane>,
    #[serde(default)]
    pub quiz: Option<ViewPane>,
}

/// Sidebar navigation button; `target` is the id of the pane it opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavControl {
    pub target: String,
    #[serde(default)]
    pub active: bool,
}

/// A retry button as rendered, attributes included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryButton {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub text: String,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

/// Serializable snapshot of a course page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Current location path, e.g. `/fetch_current_part/UK/12/1/`.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub parts: Vec<PartView>,
    #[serde(default)]
    pub nav_controls: Vec<NavControl>,
    #[serde(default)]
    pub retry_buttons: Vec<RetryButton>,
    /// Countdown display targets keyed by element id (`countdown-<partId>`).
    #[serde(default)]
    pub countdown_targets: BTreeMap<String, String>,
    #[serde(default)]
    pub flash_messages: Vec<FlashMessage>,
    /// Blocking notifications shown, oldest first.
    #[serde(default)]
    pub alerts: Vec<String>,
    /// Full-page navigations performed, oldest first.
    #[serde(default)]
    pub navigations: Vec<String>,
    #[serde(default)]
    pub reloads: u32,
    #[serde(default)]
    pub scrolled_to: Option<String>,
}

impl PageState {
    pub fn part(&self, part_id: &str) -> Option<&PartView> {
        self.parts.iter().find(|p| p.part_id == part_id)
    }

    pub fn require_part(&self, part_id: &str) -> Result<&PartView, PageError> {
        self.part(part_id)
            .ok_or_else(|| PageError::UnknownPart(part_id.to_string()))
    }

    fn part_mut(&mut self, part_id: &str) -> Option<&mut PartView> {
        self.parts.iter_mut().find(|p| p.part_id == part_id)
    }

    /// Content kind as implied by the markup: a part without a quiz button
    /// is an introduction. Callers that know the kind should pass it
    /// explicitly instead.
    pub fn content_kind(&self, part_id: &str) -> ContentKind {
        match self.part(part_id) {
            Some(part) if part.quiz_action.is_some() => ContentKind::Part,
            _ => ContentKind::Introduction,
        }
    }

    pub fn active_nav_count(&self) -> usize {
        self.nav_controls.iter().filter(|c| c.active).count()
    }
}

/// Thread-safe page handle implementing every page trait.
#[derive(Debug, Default)]
pub struct Page {
    state: Mutex<PageState>,
}

impl Page {
    pub fn new(state: PageState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Load a page snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let state: PageState = serde_json::from_str(&content)?;
        Ok(Self::new(state))
    }

    /// Write the current snapshot to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CountdownView for Page {
    fn render_countdown(&self, part_id: &str, text: &str) {
        let mut state = self.lock();
        if let Some(target) = state.countdown_targets.get_mut(&format!("countdown-{part_id}")) {
            *target = text.to_string();
        }
    }

    fn unlock(&self, element_id: &str, label: &str) {
        let mut state = self.lock();
        if let Some(button) = state.retry_buttons.iter_mut().find(|b| b.id == element_id) {
            button.disabled = false;
            button.classes.retain(|c| c != "disabled");
            button.label = label.to_string();
        }
    }
}

impl CourseView for Page {
    fn mark_progress_complete(&self, part_id: &str) -> bool {
        let mut state = self.lock();
        let Some(part) = state.part_mut(part_id) else {
            return false;
        };
        let Some(progress) = part.progress.as_mut() else {
            return false;
        };
        progress.complete = true;
        progress.tick_visible = true;
        progress.tooltip = PROGRESS_COMPLETE_TOOLTIP.to_string();
        if let Some(action) = part.quiz_action.as_mut() {
            action.enabled = true;
        }
        true
    }

    fn hide_content(&self, part_id: &str) {
        let mut state = self.lock();
        if let Some(pane) = state.part_mut(part_id).and_then(|p| p.content.as_mut()) {
            pane.visible = false;
        }
    }

    fn reveal_quiz(&self, part_id: &str) -> bool {
        let mut state = self.lock();
        match state.part_mut(part_id).and_then(|p| p.quiz.as_mut()) {
            Some(pane) => {
                pane.visible = true;
                true
            }
            None => false,
        }
    }

    fn scroll_into_view(&self, target: &str) {
        self.lock().scrolled_to = Some(target.to_string());
    }

    fn activate_nav(&self, target: &str) {
        let mut state = self.lock();
        if !state.nav_controls.iter().any(|c| c.target == target) {
            return;
        }
        for control in state.nav_controls.iter_mut() {
            control.active = control.target == target;
        }
    }
}

impl Navigator for Page {
    fn current_path(&self) -> String {
        let state = self.lock();
        let location = state.location.as_str();
        let end = location.find(['?', '#']).unwrap_or(location.len());
        location[..end].to_string()
    }

    fn navigate(&self, url: &str) {
        let mut state = self.lock();
        state.navigations.push(url.to_string());
        state.location = url.to_string();
    }

    fn reload(&self) {
        self.lock().reloads += 1;
    }
}

impl UserAlerts for Page {
    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}

impl FlashView for Page {
    fn has_flash_messages(&self) -> bool {
        !self.lock().flash_messages.is_empty()
    }

    fn hide_flash_messages(&self) {
        for message in self.lock().flash_messages.iter_mut() {
            message.visible = false;
        }
    }
}
