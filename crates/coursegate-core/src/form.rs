//! Quiz form gate.
//!
//! Controls are grouped by their `name`. A group counts as answered when at
//! least one of its radio controls is checked; other control kinds never
//! answer a group. Every call re-evaluates all groups from scratch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::page::UserAlerts;

pub const UNANSWERED_MESSAGE: &str = "Please select an option for all questions before submitting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Radio,
    Checkbox,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputControl {
    /// Group (question) this control belongs to.
    pub name: String,
    pub kind: ControlKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
}

/// A submitted quiz form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizForm {
    #[serde(default)]
    pub controls: Vec<InputControl>,
    /// Groups currently marked as unanswered.
    #[serde(default)]
    pub marked: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GateDecision {
    Allow,
    Blocked { unanswered: Vec<String> },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

impl QuizForm {
    /// Group names in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.controls
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn is_answered(&self, group: &str) -> bool {
        self.controls
            .iter()
            .any(|c| c.name == group && c.kind == ControlKind::Radio && c.checked)
    }

    /// Check the form, update the unanswered marks and alert when blocked.
    pub fn validate(&mut self, alerts: &dyn UserAlerts) -> GateDecision {
        let unanswered: Vec<String> = self
            .groups()
            .into_iter()
            .filter(|group| !self.is_answered(group))
            .map(str::to_string)
            .collect();

        self.marked = unanswered.iter().cloned().collect();
        debug!(groups = self.groups().len(), unanswered = unanswered.len(), "form checked");

        if unanswered.is_empty() {
            GateDecision::Allow
        } else {
            alerts.alert(UNANSWERED_MESSAGE);
            GateDecision::Blocked { unanswered }
        }
    }
}
