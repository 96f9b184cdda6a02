//! Per-element unlock timer.
//!
//! A pure state machine: the caller passes `now` to
//! [`CountdownTimer::tick`] and acts on the outcome.
//!
//! ```text
//! Ticking -> Elapsed
//! ```
//!
//! `Elapsed` is terminal. Once reached, every further tick is a no-op.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::PageError;
use crate::page::{PageState, RetryButton, ATTR_PART_ID, ATTR_WINDOW_CLOSED_TIME};

/// Retry window after a closed attempt, in seconds.
pub const UNLOCK_DELAY_SECS: i64 = 5 * 60;

/// Largest accepted unlock window, in seconds (one week).
pub const MAX_UNLOCK_DELAY_SECS: u64 = 7 * 24 * 60 * 60;

/// Label an unlocked retry button gets.
pub const READY_LABEL: &str = "Last attempt";

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_SECOND: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Ticking,
    Elapsed,
}

/// A retry control waiting for its unlock window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockableElement {
    pub element_id: String,
    pub part_id: String,
    pub closed_at: DateTime<Utc>,
}

impl UnlockableElement {
    /// `None` when the unlock time falls outside the representable range.
    pub fn unlock_at(&self, delay: Duration) -> Option<DateTime<Utc>> {
        self.closed_at.checked_add_signed(delay)
    }

    /// Read the unlock attributes off one retry button.
    ///
    /// `Ok(None)` when an attribute is missing or the closed-time is empty.
    pub fn from_button(button: &RetryButton) -> Result<Option<Self>, PageError> {
        let (Some(raw_closed), Some(part_id)) = (
            button.attributes.get(ATTR_WINDOW_CLOSED_TIME),
            button.attributes.get(ATTR_PART_ID),
        ) else {
            return Ok(None);
        };

        if raw_closed.trim().is_empty() {
            return Ok(None);
        }

        let closed_at =
            parse_closed_time(raw_closed).ok_or_else(|| PageError::InvalidAttribute {
                attribute: ATTR_WINDOW_CLOSED_TIME.to_string(),
                value: raw_closed.clone(),
            })?;

        Ok(Some(Self {
            element_id: button.id.clone(),
            part_id: part_id.clone(),
            closed_at,
        }))
    }

    /// Collect every retry button that carries both attributes.
    ///
    /// Buttons without a closed-time are skipped silently. Buttons whose
    /// closed-time does not parse are skipped with a warning and therefore
    /// stay locked.
    pub fn discover(page: &PageState) -> Vec<UnlockableElement> {
        page.retry_buttons
            .iter()
            .filter_map(|button| match Self::from_button(button) {
                Ok(Some(element)) => Some(element),
                Ok(None) => {
                    debug!(element = %button.id, "no window closed time, skipping");
                    None
                }
                Err(e) => {
                    warn!(element = %button.id, "leaving locked: {e}");
                    None
                }
            })
            .collect()
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_closed_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Remaining lock time split into whole units (floor division).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl RemainingTime {
    pub fn from_millis(ms: i64) -> Self {
        let ms = ms.max(0);
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn total_millis(&self) -> i64 {
        self.hours * MS_PER_HOUR + self.minutes * MS_PER_MINUTE + self.seconds * MS_PER_SECOND
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still locked; show this.
    Render(RemainingTime),
    /// The window just opened; enable the element.
    Unlocked,
    /// Already elapsed on an earlier tick.
    Idle,
}

#[derive(Debug, Clone)]
pub struct CountdownTimer {
    element: UnlockableElement,
    unlock_at: DateTime<Utc>,
    state: TimerState,
}

impl CountdownTimer {
    /// `None` when the element's unlock time cannot be computed.
    pub fn new(element: UnlockableElement, delay: Duration) -> Option<Self> {
        let unlock_at = element.unlock_at(delay)?;
        Some(Self {
            element,
            unlock_at,
            state: TimerState::Ticking,
        })
    }

    pub fn element(&self) -> &UnlockableElement {
        &self.element
    }

    pub fn unlock_at(&self) -> DateTime<Utc> {
        self.unlock_at
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state == TimerState::Elapsed {
            return TickOutcome::Idle;
        }
        let remaining_ms = (self.unlock_at - now).num_milliseconds();
        if remaining_ms <= 0 {
            self.state = TimerState::Elapsed;
            TickOutcome::Unlocked
        } else {
            TickOutcome::Render(RemainingTime::from_millis(remaining_ms))
        }
    }
}
