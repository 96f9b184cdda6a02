//! Countdown driver.
//!
//! Spawns one tokio task per [`UnlockableElement`]. Each task ticks once
//! immediately and then on a fixed interval, renders the remaining time,
//! and exits on the first tick where the window has opened. Every task
//! also listens on a shared [`CancellationToken`] so a long-lived host can
//! dispose of timers explicitly.

use chrono::Duration;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::timer::{
    CountdownTimer, TickOutcome, TimerState, UnlockableElement, READY_LABEL, UNLOCK_DELAY_SECS,
};
use crate::clock::Clock;
use crate::error::ConfigError;
use crate::page::CountdownView;
use crate::storage::CountdownConfig;

#[derive(Debug, Clone)]
pub struct CountdownSettings {
    pub unlock_delay: Duration,
    pub tick_interval: std::time::Duration,
    pub ready_label: String,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            unlock_delay: Duration::seconds(UNLOCK_DELAY_SECS),
            tick_interval: std::time::Duration::from_secs(1),
            ready_label: READY_LABEL.to_string(),
        }
    }
}

impl TryFrom<&CountdownConfig> for CountdownSettings {
    type Error = ConfigError;

    fn try_from(config: &CountdownConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            unlock_delay: config.unlock_delay()?,
            tick_interval: std::time::Duration::from_millis(config.tick_interval_ms.max(1)),
            ready_label: config.ready_label.clone(),
        })
    }
}

pub struct CountdownEngine {
    view: Arc<dyn CountdownView>,
    clock: Arc<dyn Clock>,
    settings: CountdownSettings,
}

impl CountdownEngine {
    pub fn new(
        view: Arc<dyn CountdownView>,
        clock: Arc<dyn Clock>,
        settings: CountdownSettings,
    ) -> Self {
        Self {
            view,
            clock,
            settings,
        }
    }

    /// Start one timer per element. Must be called from within a tokio runtime.
    ///
    /// Elements whose unlock time is out of range are skipped and stay locked.
    pub fn start(&self, elements: Vec<UnlockableElement>) -> CountdownHandle {
        let token = CancellationToken::new();
        let tasks = elements
            .into_iter()
            .filter_map(|element| {
                let element_id = element.element_id.clone();
                let Some(timer) = CountdownTimer::new(element, self.settings.unlock_delay) else {
                    warn!(element = %element_id, "unlock time out of range, leaving locked");
                    return None;
                };
                debug!(
                    element = %element_id,
                    unlock_at = %timer.unlock_at(),
                    "starting countdown"
                );
                let task = tokio::spawn(run_timer(
                    timer,
                    self.settings.clone(),
                    Arc::clone(&self.clock),
                    Arc::clone(&self.view),
                    token.child_token(),
                ));
                Some((element_id, task))
            })
            .collect();
        CountdownHandle { token, tasks }
    }
}

async fn run_timer(
    mut timer: CountdownTimer,
    settings: CountdownSettings,
    clock: Arc<dyn Clock>,
    view: Arc<dyn CountdownView>,
    token: CancellationToken,
) -> TimerState {
    let mut ticker = tokio::time::interval(settings.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(element = %timer.element().element_id, "countdown cancelled");
                return timer.state();
            }
            _ = ticker.tick() => {}
        }

        match timer.tick(clock.now()) {
            TickOutcome::Render(remaining) => {
                view.render_countdown(&timer.element().part_id, &remaining.to_string());
            }
            TickOutcome::Unlocked => {
                view.unlock(&timer.element().element_id, &settings.ready_label);
                info!(
                    element = %timer.element().element_id,
                    part = %timer.element().part_id,
                    "retry window open"
                );
                return TimerState::Elapsed;
            }
            TickOutcome::Idle => return TimerState::Elapsed,
        }
    }
}

/// Running timers. Dropping the handle leaves the timers running.
pub struct CountdownHandle {
    token: CancellationToken,
    tasks: Vec<(String, JoinHandle<TimerState>)>,
}

impl CountdownHandle {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Stop every timer that has not elapsed yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token that cancels every timer of this handle, for use after `join`
    /// has taken ownership.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for every timer and report its final state, keyed by element id.
    pub async fn join(self) -> Vec<(String, TimerState)> {
        let mut results = Vec::with_capacity(self.tasks.len());
        for (element_id, task) in self.tasks {
            match task.await {
                Ok(state) => results.push((element_id, state)),
                Err(e) => {
                    warn!(element = %element_id, "countdown task failed: {e}");
                    results.push((element_id, TimerState::Ticking));
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::countdown::MAX_UNLOCK_DELAY_SECS;
    use crate::page::{Page, PageState, RetryButton, ATTR_PART_ID, ATTR_WINDOW_CLOSED_TIME};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn closed_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    fn page_with_buttons(part_ids: &[&str]) -> PageState {
        let mut state = PageState::default();
        for part_id in part_ids {
            let mut attributes = BTreeMap::new();
            attributes.insert(
                ATTR_WINDOW_CLOSED_TIME.to_string(),
                "2025-03-01T10:00:00+00:00".to_string(),
            );
            attributes.insert(ATTR_PART_ID.to_string(), part_id.to_string());
            state.retry_buttons.push(RetryButton {
                id: format!("retry-{part_id}"),
                attributes,
                disabled: true,
                classes: vec!["btn".to_string(), "disabled".to_string()],
                label: "Locked".to_string(),
            });
            state
                .countdown_targets
                .insert(format!("countdown-{part_id}"), String::new());
        }
        state
    }

    fn engine(page: &Arc<Page>, clock: &Arc<ManualClock>) -> CountdownEngine {
        CountdownEngine::new(page.clone(), clock.clone(), CountdownSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_elapsed_unlocks_on_first_tick() {
        let page = Arc::new(Page::new(page_with_buttons(&["1"])));
        let clock = Arc::new(ManualClock::new(closed_at() + Duration::minutes(10)));

        let elements = UnlockableElement::discover(&page.snapshot());
        let results = engine(&page, &clock).start(elements).join().await;

        assert_eq!(results, vec![("retry-1".to_string(), TimerState::Elapsed)]);
        let button = &page.snapshot().retry_buttons[0];
        assert!(!button.disabled);
        assert_eq!(button.classes, vec!["btn".to_string()]);
        assert_eq!(button.label, "Last attempt");
        // Display target is never written once the first tick has elapsed.
        assert_eq!(page.snapshot().countdown_targets["countdown-1"], "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_renders_then_unlocks() {
        let page = Arc::new(Page::new(page_with_buttons(&["1"])));
        let clock = Arc::new(ManualClock::new(closed_at() + Duration::seconds(4 * 60 + 58)));

        let elements = UnlockableElement::discover(&page.snapshot());
        let handle = engine(&page, &clock).start(elements);

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        let state = page.snapshot();
        assert_eq!(state.countdown_targets["countdown-1"], "0h 0m 2s");
        assert!(state.retry_buttons[0].disabled);

        clock.advance(Duration::seconds(2));
        let results = handle.join().await;

        assert_eq!(results[0].1, TimerState::Elapsed);
        assert!(!page.snapshot().retry_buttons[0].disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking_timers() {
        let page = Arc::new(Page::new(page_with_buttons(&["1", "2"])));
        let clock = Arc::new(ManualClock::new(closed_at()));

        let elements = UnlockableElement::discover(&page.snapshot());
        let handle = engine(&page, &clock).start(elements);
        assert_eq!(handle.len(), 2);

        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
        handle.cancel();
        let results = handle.join().await;

        assert!(results.iter().all(|(_, state)| *state == TimerState::Ticking));
        let state = page.snapshot();
        assert!(state.retry_buttons.iter().all(|b| b.disabled));
        assert_eq!(state.countdown_targets["countdown-1"], "0h 5m 0s");
        assert_eq!(state.countdown_targets["countdown-2"], "0h 5m 0s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_unlock_time_is_skipped() {
        let page = Arc::new(Page::new(page_with_buttons(&["1"])));
        let clock = Arc::new(ManualClock::new(closed_at()));
        let far_future = UnlockableElement {
            element_id: "retry-2".to_string(),
            part_id: "2".to_string(),
            closed_at: chrono::DateTime::<Utc>::MAX_UTC,
        };

        let mut elements = UnlockableElement::discover(&page.snapshot());
        elements.push(far_future);
        let handle = engine(&page, &clock).start(elements);

        assert_eq!(handle.len(), 1);
        handle.cancel();
        assert_eq!(
            handle.join().await,
            vec![("retry-1".to_string(), TimerState::Ticking)]
        );
    }

    #[test]
    fn test_settings_reject_oversized_unlock_delay() {
        for secs in [u64::MAX, 10_000_000_000_000_000, MAX_UNLOCK_DELAY_SECS + 1] {
            let config = CountdownConfig {
                unlock_delay_secs: secs,
                ..Default::default()
            };
            assert!(matches!(
                CountdownSettings::try_from(&config),
                Err(ConfigError::InvalidValue { .. })
            ));
        }

        let config = CountdownConfig {
            unlock_delay_secs: MAX_UNLOCK_DELAY_SECS,
            ..Default::default()
        };
        let settings = CountdownSettings::try_from(&config).unwrap();
        assert_eq!(settings.unlock_delay, Duration::days(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_elements_no_timers() {
        let page = Arc::new(Page::new(PageState::default()));
        let clock = Arc::new(ManualClock::new(closed_at()));

        let handle = engine(&page, &clock).start(Vec::new());
        assert!(handle.is_empty());
        assert!(handle.join().await.is_empty());
    }
}
