//! Integration tests driving a captured course page through every component.

use chrono::{DateTime, Duration, Utc};
use coursegate_core::countdown::{CountdownSettings, UnlockableElement};
use coursegate_core::storage::ServerConfig;
use coursegate_core::{
    fetch_current_part, CompletionClient, CompletionOutcome, ContentView, CountdownEngine,
    ManualClock, Page, PageState, PartCompletionNotifier, TimerState,
};
use std::sync::Arc;

const PAGE_JSON: &str = r#"{
    "location": "/counselor_project/fetch_current_part/UK/12/1/",
    "parts": [
        {
            "part_id": "11",
            "progress": {"complete": false, "tick_visible": false, "tooltip": "Progress: 0%"},
            "content": {"visible": false}
        },
        {
            "part_id": "12",
            "progress": {"complete": false, "tick_visible": false, "tooltip": "Progress: 0%"},
            "quiz_action": {"enabled": false},
            "content": {"visible": true},
            "quiz": {"visible": false}
        }
    ],
    "nav_controls": [
        {"target": "content-11"},
        {"target": "content-12", "active": true},
        {"target": "contentquiz-12"}
    ],
    "retry_buttons": [
        {
            "id": "retry-12",
            "attributes": {
                "data-window-closed-time": "2025-03-01T10:00:00+00:00",
                "data-part-id": "12"
            },
            "disabled": true,
            "classes": ["t-button", "disabled"],
            "label": "Locked"
        },
        {
            "id": "retry-13",
            "attributes": {"data-part-id": "13"},
            "disabled": true,
            "label": "Locked"
        }
    ],
    "countdown_targets": {"countdown-12": "", "countdown-13": ""},
    "flash_messages": [{"text": "Welcome back"}]
}"#;

fn load_page() -> Arc<Page> {
    let state: PageState = serde_json::from_str(PAGE_JSON).unwrap();
    Arc::new(Page::new(state))
}

fn closed_at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-01T10:00:00+00:00")
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test(start_paused = true)]
async fn test_countdown_runs_to_unlock_on_captured_page() {
    let page = load_page();
    let clock = Arc::new(ManualClock::new(closed_at() + Duration::seconds(270)));

    let elements = UnlockableElement::discover(&page.snapshot());
    assert_eq!(elements.len(), 1, "button without closed time must be skipped");

    let engine = CountdownEngine::new(page.clone(), clock.clone(), CountdownSettings::default());
    let handle = engine.start(elements);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(page.snapshot().countdown_targets["countdown-12"], "0h 0m 30s");

    clock.advance(Duration::seconds(30));
    let results = handle.join().await;
    assert_eq!(results, vec![("retry-12".to_string(), TimerState::Elapsed)]);

    let state = page.snapshot();
    let button = &state.retry_buttons[0];
    assert!(!button.disabled);
    assert_eq!(button.label, "Last attempt");
    assert_eq!(button.classes, vec!["t-button".to_string()]);
    // The skipped element is untouched.
    assert!(state.retry_buttons[1].disabled);
    assert_eq!(state.countdown_targets["countdown-13"], "");
}

#[tokio::test]
async fn test_completion_then_navigation() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/counselor_project/update_part_status/12/")
        .match_header("x-csrftoken", "abc123")
        .with_status(200)
        .with_body(r#"{"success": true, "message": "Part marked as complete"}"#)
        .create_async()
        .await;

    let page = load_page();
    let client = CompletionClient::new(&ServerConfig {
        base_url: server.url(),
        ..Default::default()
    })
    .unwrap();
    let notifier = PartCompletionNotifier::for_page(client, page.clone())
        .with_csrf_token(coursegate_core::csrf_token("sessionid=x; csrftoken=abc123"));

    let kind = page.snapshot().content_kind("12");
    let outcome = notifier.complete("12", kind).await;
    assert_eq!(outcome, CompletionOutcome::QuizRevealed);
    mock.assert_async().await;

    let state = page.snapshot();
    assert_eq!(state.active_nav_count(), 1);
    assert!(state.nav_controls[2].active);
    assert!(state.part("12").unwrap().quiz.as_ref().unwrap().visible);

    // Opening the next part from the sidebar leaves the mount point intact.
    let url = fetch_current_part(page.as_ref(), "UK", "13", ContentView::Part, "12");
    assert_eq!(
        url.as_deref(),
        Some("/counselor_project/fetch_current_part/UK/13/1/")
    );
    assert!(fetch_current_part(page.as_ref(), "UK", "13", ContentView::Part, "13").is_none());
    assert_eq!(page.snapshot().navigations.len(), 1);
}
