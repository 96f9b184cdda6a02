//! # Coursegate Core Library
//!
//! Client-side behavior of a course/quiz site, expressed against an
//! explicit page model instead of a browser document. Everything is
//! available through the standalone CLI; a browser or desktop shell would
//! be a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: per-element unlock timers, one tokio task each,
//!   computed from wall-clock time only
//! - **Part-Completion Notifier**: the `update_part_status` round trip and
//!   the page updates that follow it
//! - **Form Gate**: refuses quiz submission while any question is unanswered
//! - **Navigation**: `fetch_current_part` deep links and course name resolution
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: drives [`CountdownTimer`]s against a [`CountdownView`]
//! - [`PartCompletionNotifier`]: completion request plus UI follow-up
//! - [`QuizForm`]: grouped controls and the gate
//! - [`Page`]: in-memory page implementing every view trait
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod completion;
pub mod countdown;
pub mod error;
pub mod flash;
pub mod form;
pub mod navigation;
pub mod page;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use completion::{
    csrf_token, CompletionClient, CompletionOutcome, CompletionResponse, ContentKind,
    PartCompletionNotifier,
};
pub use countdown::{
    CountdownEngine, CountdownHandle, CountdownSettings, CountdownTimer, RemainingTime,
    TimerState, UnlockableElement,
};
pub use error::{CompletionError, ConfigError, CoreError, PageError};
pub use flash::FlashDismisser;
pub use form::{GateDecision, QuizForm};
pub use navigation::{fetch_current_part, ContentView, CourseNameResolver};
pub use page::{CountdownView, CourseView, FlashView, Navigator, Page, PageState, UserAlerts};
pub use storage::Config;
