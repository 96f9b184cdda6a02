mod engine;
mod timer;

pub use engine::{CountdownEngine, CountdownHandle, CountdownSettings};
pub use timer::{
    parse_closed_time, CountdownTimer, RemainingTime, TickOutcome, TimerState,
    UnlockableElement, MAX_UNLOCK_DELAY_SECS, READY_LABEL, UNLOCK_DELAY_SECS,
};
