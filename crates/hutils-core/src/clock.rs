//! Wall-clock access with a per-thread override for tests.
//!
//! Everything in this crate that needs "now" goes through [`now`]. While a
//! [`FrozenClock`] guard is alive on the current thread, [`now`] returns the
//! frozen instant instead of the system time.

use std::cell::Cell;

use chrono::{Local, NaiveDateTime};

thread_local! {
    static FROZEN: Cell<Option<NaiveDateTime>> = const { Cell::new(None) };
}

/// Current local time, or the frozen time if one is set on this thread.
pub fn now() -> NaiveDateTime {
    FROZEN
        .with(Cell::get)
        .unwrap_or_else(|| Local::now().naive_local())
}

pub fn is_frozen() -> bool {
    FROZEN.with(Cell::get).is_some()
}

/// Freeze [`now`] at `at` until the returned guard is dropped.
///
/// Guards nest: dropping one restores whatever was in effect before it.
pub fn freeze(at: NaiveDateTime) -> FrozenClock {
    let previous = FROZEN.with(|cell| cell.replace(Some(at)));
    tracing::debug!("clock frozen at {at}");
    FrozenClock { previous }
}

#[must_use = "the clock unfreezes when the guard is dropped"]
#[derive(Debug)]
pub struct FrozenClock {
    previous: Option<NaiveDateTime>,
}

impl Drop for FrozenClock {
    fn drop(&mut self) {
        FROZEN.with(|cell| cell.set(self.previous));
    }
}
