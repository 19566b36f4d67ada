//! Test helpers for code built on `hutils-core`.
//!
//! - [`assert_same`] / [`assert_data`]: compare JSON payloads by path or as a subset.
//! - [`assert_increases`]: check a counter moved by an exact delta over a scope.
//! - [`ResponseExt`]: status-code shortcuts for anything implementing [`TestResponse`].
//! - [`fake_time`]: freeze `hutils_core::clock::now` for the current test.

pub mod assertions;
pub mod response;

use chrono::{NaiveDate, NaiveDateTime};
use hutils_core::clock::{self, FrozenClock};
use hutils_core::shortcuts::{DATETIME_FORMAT, DATE_FORMAT};

pub use assertions::{IncreaseGuard, assert_data, assert_increases, assert_same, resolve_path};
pub use response::{JsonResponse, ResponseExt, TestResponse};

/// Freeze the clock at `when`, given as `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
///
/// ```
/// let _time = hutils_testing::fake_time("2018-08-08 12:00:00");
/// assert_eq!(
///     hutils_core::shortcuts::datetime_to_str(hutils_core::shortcuts::now()),
///     "2018-08-08 12:00:00"
/// );
/// ```
///
/// # Panics
///
/// When `when` matches neither format.
pub fn fake_time(when: &str) -> FrozenClock {
    let at = NaiveDateTime::parse_from_str(when, DATETIME_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(when, DATE_FORMAT).map(|d| d.and_time(chrono::NaiveTime::MIN)))
        .unwrap_or_else(|_| panic!("fake_time: cannot parse '{when}'"));
    clock::freeze(at)
}

pub fn fake_time_at(at: NaiveDateTime) -> FrozenClock {
    clock::freeze(at)
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`, defaulting to warnings. Safe to call from every test.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_ansi(false)
        .try_init();
}
