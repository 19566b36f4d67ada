//! Date helpers and small conveniences used across handlers.

use std::error::Error;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, ParseResult};
use uuid::Uuid;

use crate::clock;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn str_to_date(text: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
}

pub fn str_to_datetime(text: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
}

pub fn date_to_str(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn datetime_to_str(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// Join a date and a time; midnight when no time is given.
pub fn datetime_combine(date: NaiveDate, time: Option<NaiveTime>) -> NaiveDateTime {
    date.and_time(time.unwrap_or(NaiveTime::MIN))
}

pub fn now() -> NaiveDateTime {
    clock::now()
}

pub fn today() -> NaiveDate {
    clock::now().date()
}

pub fn yesterday() -> NaiveDate {
    let today = today();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

pub fn tomorrow() -> NaiveDate {
    let today = today();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

pub fn list_first<T>(items: &[T]) -> Option<&T> {
    items.first()
}

/// Element at `index`; negative indexes count from the end.
pub fn list_get<T>(items: &[T], index: isize) -> Option<&T> {
    let position = if index < 0 {
        items.len().checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    items.get(position)
}

pub fn identity<T>(value: T) -> T {
    value
}

/// 32-char lowercase hex of a UUID, or an empty string.
pub fn get_uid(uid: Option<&Uuid>) -> String {
    uid.map(|u| u.simple().to_string()).unwrap_or_default()
}

/// Log an error and every cause under it.
pub fn log_error(err: &dyn Error) {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    if causes.is_empty() {
        tracing::error!("{err}");
    } else {
        tracing::error!(causes = ?causes, "{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_str_date_conversions() {
        assert_eq!(str_to_date("2018-03-09").unwrap(), day(2018, 3, 9));
        assert!(str_to_date("2018/03/09").is_err());
        let dt = str_to_datetime("2018-03-09 08:30:00").unwrap();
        assert_eq!(dt, day(2018, 3, 9).and_hms_opt(8, 30, 0).unwrap());
        assert_eq!(date_to_str(day(2018, 3, 9)), "2018-03-09");
        assert_eq!(datetime_to_str(dt), "2018-03-09 08:30:00");
    }

    #[test]
    fn test_datetime_combine() {
        let date = day(2018, 3, 9);
        assert_eq!(datetime_combine(date, None), date.and_hms_opt(0, 0, 0).unwrap());
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(datetime_combine(date, Some(noon)), date.and_time(noon));
    }

    #[test]
    fn test_relative_days_follow_clock() {
        let _guard = clock::freeze(day(2018, 3, 1).and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(today(), day(2018, 3, 1));
        assert_eq!(yesterday(), day(2018, 2, 28));
        assert_eq!(tomorrow(), day(2018, 3, 2));
        assert_eq!(now(), day(2018, 3, 1).and_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_list_helpers() {
        let items = [1, 2, 3];
        assert_eq!(list_first(&items), Some(&1));
        assert_eq!(list_first::<i32>(&[]), None);
        assert_eq!(list_get(&items, 1), Some(&2));
        assert_eq!(list_get(&items, -1), Some(&3));
        assert_eq!(list_get(&items, 3), None);
        assert_eq!(list_get(&items, -4), None);
        assert_eq!(identity("x"), "x");
    }

    #[test]
    fn test_get_uid() {
        let uid = Uuid::new_v4();
        let text = get_uid(Some(&uid));
        assert_eq!(text.len(), 32);
        assert!(crate::validators::is_uuid(&text));
        assert_eq!(get_uid(None), "");
    }

    #[test]
    fn test_log_error_walks_sources() {
        let err = crate::error::ConfigError::Read {
            path: "missing.toml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        log_error(&err);
    }
}
