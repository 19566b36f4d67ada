//! Reading pagination and date-range parameters from request data.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

use crate::config::{DateRangeSettings, PaginationSettings};
use crate::error::SchemaError;
use crate::shortcuts::str_to_date;

/// `(offset, limit)` from `data`, falling back to the configured defaults.
///
/// ```
/// use hutils_core::config::PaginationSettings;
/// use hutils_core::schemas::get_offset_and_limit;
/// use serde_json::json;
///
/// let data = json!({"offset": "10", "limit": 30});
/// let (offset, limit) = get_offset_and_limit(data.as_object().unwrap(), &PaginationSettings::default()).unwrap();
/// assert_eq!((offset, limit), (10, 30));
/// ```
pub fn get_offset_and_limit(
    data: &Map<String, Value>,
    settings: &PaginationSettings,
) -> Result<(i64, i64), SchemaError> {
    let offset = int_or(data, "offset", settings.default_offset)?;
    let limit = int_or(data, "limit", settings.default_limit)?;
    if offset < 0 || limit < offset {
        return Err(SchemaError::OutOfRange);
    }
    if let Some(max_limit) = settings.max_limit.filter(|max| *max > 0) {
        if limit > max_limit {
            return Err(SchemaError::LimitExceeded(max_limit));
        }
    }
    Ok((offset, limit))
}

fn int_or(data: &Map<String, Value>, key: &str, default: i64) -> Result<i64, SchemaError> {
    let not_an_integer = |found: &Value| SchemaError::NotAnInteger {
        key: key.to_string(),
        found: found.to_string(),
    };
    match data.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value @ Value::Number(n)) => n.as_i64().ok_or_else(|| not_an_integer(value)),
        Some(value @ Value::String(text)) => text.trim().parse().map_err(|_| not_an_integer(value)),
        Some(value) => Err(not_an_integer(value)),
    }
}

/// `(from, to)` dates read from `{prefix}from` / `{prefix}to`. Either side may be missing.
pub fn get_start_and_end_date(
    data: &Map<String, Value>,
    settings: &DateRangeSettings,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), SchemaError> {
    let start = date_at(data, &format!("{}from", settings.prefix))?;
    let end = date_at(data, &format!("{}to", settings.prefix))?;
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(SchemaError::ReversedRange);
        }
        if (end - start).num_days() > settings.max_delta_days {
            return Err(SchemaError::RangeTooWide(settings.max_delta_days));
        }
    }
    Ok((start, end))
}

/// Like [`get_start_and_end_date`], widened to the first and last instant of each day.
pub fn get_start_and_end_time(
    data: &Map<String, Value>,
    settings: &DateRangeSettings,
) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), SchemaError> {
    let (start, end) = get_start_and_end_date(data, settings)?;
    Ok((
        start.map(|date| date.and_time(NaiveTime::MIN)),
        end.map(|date| date.and_time(end_of_day())),
    ))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}

fn date_at(data: &Map<String, Value>, key: &str) -> Result<Option<NaiveDate>, SchemaError> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(value @ Value::String(text)) => str_to_date(text).map(Some).map_err(|_| SchemaError::NotADate {
            key: key.to_string(),
            found: value.to_string(),
        }),
        Some(value) => Err(SchemaError::NotADate {
            key: key.to_string(),
            found: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_offset_and_limit_defaults() {
        let settings = PaginationSettings::default();
        assert_eq!(get_offset_and_limit(&map(json!({})), &settings).unwrap(), (0, 20));
        assert_eq!(
            get_offset_and_limit(&map(json!({"offset": null})), &settings).unwrap(),
            (0, 20)
        );
    }

    #[test]
    fn test_offset_and_limit_from_strings() {
        let settings = PaginationSettings::default();
        let data = map(json!({"offset": " 5 ", "limit": "15"}));
        assert_eq!(get_offset_and_limit(&data, &settings).unwrap(), (5, 15));
    }

    #[test]
    fn test_offset_and_limit_out_of_range() {
        let settings = PaginationSettings::default();
        assert_eq!(
            get_offset_and_limit(&map(json!({"offset": -1})), &settings).unwrap_err(),
            SchemaError::OutOfRange
        );
        assert_eq!(
            get_offset_and_limit(&map(json!({"offset": 30, "limit": 10})), &settings).unwrap_err(),
            SchemaError::OutOfRange
        );
    }

    #[test]
    fn test_offset_and_limit_max() {
        let settings = PaginationSettings {
            max_limit: Some(100),
            ..PaginationSettings::default()
        };
        assert_eq!(
            get_offset_and_limit(&map(json!({"limit": 101})), &settings).unwrap_err(),
            SchemaError::LimitExceeded(100)
        );
        assert_eq!(
            get_offset_and_limit(&map(json!({"limit": 100})), &settings).unwrap(),
            (0, 100)
        );
    }

    #[test]
    fn test_offset_and_limit_not_an_integer() {
        let err = get_offset_and_limit(&map(json!({"limit": "ten"})), &PaginationSettings::default())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::NotAnInteger {
                key: "limit".to_string(),
                found: "\"ten\"".to_string(),
            }
        );
        assert!(get_offset_and_limit(&map(json!({"limit": 1.5})), &PaginationSettings::default()).is_err());
    }

    #[test]
    fn test_start_and_end_date() {
        let settings = DateRangeSettings::default();
        let data = map(json!({"from": "2018-01-01", "to": "2018-02-01"}));
        assert_eq!(
            get_start_and_end_date(&data, &settings).unwrap(),
            (Some(day(2018, 1, 1)), Some(day(2018, 2, 1)))
        );
        assert_eq!(
            get_start_and_end_date(&map(json!({"to": "2018-02-01"})), &settings).unwrap(),
            (None, Some(day(2018, 2, 1)))
        );
    }

    #[test]
    fn test_start_and_end_date_with_prefix() {
        let settings = DateRangeSettings {
            prefix: "created_".to_string(),
            ..DateRangeSettings::default()
        };
        let data = map(json!({"from": "2018-01-01", "created_from": "2018-03-01"}));
        assert_eq!(
            get_start_and_end_date(&data, &settings).unwrap(),
            (Some(day(2018, 3, 1)), None)
        );
    }

    #[test]
    fn test_start_and_end_date_errors() {
        let settings = DateRangeSettings {
            max_delta_days: 30,
            ..DateRangeSettings::default()
        };
        let reversed = map(json!({"from": "2018-02-01", "to": "2018-01-01"}));
        assert_eq!(
            get_start_and_end_date(&reversed, &settings).unwrap_err(),
            SchemaError::ReversedRange
        );
        let wide = map(json!({"from": "2018-01-01", "to": "2018-03-01"}));
        assert_eq!(
            get_start_and_end_date(&wide, &settings).unwrap_err(),
            SchemaError::RangeTooWide(30)
        );
        let garbage = map(json!({"from": "yesterday"}));
        assert!(matches!(
            get_start_and_end_date(&garbage, &settings),
            Err(SchemaError::NotADate { .. })
        ));
    }

    #[test]
    fn test_start_and_end_time() {
        let data = map(json!({"from": "2018-01-01", "to": "2018-01-02"}));
        let (start, end) = get_start_and_end_time(&data, &DateRangeSettings::default()).unwrap();
        assert_eq!(start, Some(day(2018, 1, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(
            end,
            Some(day(2018, 1, 2).and_hms_micro_opt(23, 59, 59, 999_999).unwrap())
        );
    }
}
