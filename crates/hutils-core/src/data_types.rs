//! JSON formatting, decimal rounding and small map helpers.

use std::io;
use std::str::Utf8Error;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use crate::error::DataError;

pub use rust_decimal::RoundingStrategy;

/// Output options for [`format_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Escape every non-ASCII character as `\uXXXX`.
    pub ensure_ascii: bool,
    /// Sort object keys recursively.
    pub sort_keys: bool,
    /// Pretty-print with this many spaces per level.
    pub indent: Option<usize>,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            ensure_ascii: false,
            sort_keys: false,
            indent: None,
        }
    }
}

impl JsonOptions {
    pub fn ascii() -> Self {
        Self {
            ensure_ascii: true,
            ..Self::default()
        }
    }

    pub fn sorted() -> Self {
        Self {
            sort_keys: true,
            ..Self::default()
        }
    }
}

/// Serialize `data` the way web clients of this library expect it:
/// `", "` / `": "` separators, UTF-8 kept as is unless `ensure_ascii`.
///
/// Decimals serialize as strings; use [`datetime_format`] on
/// `NaiveDateTime` fields to get `YYYY-MM-DD HH:MM:SS`.
///
/// ```
/// use hutils_core::data_types::{format_json, JsonOptions};
/// use serde_json::json;
///
/// let text = format_json(&json!({"key": "name", "value": "强哥"}), &JsonOptions::default()).unwrap();
/// assert_eq!(text, r#"{"key": "name", "value": "强哥"}"#);
/// ```
pub fn format_json<T>(data: &T, options: &JsonOptions) -> serde_json::Result<String>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::with_capacity(128);
    let formatter = SpacedFormatter::new(options);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);

    if options.sort_keys {
        let mut value = serde_json::to_value(data)?;
        sort_keys(&mut value);
        value.serialize(&mut ser)?;
    } else {
        data.serialize(&mut ser)?;
    }

    String::from_utf8(out).map_err(serde::ser::Error::custom)
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut child) in entries {
                sort_keys(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// serde_json formatter with spaced separators and optional ASCII escaping.
struct SpacedFormatter {
    ensure_ascii: bool,
    indent: Option<usize>,
    depth: usize,
    has_value: bool,
}

impl SpacedFormatter {
    fn new(options: &JsonOptions) -> Self {
        Self {
            ensure_ascii: options.ensure_ascii,
            indent: options.indent,
            depth: 0,
            has_value: false,
        }
    }

    fn newline<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        if let Some(width) = self.indent {
            writer.write_all(b"\n")?;
            for _ in 0..self.depth * width {
                writer.write_all(b" ")?;
            }
        }
        Ok(())
    }

    fn separator<W: ?Sized + io::Write>(&self, writer: &mut W, first: bool) -> io::Result<()> {
        if !first {
            // Pretty output ends lines after the comma, compact output pads it.
            let sep: &[u8] = if self.indent.is_some() { b"," } else { b", " };
            writer.write_all(sep)?;
        }
        self.newline(writer)
    }

    fn open<W: ?Sized + io::Write>(&mut self, writer: &mut W, token: &[u8]) -> io::Result<()> {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(token)
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, token: &[u8]) -> io::Result<()> {
        self.depth -= 1;
        if self.has_value {
            self.newline(writer)?;
        }
        self.has_value = true;
        writer.write_all(token)
    }
}

impl Formatter for SpacedFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.separator(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.separator(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.ensure_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// `#[serde(with = "datetime_format")]` for `NaiveDateTime` as `YYYY-MM-DD HH:MM:SS`.
pub mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::shortcuts::DATETIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "date_format")]` for `NaiveDate` as `YYYY-MM-DD`.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::shortcuts::DATE_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "decimal_string")]` writes a `Decimal` as a JSON string and
/// reads it back from either a string or a number.
pub mod decimal_string {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Decimal::from_str(text.trim()).map_err(D::Error::custom),
            Value::Number(n) => Decimal::from_str(&n.to_string()).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("expected a decimal, got {other}"))),
        }
    }
}

/// Decode UTF-8 bytes, e.g. values read back from a cache.
pub fn bytes_to_str(data: &[u8]) -> Result<&str, Utf8Error> {
    std::str::from_utf8(data)
}

/// [`bytes_to_str`] over a list of values, keeping missing entries missing.
pub fn bytes_list_to_str<I, B>(data: I) -> Result<Vec<Option<String>>, Utf8Error>
where
    I: IntoIterator<Item = Option<B>>,
    B: AsRef<[u8]>,
{
    data.into_iter()
        .map(|item| {
            item.map(|bytes| bytes_to_str(bytes.as_ref()).map(str::to_string))
                .transpose()
        })
        .collect()
}

/// Fetch several required keys at once.
///
/// ```
/// use hutils_core::data_types::get_data;
/// use serde_json::json;
///
/// let data = json!({"offset": 0, "limit": 20});
/// let values = get_data(data.as_object().unwrap(), &["offset", "limit"]).unwrap();
/// assert_eq!(values, vec![&json!(0), &json!(20)]);
/// ```
pub fn get_data<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Result<Vec<&'a Value>, DataError> {
    keys.iter()
        .map(|key| {
            data.get(*key)
                .ok_or_else(|| DataError::MissingKey(key.to_string()))
        })
        .collect()
}

/// Fetch several optional keys at once.
pub fn get_data_optional<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Vec<Option<&'a Value>> {
    keys.iter().map(|key| data.get(*key)).collect()
}

/// Merge maps left to right; later maps win on key collisions.
pub fn merge_dicts<'a, I>(maps: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for map in maps {
        merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Drop trailing fractional zeros: `"80.00"` → `"80"`, `"12.30"` → `"12.3"`.
pub fn normalize(value: impl ToString) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Round to two decimal places, half away from zero, always keeping two places.
///
/// Fails when the value is too large to carry two decimal places.
pub fn quantize(value: Decimal) -> Result<Decimal, DataError> {
    quantize_with(value, RoundingStrategy::MidpointAwayFromZero)
}

pub fn quantize_with(value: Decimal, strategy: RoundingStrategy) -> Result<Decimal, DataError> {
    let mut rounded = value.round_dp_with_strategy(2, strategy);
    // rescale silently keeps a smaller scale when the mantissa would overflow.
    rounded.rescale(2);
    if rounded.scale() != 2 {
        return Err(DataError::QuantizeOverflow(value));
    }
    Ok(rounded)
}
