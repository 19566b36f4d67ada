use serde_json::Value;

/// Resolve a `__`-separated path inside `data`.
///
/// Segments: `length` (size of an array, object or string), `bool`
/// (truthiness), `_N` or `N` (array index), `_name` or `name` (object key).
pub fn resolve_path(data: &Value, path: &str) -> Result<Value, String> {
    let mut current = data.clone();
    for part in path.split("__") {
        current = match part {
            "length" => Value::from(length_of(&current).ok_or_else(|| format!("{path}: {current} has no length"))?),
            "bool" => Value::Bool(truthy(&current)),
            _ => {
                let segment = part.strip_prefix('_').unwrap_or(part);
                step(&current, segment).ok_or_else(|| format!("{path}: no '{segment}' in {current}"))?
            }
        };
    }
    Ok(current)
}

fn step(value: &Value, segment: &str) -> Option<Value> {
    match (value, segment.parse::<usize>()) {
        (Value::Array(items), Ok(index)) => items.get(index).cloned(),
        (Value::Object(map), _) => map.get(segment).cloned(),
        _ => None,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(text) => Some(text.chars().count()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Assert each `(path, expected)` pair against `data`. See [`resolve_path`].
///
/// ```
/// use hutils_testing::assert_same;
/// use serde_json::json;
///
/// let data = json!({"nested": {"list": ["key", "value"], "empty": null}});
/// assert_same(&data, &[
///     ("nested__list__0", json!("key")),
///     ("nested__list__length", json!(2)),
///     ("nested__empty__bool", json!(false)),
/// ]);
/// ```
#[track_caller]
pub fn assert_same(data: &Value, expects: &[(&str, Value)]) {
    for (path, expected) in expects {
        match resolve_path(data, path) {
            Ok(actual) => assert_eq!(
                &actual, expected,
                "{path} value not match.\nExpect: {expected}\nActual: {actual}\nData: {data}"
            ),
            Err(message) => panic!("{message}\nData: {data}"),
        }
    }
}

/// Assert `expected` is contained in `actual`: objects may carry extra
/// keys, arrays must match in length and item by item.
#[track_caller]
pub fn assert_data(expected: &Value, actual: &Value) {
    match (expected, actual) {
        (Value::Array(want), Value::Array(got)) => {
            assert_eq!(want.len(), got.len(), "length mismatch: {expected} vs {actual}");
            for (w, g) in want.iter().zip(got) {
                assert_data(w, g);
            }
        }
        (Value::Object(want), Value::Object(got)) => {
            for (key, w) in want {
                let g = got
                    .get(key)
                    .unwrap_or_else(|| panic!("{key} not in actual data {actual}"));
                assert_data(w, g);
            }
        }
        _ => assert_eq!(expected, actual),
    }
}

/// Read `counter` now and again when the guard drops; the difference must be `delta`.
///
/// The final check is skipped if the scope is unwinding from a panic.
pub fn assert_increases<F>(delta: i64, name: &str, mut counter: F) -> IncreaseGuard<F>
where
    F: FnMut() -> i64,
{
    let previous = counter();
    IncreaseGuard {
        delta,
        name: name.to_string(),
        previous,
        counter,
    }
}

#[must_use = "the change is checked when the guard is dropped"]
pub struct IncreaseGuard<F: FnMut() -> i64> {
    delta: i64,
    name: String,
    previous: i64,
    counter: F,
}

impl<F: FnMut() -> i64> Drop for IncreaseGuard<F> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let current = (self.counter)();
        assert_eq!(
            self.previous + self.delta,
            current,
            "{} should change {}",
            self.name,
            self.delta
        );
    }
}
