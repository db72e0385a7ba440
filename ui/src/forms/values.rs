//! Key-path access into form values.
//!
//! Field names are `.`-separated paths into a JSON object, so
//! `"address.city"` binds to `{"address": {"city": ...}}`.

use serde_json::{Map, Value};

/// The value set owned by one form instance.
pub type FormValues = Map<String, Value>;

pub fn get_path<'a>(values: &'a FormValues, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects and replacing any
/// non-object found on the way.
pub fn set_path(values: &mut FormValues, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            values.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = values
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                set_path(child, rest, value);
            }
        }
    }
}

pub fn remove_path(values: &mut FormValues, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => values.remove(path),
        Some((head, rest)) => match values.get_mut(head) {
            Some(Value::Object(child)) => remove_path(child, rest),
            _ => None,
        },
    }
}

/// Copy only the given paths out of `values`. Missing paths are skipped.
pub fn pick_paths<'a>(values: &FormValues, paths: impl IntoIterator<Item = &'a str>) -> FormValues {
    let mut picked = FormValues::new();
    for path in paths {
        if let Some(value) = get_path(values, path) {
            set_path(&mut picked, path, value.clone());
        }
    }
    picked
}

/// Display form of a bound value for text-like controls.
pub fn value_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Value stored for a number input: a JSON number when the text parses,
/// otherwise the raw text (so partial input such as `-` survives re-render).
pub fn number_input_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    match trimmed.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(raw.to_string()),
    }
}

/// Treats null, empty strings and empty arrays as "no value".
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// Fold a step snapshot into the accumulated wizard data.
///
/// Objects merge recursively; any other value in `snapshot` replaces what
/// `accumulated` held at that key. Applying the same snapshot twice is a
/// no-op, and for snapshots that agree on which keys are objects the merge is
/// associative.
pub fn merge_step_data(accumulated: &FormValues, snapshot: &FormValues) -> FormValues {
    let mut merged = accumulated.clone();
    merge_into(&mut merged, snapshot);
    merged
}

fn merge_into(target: &mut FormValues, source: &FormValues) {
    for (key, incoming) in source {
        if let (Some(Value::Object(existing)), Value::Object(incoming_obj)) =
            (target.get_mut(key), incoming)
        {
            merge_into(existing, incoming_obj);
            continue;
        }
        target.insert(key.clone(), incoming.clone());
    }
}

/// Coerce an arbitrary JSON value into a value set. Non-objects yield `None`.
pub fn as_form_values(value: Value) -> Option<FormValues> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
