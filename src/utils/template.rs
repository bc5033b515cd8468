//! `{{dotted.path}}` template filling over nested JSON values.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}\s]+)\}\}").expect("Invalid regex pattern"));

/// Replace every `{{path}}` in `template` with the scalar found at that
/// dot-joined path in `vars`. Objects are walked by key, arrays by index.
/// `null` values and placeholders with no matching scalar are left as they
/// are. The template is scanned once, so text inserted from a value is never
/// filled again.
pub fn fill(template: &str, vars: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match lookup(vars, &caps[1]) {
            Some(value) => value,
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn lookup(vars: &Value, path: &str) -> Option<String> {
    let mut current = vars;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(current.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

pub fn is_present(template: &str, key: &str) -> bool {
    let placeholder = format!("{{{{{}}}}}", key);
    template.contains(&placeholder)
}
