use json::JsonValue;

pub mod rank;
pub mod stats;

/// Scalar rendered as text, `None` for null and containers.
fn text_of(json: &JsonValue) -> Option<String> {
    match json {
        JsonValue::Short(_) | JsonValue::String(_) => json.as_str().map(str::to_string),
        JsonValue::Number(_) | JsonValue::Boolean(_) => Some(json.dump()),
        _ => None,
    }
}

/// Numbers, and strings holding one, as `f64`.
fn number_of(json: &JsonValue) -> Option<f64> {
    match json {
        JsonValue::Number(_) => json.as_f64(),
        JsonValue::Short(_) | JsonValue::String(_) => json.as_str()?.trim().parse().ok(),
        _ => None,
    }
}
