pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// List-valued fields that carry the rows of a planner result, in the
/// order they are preferred as the CSV body.
pub(crate) const ROW_KEYS: [&str; 5] = ["strategies", "items", "milestones", "steps", "schedule"];

/// The payload of an output: the `result` of an envelope, or the value itself.
pub(crate) fn payload(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First non-empty list of objects under one of [`ROW_KEYS`].
pub(crate) fn primary_rows(map: &Map<String, Value>) -> Option<(&'static str, &Vec<Value>)> {
    ROW_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(rows)) if rows.first().is_some_and(Value::is_object) => Some((*key, rows)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_unwraps_envelope() {
        let wrapped = json!({"result": {"score": "27"}, "warnings": []});
        assert_eq!(payload(&wrapped), &json!({"score": "27"}));
        let bare = json!({"score": "27"});
        assert_eq!(payload(&bare), &bare);
    }

    #[test]
    fn test_primary_rows_skip_scalar_lists() {
        let value = json!({
            "documents": ["W-9"],
            "strategies": [],
            "steps": [{"code": "augusta_rule", "label": "Log rental days"}]
        });
        let map = value.as_object().unwrap();
        let (key, rows) = primary_rows(map).unwrap();
        assert_eq!(key, "steps");
        assert_eq!(rows.len(), 1);
    }
}
