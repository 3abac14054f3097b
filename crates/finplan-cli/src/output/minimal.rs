use serde_json::Value;

use super::payload;

/// Headline fields in order of priority.
const PRIORITY_KEYS: [&str; 7] = [
    "score",
    "total_savings_est",
    "total_interest_saved",
    "debt_free_by",
    "weighted_apr",
    "annualized_surplus",
    "start_year",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known headline fields first, then falls back to the first
/// field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(payload(value)));
}

fn minimal_line(result: &Value) -> String {
    if let Value::Object(map) = result {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }
    format_minimal(result)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_key_wins() {
        let value = json!({"breakdown": {"entity": "10"}, "score": "27"});
        assert_eq!(minimal_line(&value), "27");
    }

    #[test]
    fn test_null_priority_key_is_skipped() {
        let value = json!({"debt_free_by": null, "weighted_apr": "18.5"});
        assert_eq!(minimal_line(&value), "18.5");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let value = json!({"itemize_likely": false});
        assert_eq!(minimal_line(&value), "itemize_likely: false");
    }
}
