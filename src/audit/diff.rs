//! Change summaries for audit entries
//!
//! Compares the serialized form of an entity before and after an update and
//! lists the top-level fields that changed.

use serde_json::Value;

/// Bookkeeping fields that change on every save and say nothing useful
const IGNORED_FIELDS: &[&str] = &["updated_at"];

const MAX_STRING_LEN: usize = 40;

/// Summarize the changed fields between two serialized entities
///
/// Returns `None` when nothing worth reporting changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(old), Value::Object(new)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes: Vec<String> = old
        .iter()
        .filter(|(key, _)| !IGNORED_FIELDS.contains(&key.as_str()))
        .filter_map(|(key, old_val)| match new.get(key) {
            Some(new_val) if new_val == old_val => None,
            Some(new_val) => Some(format!(
                "{}: {} -> {}",
                key,
                format_value(old_val),
                format_value(new_val)
            )),
            None => Some(format!("{}: {} -> (removed)", key, format_value(old_val))),
        })
        .collect();

    changes.extend(
        new.iter()
            .filter(|(key, _)| !old.contains_key(*key))
            .filter(|(key, _)| !IGNORED_FIELDS.contains(&key.as_str()))
            .map(|(key, val)| format!("{}: (added) -> {}", key, format_value(val))),
    );

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_only() {
        let before = json!({"title": "Dinner", "amount": 3000, "payer_id": "a"});
        let after = json!({"title": "Dinner", "amount": 4500, "payer_id": "a"});

        assert_eq!(
            generate_diff(&before, &after),
            Some("amount: 3000 -> 4500".to_string())
        );
    }

    #[test]
    fn test_updated_at_is_ignored() {
        let before = json!({"name": "Trip", "updated_at": "2024-01-01"});
        let after = json!({"name": "Trip", "updated_at": "2024-02-01"});

        assert_eq!(generate_diff(&before, &after), None);
    }

    #[test]
    fn test_added_removed_and_null() {
        let before = json!({"payment_info": "alice-pay", "old": 1});
        let after = json!({"payment_info": null, "sort_order": 2});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("payment_info: \"alice-pay\" -> none"));
        assert!(diff.contains("old: 1 -> (removed)"));
        assert!(diff.contains("sort_order: (added) -> 2"));
    }

    #[test]
    fn test_long_strings_truncated_on_char_boundary() {
        let long = "精".repeat(60);
        let diff = generate_diff(&json!({"title": long}), &json!({"title": "x"})).unwrap();

        assert!(diff.contains("...\""));
        assert!(diff.ends_with("-> \"x\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(1), &json!(1)), None);
        assert_eq!(generate_diff(&json!([1]), &json!(2)), Some("[1 items] -> 2".into()));
    }
}
