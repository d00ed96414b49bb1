use serde_json::Value;

use super::scalar_text;

/// Headline figure of each calculator, in lookup order.
const PRIORITY_KEYS: [&str; 4] = ["net_profit", "profit_at_expiry", "final_amount", "max_profit"];

/// Print just the key answer value from the output, falling back to the
/// first result field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let headline = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null());
        if let Some(val) = headline {
            return scalar_text(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar_text(val));
        }
    }

    scalar_text(result_obj)
}
