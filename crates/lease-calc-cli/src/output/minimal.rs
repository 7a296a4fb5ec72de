use serde_json::Value;

use super::{format_scalar, result_of};

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "error_message",
    "lease_rental",
    "installment",
    "annual_rate_percent",
    "rate",
    "total_payments",
];

/// Print just the key answer value from the output.
///
/// An invalid calculation prints its message; otherwise the first priority
/// field present wins, then the first field of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = result_of(value);

    let Value::Object(map) = result else {
        return format_scalar(result, "null");
    };

    let invalid = map.get("valid") == Some(&Value::Bool(false));
    for key in PRIORITY_KEYS {
        if key == "error_message" && !invalid {
            continue;
        }
        if let Some(val) = map.get(key) {
            if !val.is_null() {
                return format_scalar(val, "null");
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_scalar(val, "null")),
        None => String::new(),
    }
}
