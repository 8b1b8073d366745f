use serde_json::{Map, Value};

use super::{format_scalar, result_of};

/// Key figures in order of priority. The first one present (searching the
/// result and then its nested objects) is printed.
const PRIORITY_KEYS: [&str; 6] = [
    "net_gain",
    "total_tax",
    "emi",
    "total_value",
    "best",
    "bond1_tax",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(found) = find_priority(map) {
            println!("{}", format_scalar(found, false));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val, false));
            return;
        }
    }

    println!("{}", format_scalar(result, false));
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return Some(val);
        }
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(find_priority)
}
