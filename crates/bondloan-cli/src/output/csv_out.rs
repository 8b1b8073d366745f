use serde_json::Value;
use std::io::{self, Write};

use super::{flatten_scalars, format_scalar, is_row_array, result_of};

/// Write output as CSV to stdout.
///
/// When the result carries a month-by-month series the first one (by key
/// order) is written as a table, which gives `amortization_schedule` for
/// `simulate`, `schedule` for `amortize`, `projection` for `project` and
/// `points` for `sensitivity`. Otherwise a two-column field/value CSV of
/// the flattened result is written.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(writer: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let result = result_of(value);

    let series = match result {
        Value::Object(map) => map.values().find(|v| is_row_array(v)),
        v if is_row_array(v) => Some(v),
        _ => None,
    };

    match series {
        Some(Value::Array(rows)) => write_rows(&mut wtr, rows)?,
        _ => {
            let mut fields = Vec::new();
            flatten_scalars("", result, &mut fields);
            wtr.write_record(["field", "value"])?;
            for (key, val) in &fields {
                wtr.write_record([key.as_str(), &format_scalar(val, false)])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(*h)
                        .map(|v| format_scalar(v, false))
                        .unwrap_or_default()
                })
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
