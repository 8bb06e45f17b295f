use serde_json::Value;
use std::io;

use super::lattice_grid::{is_lattice_field, lattice_rows, LATTICE_FIELDS};

/// Write output as CSV to stdout.
///
/// Pricing results become long-format node rows
/// (`lattice,down_moves,step,value`); other results are field/value pairs,
/// or one row per element for arrays of objects.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                if result.keys().any(|k| is_lattice_field(k)) {
                    write_lattice_csv(&mut wtr, result);
                } else if let Some(rows) = first_object_array(result) {
                    write_array_csv(&mut wtr, rows);
                } else {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                    }
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn first_object_array(map: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    map.values().find_map(|v| match v {
        Value::Array(arr) if arr.first().map(Value::is_object).unwrap_or(false) => Some(arr),
        _ => None,
    })
}

/// Reachable nodes only (down_moves <= step).
fn write_lattice_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    result: &serde_json::Map<String, Value>,
) {
    let _ = wtr.write_record(["lattice", "down_moves", "step", "value"]);
    for (field, _) in LATTICE_FIELDS {
        let Some(rows) = result.get(field).and_then(lattice_rows) else {
            continue;
        };
        for (i, row) in rows.iter().enumerate() {
            for (j, cell) in row.iter().enumerate().skip(i) {
                let _ = wtr.write_record([field, &i.to_string(), &j.to_string(), cell.as_str()]);
            }
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
