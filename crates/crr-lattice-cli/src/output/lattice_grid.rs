use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Display titles for the lattice fields of a pricing result.
pub const LATTICE_FIELDS: [(&str, &str); 2] = [
    ("price_lattice", "Pricing"),
    ("value_lattice", "Option Values"),
];

/// A serialised lattice (`{"steps": n, "nodes": [[..], ..]}`) as rows of
/// decimal strings. `None` if the value does not have that shape.
pub fn lattice_rows(value: &Value) -> Option<Vec<Vec<String>>> {
    let nodes = value.as_object()?.get("nodes")?.as_array()?;
    nodes
        .iter()
        .map(|row| -> Option<Vec<String>> {
            row.as_array()?
                .iter()
                .map(|cell| match cell {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Truncate a decimal string towards zero for grid display.
pub fn truncate_cell(raw: &str) -> String {
    match Decimal::from_str(raw) {
        Ok(d) => d
            .trunc()
            .to_i64()
            .map(|v| v.to_string())
            .unwrap_or_else(|| d.trunc().to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Integer-truncated grid of a serialised lattice.
pub fn truncated_grid(value: &Value) -> Option<Vec<Vec<String>>> {
    lattice_rows(value).map(|rows| {
        rows.iter()
            .map(|row| row.iter().map(|c| truncate_cell(c)).collect())
            .collect()
    })
}

pub fn is_lattice_field(key: &str) -> bool {
    LATTICE_FIELDS.iter().any(|(field, _)| *field == key)
}
