//! Result formatting.

use std::fmt::Write;

use drc_store::Row;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cli::Format;

/// Separator between aligned columns.
const GAP: &str = "  ";

/// Renders result rows under the given column names.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(
    format: Format,
    columns: &[String],
    rows: &[Row],
    header: bool,
    delimiter: char,
) -> serde_json::Result<String> {
    match format {
        Format::Aligned => Ok(aligned(columns, rows, header)),
        Format::Delimited => Ok(delimited(columns, rows, header, delimiter)),
        Format::Json => json(columns, rows),
    }
}

fn aligned(columns: &[String], rows: &[Row], header: bool) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    if header && !columns.is_empty() {
        aligned_line(&mut out, columns, &widths);
    }
    for row in rows {
        aligned_line(&mut out, row, &widths);
    }
    out
}

fn aligned_line(out: &mut String, values: &[String], widths: &[usize]) {
    let last = values.len().saturating_sub(1);
    for (i, (value, width)) in values.iter().zip(widths).enumerate() {
        if i > 0 {
            out.push_str(GAP);
        }
        if i == last {
            out.push_str(value);
        } else {
            let _ = write!(out, "{value:width$}");
        }
    }
    out.push('\n');
}

fn delimited(columns: &[String], rows: &[Row], header: bool, delimiter: char) -> String {
    let mut out = String::new();
    let mut line = |values: &[String]| {
        let fields: Vec<String> = values.iter().map(|v| escape(v, delimiter)).collect();
        out.push_str(&fields.join(&delimiter.to_string()));
        out.push('\n');
    };
    if header && !columns.is_empty() {
        line(columns);
    }
    for row in rows {
        line(row);
    }
    out
}

/// Backslash-escapes a field so it never contains the delimiter or a line
/// break.
fn escape(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// One result row as a JSON object, keys in column order.
struct Record<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

fn json(columns: &[String], rows: &[Row]) -> serde_json::Result<String> {
    let records: Vec<Record<'_>> = rows
        .iter()
        .map(|values| Record { columns, values })
        .collect();
    let mut out = serde_json::to_string_pretty(&records)?;
    out.push('\n');
    Ok(out)
}
