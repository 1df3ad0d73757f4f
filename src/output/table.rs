//! JSON to table conversion
//!
//! Responses are walked with dotted paths (`properties.name`,
//! `properties.connections.0.lanId`) into flat rows of strings, one per
//! element under the root path.

use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::error::{CliError, CliResult};
use crate::util::units::{self, Unit};

/// A flattened row: column name -> rendered cell
pub type Row = HashMap<String, String>;

/// One output column and where its value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub path: &'static str,
    /// Values are a byte count in this unit and shown as whole GB
    pub unit: Option<Unit>,
}

/// Plain column
pub const fn col(name: &'static str, path: &'static str) -> Column {
    Column {
        name,
        path,
        unit: None,
    }
}

/// Size column rendered as `"<n> GB"`
pub const fn size_col(name: &'static str, path: &'static str, unit: Unit) -> Column {
    Column {
        name,
        path,
        unit: Some(unit),
    }
}

/// The columns a resource can print and the ones shown by default
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Path to the array of items, or `""` for a single object
    pub root: &'static str,
    pub columns: &'static [Column],
    pub defaults: &'static [&'static str],
}

impl TableSpec {
    /// Same columns, different root
    pub const fn at(self, root: &'static str) -> Self {
        Self { root, ..self }
    }

    /// Resolve the columns to print for a `--cols` request
    pub fn select(&self, requested: &[String]) -> Vec<Column> {
        select_columns(self.columns, self.defaults, requested)
    }
}

/// Resolve a dotted path inside `value`. Numeric segments index arrays.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Render a JSON value as a single table cell
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => items
            .iter()
            .map(cell)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Flatten `value` into rows.
///
/// `paths` maps column name to a dotted path relative to each element under
/// `root`. Every path must exist in every element.
pub fn flatten(value: &Value, root: &str, paths: &[(&str, &str)]) -> CliResult<Vec<Row>> {
    if value.is_null() {
        return Err(CliError::Output("nothing to print: response is empty".into()));
    }
    if paths.is_empty() {
        return Err(CliError::Output("no columns to extract".into()));
    }

    let elements: Vec<&Value> = if root.is_empty() {
        vec![value]
    } else {
        match lookup(value, root) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(_) => {
                return Err(CliError::Output(format!(
                    "expected an array at '{}'",
                    root
                )))
            }
            None => return Err(CliError::MissingField { path: root.into() }),
        }
    };

    elements
        .into_iter()
        .map(|element| {
            paths
                .iter()
                .map(|(name, path)| {
                    lookup(element, path)
                        .map(|v| (name.to_string(), cell(v)))
                        .ok_or_else(|| CliError::MissingField {
                            path: path.to_string(),
                        })
                })
                .collect::<CliResult<Row>>()
        })
        .collect()
}

/// Pick the columns to print.
///
/// Empty request: defaults. `all`: every column. Otherwise requested names
/// in request order, matched case-insensitively; unknown names are dropped.
pub fn select_columns(all: &[Column], defaults: &[&str], requested: &[String]) -> Vec<Column> {
    let by_name = |name: &str| all.iter().find(|c| c.name.eq_ignore_ascii_case(name)).copied();
    let defaults = || defaults.iter().filter_map(|d| by_name(*d)).collect::<Vec<_>>();

    let requested: Vec<&str> = requested
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();

    if requested.is_empty() {
        return defaults();
    }
    if requested.iter().any(|r| r.eq_ignore_ascii_case("all")) {
        return all.to_vec();
    }

    let mut selected: Vec<Column> = Vec::new();
    for name in requested {
        match by_name(name) {
            Some(column) if !selected.contains(&column) => selected.push(column),
            Some(_) => {}
            None => warn!("ignoring unknown column '{}'", name),
        }
    }

    if selected.is_empty() {
        warn!("none of the requested columns exist, using defaults");
        return defaults();
    }
    selected
}

/// Rewrite size columns from raw byte counts to `"<n> GB"`
pub fn convert_sizes(rows: &mut [Row], columns: &[Column]) {
    for column in columns {
        let Some(unit) = column.unit else { continue };
        for row in rows.iter_mut() {
            if let Some(cell) = row.get_mut(column.name) {
                // sizes can arrive as floats (e.g. 2048.0)
                if let Ok(value) = cell.parse::<f64>() {
                    *cell = units::format_gb(value as i64, unit);
                }
            }
        }
    }
}

/// Extract, convert and render in one go
pub fn to_table(
    value: &Value,
    spec: &TableSpec,
    requested: &[String],
    headers: bool,
) -> CliResult<String> {
    let columns = spec.select(requested);
    let paths: Vec<(&str, &str)> = columns.iter().map(|c| (c.name, c.path)).collect();

    let mut rows = flatten(value, spec.root, &paths)?;
    convert_sizes(&mut rows, &columns);

    let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
    Ok(render(&names, &rows, headers))
}

/// Lay rows out in aligned columns separated by two spaces
pub fn render(columns: &[&str], rows: &[Row], headers: bool) -> String {
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(*c).map(String::as_str).unwrap_or(""))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| if headers { console::measure_text_width(c) } else { 0 })
        .collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(console::measure_text_width(cell));
        }
    }

    let format_line = |line: &[&str]| {
        let mut out = String::new();
        for (i, (cell, width)) in line.iter().zip(&widths).enumerate() {
            out.push_str(cell);
            if i + 1 < line.len() {
                let pad = width - console::measure_text_width(cell) + 2;
                out.push_str(&" ".repeat(pad));
            }
        }
        out.trim_end().to_string()
    };

    let mut out = String::new();
    if headers {
        out.push_str(&format_line(columns));
        out.push('\n');
    }
    for line in &cells {
        out.push_str(&format_line(line.as_slice()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[Column] = &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("State", "metadata.state"),
        size_col("Ram", "properties.ram", Unit::MB),
    ];

    fn names(cols: &[Column]) -> Vec<&'static str> {
        cols.iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_lookup_nested_and_indexed() {
        let v = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
        assert_eq!(lookup(&v, "a.b.1.c"), Some(&json!(2)));
        assert_eq!(lookup(&v, "a.b.2.c"), None);
        assert_eq!(lookup(&v, "a.x"), None);
        assert_eq!(lookup(&v, ""), Some(&v));
    }

    #[test]
    fn test_flatten_items() {
        let v = json!({"items": [
            {"id": "1", "properties": {"name": "one"}},
            {"id": "2", "properties": {"name": "two"}}
        ]});
        let rows = flatten(&v, "items", &[("Id", "id"), ("Name", "properties.name")]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["Name"], "two");
    }

    #[test]
    fn test_flatten_single_object() {
        let v = json!({"id": "1", "properties": {"tags": ["a", "b"], "on": true, "n": null}});
        let rows = flatten(
            &v,
            "",
            &[("Tags", "properties.tags"), ("On", "properties.on"), ("N", "properties.n")],
        )
        .unwrap();
        assert_eq!(rows[0]["Tags"], "a, b");
        assert_eq!(rows[0]["On"], "true");
        assert_eq!(rows[0]["N"], "");
    }

    #[test]
    fn test_flatten_errors() {
        let v = json!({"items": {"not": "array"}});
        assert!(flatten(&Value::Null, "", &[("Id", "id")]).is_err());
        assert!(flatten(&v, "", &[]).is_err());
        assert!(flatten(&v, "items", &[("Id", "id")]).is_err());
        assert!(matches!(
            flatten(&json!({"id": "1"}), "", &[("Name", "properties.name")]),
            Err(CliError::MissingField { path }) if path == "properties.name"
        ));
    }

    #[test]
    fn test_flatten_missing_field_in_one_element_fails() {
        let v = json!({"items": [{"id": "1"}, {"other": "2"}]});
        assert!(flatten(&v, "items", &[("Id", "id")]).is_err());
    }

    #[test]
    fn test_select_defaults() {
        let cols = select_columns(COLUMNS, &["Id", "State"], &[]);
        assert_eq!(names(&cols), vec!["Id", "State"]);
    }

    #[test]
    fn test_select_requested_drops_unknown() {
        let requested = vec!["state".to_string(), "bogus".to_string(), "ID".to_string()];
        let cols = select_columns(COLUMNS, &["Id"], &requested);
        assert_eq!(names(&cols), vec!["State", "Id"]);
    }

    #[test]
    fn test_select_all_and_only_unknown() {
        let cols = select_columns(COLUMNS, &["Id"], &["ALL".to_string()]);
        assert_eq!(cols.len(), COLUMNS.len());

        let cols = select_columns(COLUMNS, &["Id"], &["nope".to_string()]);
        assert_eq!(names(&cols), vec!["Id"]);
    }

    #[test]
    fn test_convert_sizes_to_gb() {
        let v = json!({"properties": {"ram": 4096}});
        let mut rows = flatten(&v, "", &[("Ram", "properties.ram")]).unwrap();
        convert_sizes(&mut rows, COLUMNS);
        assert_eq!(rows[0]["Ram"], "4 GB");
    }

    #[test]
    fn test_render_aligns_columns() {
        let mut a = Row::new();
        a.insert("Id".into(), "1".into());
        a.insert("Name".into(), "alpha".into());
        let mut b = Row::new();
        b.insert("Id".into(), "22".into());
        b.insert("Name".into(), "b".into());

        let out = render(&["Id", "Name"], &[a, b], true);
        assert_eq!(out, "Id  Name\n1   alpha\n22  b\n");

        let no_headers = render(&["Id"], &[], false);
        assert_eq!(no_headers, "");
    }

    #[test]
    fn test_to_table() {
        let spec = TableSpec {
            root: "items",
            columns: COLUMNS,
            defaults: &["Id", "Ram"],
        };
        let v = json!({"items": [{"id": "a", "properties": {"ram": 2048}}]});
        let out = to_table(&v, &spec, &[], true).unwrap();
        assert_eq!(out, "Id  Ram\na   2 GB\n");
    }
}
