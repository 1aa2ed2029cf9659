// Output formatting for CLI

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }

    pub fn print_value<T: Serialize>(&self, value: &T) -> Result<()> {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(value)?);
            }
            OutputFormat::Text => {
                // Text format is handled by each command
            }
        }
        Ok(())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// Print a simple key-value pair for text output
pub fn print_field(label: &str, value: &str) {
    println!("{:<14} {}", format!("{}:", label), value);
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    let header: String = columns
        .iter()
        .map(|(name, width)| format!("{:<width$}", name, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header);
}

/// Print a table row
pub fn print_table_row(values: &[(&str, usize)]) {
    let row: String = values
        .iter()
        .map(|(val, width)| format!("{:<width$}", truncate(val, *width), width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", row);
}

/// Print records as a table of the given `(field, header, width)` columns
pub fn print_records(records: &[Value], columns: &[(&str, &str, usize)]) {
    print_table_header(
        &columns
            .iter()
            .map(|(_, header, width)| (*header, *width))
            .collect::<Vec<_>>(),
    );

    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .map(|(field, _, _)| cell(record, field))
            .collect();
        print_table_row(
            &cells
                .iter()
                .zip(columns)
                .map(|(value, (_, _, width))| (value.as_str(), *width))
                .collect::<Vec<_>>(),
        );
    }
}

/// Render one field of a record for a table cell
pub fn cell(record: &Value, field: &str) -> String {
    let value = if field == "id" {
        record.get("_id").or_else(|| record.get("id"))
    } else {
        record.get(field)
    };

    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.replace('\n', " "),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Bool(b)) => (if *b { "yes" } else { "no" }).to_string(),
        Some(other) => other.to_string(),
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width && width > 3 {
        let kept: String = value.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_rendering() {
        let record = json!({
            "_id": "1",
            "tags": ["rust", "sql"],
            "blocked": true,
            "phone": null
        });
        assert_eq!(cell(&record, "id"), "1");
        assert_eq!(cell(&record, "tags"), "rust, sql");
        assert_eq!(cell(&record, "blocked"), "yes");
        assert_eq!(cell(&record, "phone"), "-");
        assert_eq!(cell(&record, "missing"), "-");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Zürich, Switzerland", 10), "Zürich,...");
    }
}
