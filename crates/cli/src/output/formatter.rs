//! Output formatter for human-readable and JSON output
//!
//! In JSON mode the response is printed exactly as the gateway sent it,
//! pretty-printed and without colors.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use console::{Color, style};
use serde::Serialize;
use serde_json::Value;

use super::OutputConfig;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Colors are off in JSON mode and with `--no-color`
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Print an admin API response
    pub fn response(&self, value: &Value) {
        if self.config.quiet {
            return;
        }

        if self.config.json {
            self.json(value);
            return;
        }

        match value {
            Value::Null => self.success("Request completed"),
            other => println!("{}", render_value(other)),
        }
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{} {message}", self.paint("✓", Color::Green));
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            eprintln!("{} {message}", self.paint("✗", Color::Red));
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{} {message}", self.paint("⚠", Color::Yellow));
    }

    /// Output any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colors_enabled() {
            style(text).fg(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

/// Render a response for a terminal
///
/// Objects become a field/value table and arrays of objects a table with one
/// column per key. Nested values are shown as compact JSON inside a cell.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut table = new_table();
            table.set_header(vec!["Field", "Value"]);
            for (key, field) in map {
                table.add_row(vec![key.clone(), cell_text(field)]);
            }
            table.to_string()
        }
        Value::Array(items) if items.is_empty() => "(no results)".to_string(),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let mut columns: Vec<&str> = Vec::new();
            for item in items.iter().filter_map(Value::as_object) {
                for key in item.keys() {
                    if !columns.contains(&key.as_str()) {
                        columns.push(key);
                    }
                }
            }

            let mut table = new_table();
            table.set_header(columns.clone());
            for item in items {
                table.add_row(
                    columns
                        .iter()
                        .map(|column| item.get(*column).map(cell_text).unwrap_or_default())
                        .collect::<Vec<_>>(),
                );
            }
            table.to_string()
        }
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join("\n"),
        scalar => cell_text(scalar),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_formatter_default() {
        let formatter = Formatter::default();
        assert!(!formatter.is_json());
        assert!(!formatter.is_quiet());
        assert!(formatter.colors_enabled());
    }

    #[test]
    fn test_formatter_json_mode() {
        let formatter = Formatter::new(OutputConfig {
            json: true,
            ..Default::default()
        });
        assert!(formatter.is_json());
        assert!(!formatter.colors_enabled());
    }

    #[test]
    fn test_formatter_no_color() {
        let formatter = Formatter::new(OutputConfig {
            no_color: true,
            ..Default::default()
        });
        assert!(!formatter.colors_enabled());
        assert_eq!(formatter.paint("ok", Color::Green), "ok");
    }

    #[test]
    fn test_render_object_as_field_table() {
        let rendered = render_value(&json!({
            "user_id": "abc",
            "max_buckets": 1000,
            "suspended": 0,
            "keys": [{"access_key": "AK"}]
        }));

        assert!(rendered.contains("Field"));
        assert!(rendered.contains("user_id"));
        assert!(rendered.contains("abc"));
        assert!(rendered.contains("1000"));
        assert!(rendered.contains(r#"[{"access_key":"AK"}]"#));
    }

    #[test]
    fn test_render_array_of_objects_uses_union_of_keys() {
        let rendered = render_value(&json!([
            {"bucket": "photos", "num_objects": 3},
            {"bucket": "logs", "owner": "abc"}
        ]));

        let header = rendered.lines().nth(1).unwrap();
        let bucket = header.find("bucket").unwrap();
        let objects = header.find("num_objects").unwrap();
        let owner = header.find("owner").unwrap();
        assert!(bucket < objects && objects < owner);
        assert!(rendered.contains("photos"));
        assert!(rendered.contains("logs"));
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(render_value(&json!("photos")), "photos");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!(["a", "b"])), "a\nb");
        assert_eq!(render_value(&json!([])), "(no results)");
    }
}
