use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use shapecast_transform::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print a transformed value.
///
/// `Table` lays out the top level of objects and arrays as rows; `Raw` prints
/// strings without quotes.
pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => println!("{}", pretty(value)),
        OutputFormat::Raw => match value {
            Value::String(text) => println!("{text}"),
            other => println!("{other}"),
        },
        OutputFormat::Table => match value {
            Value::Object(map) => {
                let rows = map.iter().map(|(key, value)| vec![key.clone(), cell(value)]);
                println!("{}", table(vec!["KEY", "VALUE"], rows));
            }
            Value::Array(items) => {
                let rows = items
                    .iter()
                    .enumerate()
                    .map(|(index, value)| vec![index.to_string(), cell(value)]);
                println!("{}", table(vec!["INDEX", "VALUE"], rows));
            }
            other => println!("{}", cell(other)),
        },
    }
}

/// Print any serializable report as JSON (compact or pretty).
pub fn print_json<T: Serialize>(value: &T, format: OutputFormat) {
    let rendered = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
        _ => serde_json::to_string(value),
    };
    println!("{}", rendered.unwrap_or_else(|_| "{}".to_string()));
}

pub fn table<R>(header: Vec<&str>, rows: R) -> Table
where
    R: IntoIterator<Item = Vec<String>>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for row in rows {
        table.add_row(row);
    }
    table
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(_) | Value::Object(_) => pretty(value),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cells_unquote_strings_and_expand_containers() {
        assert_eq!(cell(&Value::from("Austin")), "Austin");
        assert_eq!(cell(&Value::from(true)), "true");
        assert!(cell(&Value::from(&json!({"a": 1}))).contains("\"a\": 1"));
    }

    #[test]
    fn table_has_one_row_per_entry() {
        let rendered = table(
            vec!["KEY", "VALUE"],
            vec![
                vec!["a".to_string(), "1".to_string()],
                vec!["b".to_string(), "2".to_string()],
            ],
        )
        .to_string();
        assert!(rendered.contains("KEY"));
        assert!(rendered.contains('b'));
    }
}
