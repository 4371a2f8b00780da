use std::io::Read;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a gateway or service result.
///
/// JSON mode prints the value as is; text mode prints one line per record
/// with its id and a short label.
pub fn output_data<T: Serialize>(output_format: &OutputFormat, data: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(data)?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => {
            let inner = value.get("data").unwrap_or(&value);
            match inner {
                Value::Array(records) if records.is_empty() => println!("No records"),
                Value::Array(records) => {
                    for record in records {
                        println!("{}", record_line(record));
                    }
                }
                other => println!("{}", record_line(other)),
            }
            if let Some(total) = value.get("total") {
                println!("Total: {}", total);
            }
        }
    }
    Ok(())
}

fn record_line(record: &Value) -> String {
    let Some(obj) = record.as_object() else {
        return record.to_string();
    };
    let id = obj.get("id").map(value_text).unwrap_or_else(|| "-".to_string());
    let label = ["name", "username", "email", "firstname", "uri"]
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()).map(value_text));
    match label {
        Some(label) => format!("{}\t{}", id, label),
        None => id,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a JSON document from stdin
pub fn read_stdin_json() -> anyhow::Result<Value> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Err(anyhow::anyhow!("Expected a JSON document on stdin"));
    }
    serde_json::from_str(&input).map_err(|e| anyhow::anyhow!("Invalid JSON on stdin: {}", e))
}

/// Parse a `--filter` argument; absent means no filter
pub fn parse_filter(filter: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    match filter {
        None => Ok(Map::new()),
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(map),
            other => Err(anyhow::anyhow!("Filter must be a JSON object, got {}", other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert!(parse_filter(None).unwrap().is_empty());
        let filter = parse_filter(Some(r#"{"status":"active","meta":{"a":1}}"#)).unwrap();
        assert_eq!(filter.keys().collect::<Vec<_>>(), vec!["status", "meta"]);
        assert!(parse_filter(Some("[1,2]")).is_err());
        assert!(parse_filter(Some("{oops")).is_err());
    }

    #[test]
    fn test_record_line_prefers_name_fields() {
        assert_eq!(record_line(&json!({"id": 3, "username": "ann"})), "3\tann");
        assert_eq!(record_line(&json!({"id": "x", "name": null, "email": "a@b.c"})), "x\ta@b.c");
        assert_eq!(record_line(&json!({"id": 9})), "9");
        assert_eq!(record_line(&json!(4)), "4");
    }
}
