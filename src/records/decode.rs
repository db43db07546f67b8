//! Query result decoding.
//!
//! The backend answers either with a columnar result set (row 0 holds the
//! column names, each later row one cell per column) or with a plain JSON
//! array of flat objects. Both are normalized into a sequence of [`Record`]s.
//! Decoding never fails: anything that matches neither shape yields no records.

use serde::Deserialize;
use serde_json::Value;

use super::models::Record;

#[derive(Debug, Deserialize)]
struct ColumnarEnvelope {
    #[serde(rename = "ResultSet")]
    result_set: ResultSet,
}

#[derive(Debug, Default, Deserialize)]
struct ResultSet {
    #[serde(rename = "Rows", default)]
    rows: Vec<Row>,
}

#[derive(Debug, Default, Deserialize)]
struct Row {
    #[serde(rename = "Data", default)]
    data: Vec<Option<Cell>>,
}

/// A single cell. Null cells and non-string values are accepted.
#[derive(Debug, Default, Deserialize)]
struct Cell {
    #[serde(rename = "VarCharValue", default)]
    value: Option<Value>,
}

fn cell_text(cell: Option<Cell>) -> String {
    cell.and_then(|c| c.value)
        .map(|v| value_text(&v))
        .unwrap_or_default()
}

/// Decode a response body into records.
pub fn decode_envelope(body: &Value) -> Vec<Record> {
    if body.get("ResultSet").is_some() {
        return match ColumnarEnvelope::deserialize(body) {
            Ok(envelope) => decode_rows(envelope.result_set.rows),
            Err(e) => {
                tracing::debug!("Decoder: malformed ResultSet, treating as empty: {}", e);
                Vec::new()
            }
        };
    }

    match body {
        Value::Array(items) => items.iter().map(flatten_object).collect(),
        _ => {
            tracing::debug!("Decoder: unrecognised response shape, treating as empty");
            Vec::new()
        }
    }
}

fn decode_rows(rows: Vec<Row>) -> Vec<Record> {
    if rows.len() < 2 {
        return Vec::new();
    }

    let mut rows = rows.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.data.into_iter().map(cell_text).collect(),
        None => return Vec::new(),
    };

    rows.map(|row| {
        let mut cells = row.data.into_iter();
        headers
            .iter()
            .map(|h| {
                let value = cells.next().map(cell_text).unwrap_or_default();
                (h.clone(), value)
            })
            .collect::<Record>()
    })
    .collect()
}

/// Pass a flat object through as a record, rendering non-string values as JSON text.
fn flatten_object(item: &Value) -> Record {
    match item {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect(),
        _ => Record::new(),
    }
}

/// Strings as-is, null as empty, anything else as its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cells: &[&str]) -> Value {
        json!({ "Data": cells.iter().map(|c| json!({ "VarCharValue": c })).collect::<Vec<_>>() })
    }

    #[test]
    fn test_decode_columnar() {
        let body = json!({
            "ResultSet": { "Rows": [
                row(&["severity", "region"]),
                row(&["8.5", "us-east-1"]),
                row(&["2", "eu-west-1"]),
            ]}
        });

        let records = decode_envelope(&body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("severity"), Some("8.5"));
        assert_eq!(records[0].get("region"), Some("us-east-1"));
        assert_eq!(records[1].get("severity"), Some("2"));
        assert_eq!(records[1].get("region"), Some("eu-west-1"));
        for record in &records {
            assert_eq!(record.keys().collect::<Vec<_>>(), vec!["severity", "region"]);
        }
    }

    #[test]
    fn test_decode_header_only_or_empty() {
        let header_only = json!({ "ResultSet": { "Rows": [row(&["a", "b"])] } });
        assert!(decode_envelope(&header_only).is_empty());

        let empty = json!({ "ResultSet": { "Rows": [] } });
        assert!(decode_envelope(&empty).is_empty());

        let no_rows = json!({ "ResultSet": {} });
        assert!(decode_envelope(&no_rows).is_empty());
    }

    #[test]
    fn test_decode_missing_cells_default_to_empty() {
        let body = json!({
            "ResultSet": { "Rows": [
                row(&["eventname", "username", "errorcode"]),
                { "Data": [ { "VarCharValue": "ConsoleLogin" }, {} ] },
            ]}
        });

        let records = decode_envelope(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("eventname"), Some("ConsoleLogin"));
        assert_eq!(records[0].get("username"), Some(""));
        assert_eq!(records[0].get("errorcode"), Some(""));
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn test_decode_null_cell_keeps_rows() {
        let body = json!({
            "ResultSet": { "Rows": [
                row(&["severity", "region"]),
                { "Data": [ { "VarCharValue": "8.5" }, null ] },
                { "Data": [ { "VarCharValue": 2 }, { "VarCharValue": null } ] },
                row(&["4", "eu-west-1"]),
            ]}
        });

        let records = decode_envelope(&body);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("severity"), Some("8.5"));
        assert_eq!(records[0].get("region"), Some(""));
        assert_eq!(records[1].get("severity"), Some("2"));
        assert_eq!(records[1].get("region"), Some(""));
        assert_eq!(records[2].get("region"), Some("eu-west-1"));
    }

    #[test]
    fn test_decode_header_cell_without_value() {
        let body = json!({
            "ResultSet": { "Rows": [
                { "Data": [ { "VarCharValue": "action" }, {} ] },
                row(&["ACCEPT", "x"]),
            ]}
        });

        let records = decode_envelope(&body);
        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["action", ""]);
        assert_eq!(records[0].get(""), Some("x"));
    }

    #[test]
    fn test_decode_flat_array_passes_through() {
        let body = json!([
            { "action": "ACCEPT", "bytes": 1200, "note": null },
            { "action": "REJECT", "bytes": 40, "note": "probe" },
        ]);

        let records = decode_envelope(&body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["action", "bytes", "note"]);
        assert_eq!(records[0].get("bytes"), Some("1200"));
        assert_eq!(records[0].get("note"), Some(""));
        assert_eq!(records[1].get("note"), Some("probe"));

        let again = decode_envelope(&serde_json::to_value(&records).unwrap());
        assert_eq!(again, records);
    }

    #[test]
    fn test_decode_unknown_shapes() {
        assert!(decode_envelope(&json!({ "items": [] })).is_empty());
        assert!(decode_envelope(&json!("text")).is_empty());
        assert!(decode_envelope(&json!({ "ResultSet": { "Rows": "nope" } })).is_empty());
        assert!(decode_envelope(&Value::Null).is_empty());
    }
}
