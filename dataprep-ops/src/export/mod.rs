//! Table serialization operations
//!
//! Exports are report-producing: the rendered document travels in the report
//! rather than replacing the working table.

use dataprep_core::{Error, OpOutput, OpSpec, Operation, Params, Result, Table, Value};
use dataprep_core::Registration;
use serde_json::json;

/// Registry descriptor for [`ExportCsv`]
pub const CSV_SPEC: OpSpec = OpSpec {
    key: "export_csv",
    description: "Renders the table as a CSV document",
    parameters: &[("delimiter", "Single-character field delimiter (default: ,)")],
};

/// Registry descriptor for [`ExportJson`]
pub const JSON_SPEC: OpSpec = OpSpec {
    key: "export_json",
    description: "Renders the table as a JSON array of records",
    parameters: &[("pretty", "Pretty-print the output (default: false)")],
};

/// The built-in export registrations
pub fn registrations() -> Vec<Registration> {
    vec![
        Registration::new(CSV_SPEC, || Box::new(ExportCsv)),
        Registration::new(JSON_SPEC, || Box::new(ExportJson)),
    ]
}

fn export_report(table: &Table, format: &str, content: String) -> serde_json::Value {
    json!({
        "format": format,
        "rows": table.row_count(),
        "columns": table.column_count(),
        "content": content,
    })
}

/// Renders the table as CSV with a header row, nulls as empty fields
pub struct ExportCsv;

impl Operation for ExportCsv {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let delimiter = params.str_or("delimiter", ",")?;
        let delimiter = match delimiter.as_bytes() {
            [b] => *b,
            _ => {
                return Err(Error::InvalidParameter(format!(
                    "invalid 'delimiter' value '{}': must be a single character",
                    delimiter
                )))
            }
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());
        writer
            .write_record(table.column_names())
            .map_err(|e| Error::Internal(e.to_string()))?;
        for row in 0..table.row_count() {
            let record: Vec<String> = table
                .columns()
                .iter()
                .map(|column| csv_cell(&column.values()[row]))
                .collect();
            writer
                .write_record(&record)
                .map_err(|e| Error::Internal(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Internal(e.to_string()))?;
        let content =
            String::from_utf8(bytes).map_err(|e| Error::Internal(e.to_string()))?;
        Ok(OpOutput::Report(export_report(table, "csv", content)))
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Str(s) => s.clone(),
    }
}

/// Renders the table as a JSON array of row objects, nulls as JSON `null`
pub struct ExportJson;

impl Operation for ExportJson {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let pretty = params.bool_or("pretty", false)?;

        let records: Vec<serde_json::Value> = (0..table.row_count())
            .map(|row| {
                let mut record = serde_json::Map::new();
                for column in table.columns() {
                    record.insert(
                        column.name().to_string(),
                        column.values()[row].to_json(),
                    );
                }
                serde_json::Value::Object(record)
            })
            .collect();

        let content = if pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        };
        Ok(OpOutput::Report(export_report(table, "json", content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataprep_core::Column;
    use serde_json::Map;

    fn report(
        op: &dyn Operation,
        table: &Table,
        params_json: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let map: Map<String, serde_json::Value> = serde_json::from_value(params_json).unwrap();
        Ok(op.apply(table, &Params::new(&map))?.into_report().unwrap())
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("name", vec!["ada".into(), "bob".into()]),
            Column::new("age", vec![36i64.into(), Value::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_renders_nulls_empty() {
        let report = report(&ExportCsv, &sample(), serde_json::json!({})).unwrap();
        assert_eq!(report["format"], "csv");
        assert_eq!(report["rows"], 2);
        assert_eq!(report["columns"], 2);
        assert_eq!(
            report["content"].as_str().unwrap(),
            "name,age\nada,36\nbob,\n"
        );
    }

    #[test]
    fn test_csv_custom_delimiter() {
        let report =
            report(&ExportCsv, &sample(), serde_json::json!({"delimiter": ";"})).unwrap();
        assert!(report["content"].as_str().unwrap().starts_with("name;age\n"));
    }

    #[test]
    fn test_csv_invalid_delimiter_rejected() {
        let err =
            report(&ExportCsv, &sample(), serde_json::json!({"delimiter": "--"})).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_json_records() {
        let report = report(&ExportJson, &sample(), serde_json::json!({})).unwrap();
        assert_eq!(report["format"], "json");
        let records: serde_json::Value =
            serde_json::from_str(report["content"].as_str().unwrap()).unwrap();
        assert_eq!(records[0]["name"], "ada");
        assert_eq!(records[0]["age"], 36);
        assert!(records[1]["age"].is_null());
    }

    #[test]
    fn test_json_pretty() {
        let report =
            report(&ExportJson, &sample(), serde_json::json!({"pretty": true})).unwrap();
        assert!(report["content"].as_str().unwrap().contains('\n'));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_columns(vec![Column::new("a", vec![])]).unwrap();
        let report = report(&ExportCsv, &table, serde_json::json!({})).unwrap();
        assert_eq!(report["content"].as_str().unwrap(), "a\n");
    }
}
