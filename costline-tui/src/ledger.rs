//! Ledger loading.
//!
//! A ledger file is a JSON array of flat objects. Each object becomes a
//! [`Row`]; objects without an `id` get a fresh UUID so the table can address
//! them.

use std::fs;
use std::path::Path;

use datatable::{Column, ID_FIELD, Row, Schema};

use crate::error::AppError;

/// Read and parse a ledger file.
pub fn load(path: &Path) -> Result<Vec<Row>, AppError> {
    let source = fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&source).map_err(|e| AppError::json(path, e))?;
    let rows = from_json(value)?;
    log::info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Convert a parsed JSON document into rows.
pub fn from_json(value: serde_json::Value) -> Result<Vec<Row>, AppError> {
    let serde_json::Value::Array(items) = value else {
        return Err(AppError::shape("expected a top-level array of objects"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            serde_json::Value::Object(map) => Ok(with_id(Row::from(map))),
            other => Err(AppError::shape(format!(
                "entry {position} is {}, expected an object",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn with_id(mut row: Row) -> Row {
    if row.id().is_none() {
        let id = uuid::Uuid::new_v4().to_string();
        log::debug!("assigning id {id} to row without one");
        row.insert(ID_FIELD, id);
    }
    row
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Columns shown for a ledger.
pub fn schema() -> Schema {
    Schema::from_columns_lossy(vec![
        Column::new("date", "Date"),
        Column::new("name", "Item"),
        Column::new("action", "Kind"),
        Column::new("amount", "Amount"),
        Column::new("memo", "Memo").unsortable(),
    ])
}

/// Ledger used when no file is given.
pub fn sample() -> Vec<Row> {
    [
        ("2024-01-02", "Opening balance", "初始化", 1200.0, ""),
        ("2024-01-05", "Office rent", "normal", -850.0, "January"),
        ("2024-01-09", "Cloud hosting", "normal", -42.5, ""),
        ("2024-01-12", "Hosting refund", "回费", 12.5, "billing error"),
        ("2024-01-15", "Consulting", "normal", 640.0, "ACME"),
        ("2024-01-18", "Card fee waiver", "减费", 8.0, ""),
        ("2024-01-22", "Coffee beans", "normal", -18.9, "kitchen"),
        ("2024-01-28", "Domain renewal", "normal", -15.0, ""),
    ]
    .into_iter()
    .map(|(date, name, action, amount, memo)| {
        with_id(
            Row::new()
                .set("date", date)
                .set("name", name)
                .set("action", action)
                .set("amount", amount)
                .set("memo", memo),
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use datatable::RowKind;

    use super::*;

    #[test]
    fn test_sample_covers_every_kind() {
        let rows = sample();
        for kind in [
            RowKind::Initialization,
            RowKind::Refund,
            RowKind::FeeReduction,
            RowKind::Regular,
        ] {
            assert!(rows.iter().any(|row| row.kind() == kind), "{kind:?} missing");
        }
        assert!(rows.iter().all(|row| row.id().is_some()));
    }

    #[test]
    fn test_sample_fields_are_in_schema() {
        let schema = schema();
        for field in ["date", "name", "action", "amount", "memo"] {
            assert!(schema.position(field).is_some(), "{field}");
        }
        assert!(!schema.is_sortable("memo"));
    }
}
