//! Dynamic row items

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// Field holding the stable row id.
pub const ID_FIELD: &str = "id";

/// Field holding the row discriminator.
pub const DISCRIMINATOR_FIELD: &str = "action";

/// A row item: field name to [`Value`].
///
/// Rows deserialize from any JSON object. Nested arrays and objects are kept
/// as their JSON text.
///
/// # Example
///
/// ```
/// use datatable::{Row, RowKind};
///
/// let row = Row::with_id("7")
///     .set("name", "Bob")
///     .set("amount", 5)
///     .set("action", "回费");
///
/// assert_eq!(row.id().as_deref(), Some("7"));
/// assert_eq!(row.kind(), RowKind::Refund);
/// assert_eq!(row.get_str("name").unwrap(), Some("Bob"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, serde_json::Value>",
    into = "BTreeMap<String, Value>"
)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

/// Result of looking a field up: present (possibly null) or absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Present(&'a Value),
    Missing,
}

impl<'a> Field<'a> {
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Field::Present(value) => Some(value),
            Field::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Field::Missing)
    }

    /// Plain text shown in a cell. Falsy and missing values show as empty.
    pub fn cell_text(self) -> String {
        match self {
            Field::Present(value) if !value.is_falsy() => value.display_text(),
            _ => String::new(),
        }
    }

    /// Text matched by search. Missing and null fields have none.
    pub fn search_text(self) -> Option<String> {
        self.value().and_then(Value::search_text)
    }
}

/// Domain classification read from the discriminator field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Opening balance rows; never get action controls.
    Initialization,
    /// Refund rows.
    Refund,
    /// Fee reduction rows.
    FeeReduction,
    Regular,
}

impl RowKind {
    pub const INITIALIZATION: &'static str = "初始化";
    pub const REFUND: &'static str = "回费";
    pub const FEE_REDUCTION: &'static str = "减费";

    pub fn classify(discriminator: Option<&str>) -> Self {
        match discriminator {
            Some(Self::INITIALIZATION) => RowKind::Initialization,
            Some(Self::REFUND) => RowKind::Refund,
            Some(Self::FEE_REDUCTION) => RowKind::FeeReduction,
            _ => RowKind::Regular,
        }
    }

    /// Refund and fee reduction rows: highlighted, no edit controls.
    pub fn is_special(self) -> bool {
        matches!(self, RowKind::Refund | RowKind::FeeReduction)
    }

    pub fn label(self) -> &'static str {
        match self {
            RowKind::Initialization => Self::INITIALIZATION,
            RowKind::Refund => Self::REFUND,
            RowKind::FeeReduction => Self::FEE_REDUCTION,
            RowKind::Regular => "",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowKind::Initialization => "initialization",
            RowKind::Refund => "refund",
            RowKind::FeeReduction => "fee-reduction",
            RowKind::Regular => "regular",
        };
        f.write_str(name)
    }
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row with its id set.
    pub fn with_id(id: impl Into<Value>) -> Self {
        Self::new().set(ID_FIELD, id)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// The row id as text. Text and integer ids are accepted.
    pub fn id(&self) -> Option<String> {
        match self.fields.get(ID_FIELD)? {
            Value::Text(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.fields.get(DISCRIMINATOR_FIELD).and_then(Value::as_str)
    }

    pub fn kind(&self) -> RowKind {
        RowKind::classify(self.discriminator())
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Looks a field up, distinguishing absent fields from null ones.
    pub fn field(&self, field: &str) -> Field<'_> {
        match self.fields.get(field) {
            Some(value) => Field::Present(value),
            None => Field::Missing,
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if the field is missing or of another type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "text", other.type_name())),
        }
    }

    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets a numeric field as `f64`. Integers widen.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)),
            Some(other) => Err(FieldError::type_mismatch(field, "float", other.type_name())),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<BTreeMap<String, serde_json::Value>> for Row {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl From<Row> for BTreeMap<String, Value> {
    fn from(row: Row) -> Self {
        row.fields
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_compare_as_text() {
        assert_eq!(Row::with_id(42).id().as_deref(), Some("42"));
        assert_eq!(Row::new().id(), None);
        assert_eq!(Row::new().set("id", true).id(), None);
    }

    #[test]
    fn test_classify_kinds() {
        let kind = |action: &str| Row::new().set("action", action).kind();
        assert_eq!(kind("初始化"), RowKind::Initialization);
        assert_eq!(kind("回费"), RowKind::Refund);
        assert_eq!(kind("减费"), RowKind::FeeReduction);
        assert_eq!(kind("normal"), RowKind::Regular);
        assert_eq!(Row::new().kind(), RowKind::Regular);
        assert!(RowKind::Refund.is_special());
        assert!(!RowKind::Initialization.is_special());
    }

    #[test]
    fn test_field_sentinel() {
        let row = Row::new().set("note", Value::Null).set("amount", 0);
        assert_eq!(row.field("missing"), Field::Missing);
        assert_eq!(row.field("note"), Field::Present(&Value::Null));
        assert_eq!(row.field("note").cell_text(), "");
        assert_eq!(row.field("amount").cell_text(), "");
        assert_eq!(row.field("note").search_text(), None);
        assert_eq!(row.field("amount").search_text().as_deref(), Some("0"));
    }

    #[test]
    fn test_typed_getters() {
        let row = Row::new().set("name", "Bob").set("amount", 5).set("note", Value::Null);
        assert_eq!(row.get_str("name").unwrap(), Some("Bob"));
        assert_eq!(row.get_f64("amount").unwrap(), Some(5.0));
        assert_eq!(row.get_str("note").unwrap(), None);
        assert_eq!(row.get_str("nope"), Err(FieldError::missing("nope")));
        assert_eq!(
            row.get_bool("amount"),
            Err(FieldError::type_mismatch("amount", "bool", "int"))
        );
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let row: Row = serde_json::from_str(
            r#"{"id": 3, "name": "Al", "amount": 9.5, "tags": ["a"], "meta": {"k": 1}}"#,
        )
        .unwrap();
        assert_eq!(row.id().as_deref(), Some("3"));
        assert_eq!(row.get("amount"), Some(&Value::Float(9.5)));
        assert_eq!(row.get("tags"), Some(&Value::from(r#"["a"]"#)));
        assert_eq!(row.get("meta"), Some(&Value::from(r#"{"k":1}"#)));
    }

    #[test]
    fn test_serialize_round_trips_scalars() {
        let row = Row::with_id("1").set("amount", 5);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"amount":5,"id":"1"}"#);
    }
}
