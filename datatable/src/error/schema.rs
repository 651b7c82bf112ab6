//! SchemaError for column list validation

/// Rejected column lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two columns bind the same field.
    #[error("Duplicate column field '{field}' at positions {first} and {second}")]
    DuplicateField {
        field: String,
        first: usize,
        second: usize,
    },

    /// A column has a blank field name.
    #[error("Column {position} has an empty field name")]
    EmptyField { position: usize },
}

impl SchemaError {
    pub fn duplicate_field(field: impl Into<String>, first: usize, second: usize) -> Self {
        Self::DuplicateField {
            field: field.into(),
            first,
            second,
        }
    }

    pub fn empty_field(position: usize) -> Self {
        Self::EmptyField { position }
    }
}
