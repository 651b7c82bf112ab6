//! Column definitions.

use std::fmt;
use std::rc::Rc;

use crate::error::SchemaError;
use crate::model::{Field, Row};

/// Per-cell render transform. Receives the row and its position in the
/// visible set; the returned string is parsed as inline markup.
pub type CellRenderer = Rc<dyn Fn(&Row, usize) -> String>;

/// One column of a [`Schema`].
#[derive(Clone)]
pub struct Column {
    pub field: String,
    pub title: String,
    pub sortable: bool,
    pub render: Option<CellRenderer>,
}

impl Column {
    /// A sortable column showing the raw field value.
    pub fn new(field: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            title: title.into(),
            sortable: true,
            render: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn unsortable(self) -> Self {
        self.sortable(false)
    }

    /// Render cells through `render` instead of showing the raw value.
    pub fn render(mut self, render: impl Fn(&Row, usize) -> String + 'static) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn has_renderer(&self) -> bool {
        self.render.is_some()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Ordered, immutable list of columns with unique fields.
///
/// Cloning a schema shares the column list.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Rc<[Column]>,
}

impl Schema {
    /// Validates and freezes a column list.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        for (position, column) in columns.iter().enumerate() {
            if column.field.trim().is_empty() {
                return Err(SchemaError::empty_field(position));
            }
            if let Some(first) = columns[..position]
                .iter()
                .position(|c| c.field == column.field)
            {
                return Err(SchemaError::duplicate_field(&column.field, first, position));
            }
        }
        Ok(Self {
            columns: columns.into(),
        })
    }

    /// Builds a schema without failing. Blank and repeated fields are dropped
    /// with a warning; the first occurrence of a field wins.
    pub fn from_columns_lossy(columns: Vec<Column>) -> Self {
        let mut kept: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns {
            if column.field.trim().is_empty() {
                log::warn!("dropping column '{}' with an empty field", column.title);
            } else if kept.iter().any(|c| c.field == column.field) {
                log::warn!("dropping duplicate column for field '{}'", column.field);
            } else {
                kept.push(column);
            }
        }
        Self {
            columns: kept.into(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field == field)
    }

    /// Whether `field` names a column declared sortable.
    pub fn is_sortable(&self, field: &str) -> bool {
        self.column(field).is_some_and(|c| c.sortable)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.field.as_str())
    }

    /// Schema-validated field access: fields outside the schema read as
    /// [`Field::Missing`] even when the row carries them.
    pub fn cell<'r>(&self, row: &'r Row, field: &str) -> Field<'r> {
        if self.column(field).is_some() {
            row.field(field)
        } else {
            Field::Missing
        }
    }
}

impl TryFrom<Vec<Column>> for Schema {
    type Error = SchemaError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("amount", "Amount"),
            Column::new("note", "Note").unsortable(),
        ]
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut cols = columns();
        cols.push(Column::new("amount", "Again"));
        let err = Schema::new(cols).unwrap_err();
        assert_eq!(err, SchemaError::duplicate_field("amount", 1, 3));
    }

    #[test]
    fn test_empty_field_rejected() {
        let err = Schema::new(vec![Column::new(" ", "Blank")]).unwrap_err();
        assert_eq!(err, SchemaError::empty_field(0));
    }

    #[test]
    fn test_lossy_keeps_first_occurrence() {
        let mut cols = columns();
        cols.push(Column::new("name", "Second name"));
        let schema = Schema::from_columns_lossy(cols);
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.column("name").unwrap().title, "Name");
    }

    #[test]
    fn test_sortability() {
        let schema = Schema::new(columns()).unwrap();
        assert!(schema.is_sortable("amount"));
        assert!(!schema.is_sortable("note"));
        assert!(!schema.is_sortable("unknown"));
    }

    #[test]
    fn test_cell_outside_schema_is_missing() {
        let schema = Schema::new(columns()).unwrap();
        let row = Row::with_id("1").set("name", "Bob").set("secret", "x");
        assert_eq!(schema.cell(&row, "secret"), Field::Missing);
        assert_eq!(schema.cell(&row, "amount"), Field::Missing);
        assert!(!schema.cell(&row, "name").is_missing());
    }
}
