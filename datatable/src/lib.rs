//! Sortable, filterable data tables on a [`tabledom::Document`].
//!
//! A [`DataTable`] owns a [`Schema`] of columns and a shared dataset of
//! [`Row`]s. It derives the visible set from the active filter or search
//! keyword and the active sort (see [`view`]), then rebuilds the table body on
//! the document, with per-row action controls chosen by the row's
//! discriminator.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use datatable::{Column, DataTable, Row, Schema, TableOptions};
//! use tabledom::{Document, Tag};
//!
//! let document = Rc::new(RefCell::new(Document::new()));
//! {
//!     let mut doc = document.borrow_mut();
//!     let table = doc.create_element(Tag::Table);
//!     doc.set_id(table, "ledger");
//!     let root = doc.root();
//!     doc.append_child(root, table);
//! }
//!
//! let schema = Schema::new(vec![
//!     Column::new("name", "Name"),
//!     Column::new("amount", "Amount"),
//! ])
//! .unwrap();
//! let mut table = DataTable::new(document, "ledger", schema, TableOptions::default());
//!
//! table.set_data(vec![
//!     Row::with_id("1").set("name", "Bob").set("amount", 5),
//!     Row::with_id("2").set("name", "Al").set("amount", 9),
//! ]);
//! table.sort_by("amount");
//! table.sort_by("amount");
//! let names: Vec<_> = table
//!     .visible_rows()
//!     .iter()
//!     .map(|row| row.get_str("name").unwrap().unwrap_or_default())
//!     .collect();
//! assert_eq!(names, ["Al", "Bob"]);
//! ```

pub mod action;
pub mod classes;
pub mod error;
pub mod model;
pub mod options;
mod render;
pub mod schema;
mod table;
pub mod view;

pub use action::{ActionCallback, ActionCell, ActionDescriptor, action_cell};
pub use error::{FieldError, SchemaError, TableError};
pub use model::{DISCRIMINATOR_FIELD, Field, ID_FIELD, Row, RowKind, Value};
pub use options::{RenderCompleteCallback, RowClickCallback, TableOptions};
pub use schema::{CellRenderer, Column, Schema};
pub use table::{DataTable, Interaction};
pub use view::{RowPredicate, RowSelection, SortDirection, SortState, ViewQuery, derive_view};
