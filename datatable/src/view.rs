//! View derivation.
//!
//! Everything here is a pure function of the schema, the dataset and the view
//! state. The visible set is a list of indices into the dataset, so deriving a
//! view never clones or mutates rows.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::classes;
use crate::model::{Field, Row};
use crate::schema::Schema;

/// Filter predicate held by the view state.
pub type RowPredicate = Rc<dyn Fn(&Row) -> bool>;

// =============================================================================
// Sort state
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header class marking a column sorted in this direction.
    pub fn marker_class(self) -> &'static str {
        match self {
            SortDirection::Asc => classes::SORT_ASC,
            SortDirection::Desc => classes::SORT_DESC,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The column currently carrying a sort marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Direction the next sort on `field` uses: descending only when `field` is
/// currently sorted ascending.
pub fn next_direction(current: Option<&SortState>, field: &str) -> SortDirection {
    match current {
        Some(state) if state.field == field && state.direction == SortDirection::Asc => {
            SortDirection::Desc
        }
        _ => SortDirection::Asc,
    }
}

// =============================================================================
// Selection
// =============================================================================

pub fn all_indices(data: &[Row]) -> Vec<usize> {
    (0..data.len()).collect()
}

/// Rows satisfying `predicate`, in dataset order.
pub fn filter_indices(data: &[Row], predicate: &dyn Fn(&Row) -> bool) -> Vec<usize> {
    data.iter()
        .enumerate()
        .filter(|(_, row)| predicate(row))
        .map(|(i, _)| i)
        .collect()
}

/// Rows where some schema column contains `keyword`, ignoring case.
///
/// A keyword that is blank after trimming selects every row. Matching uses
/// the lower-cased keyword as given, surrounding whitespace included.
pub fn search_indices(schema: &Schema, data: &[Row], keyword: &str) -> Vec<usize> {
    if keyword.trim().is_empty() {
        return all_indices(data);
    }
    let needle = keyword.to_lowercase();
    data.iter()
        .enumerate()
        .filter(|(_, row)| matches_keyword(schema, row, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Whether any schema column of `row` contains the already lower-cased
/// `needle`. Missing and null fields never match.
pub fn matches_keyword(schema: &Schema, row: &Row, needle: &str) -> bool {
    schema.fields().any(|field| {
        schema
            .cell(row, field)
            .search_text()
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

/// Which rows a view starts from.
#[derive(Clone, Default)]
pub enum RowSelection {
    #[default]
    All,
    Filter(RowPredicate),
    Search(String),
}

impl RowSelection {
    pub fn indices(&self, schema: &Schema, data: &[Row]) -> Vec<usize> {
        match self {
            RowSelection::All => all_indices(data),
            RowSelection::Filter(predicate) => filter_indices(data, predicate.as_ref()),
            RowSelection::Search(keyword) => search_indices(schema, data, keyword),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RowSelection::All)
    }
}

impl fmt::Debug for RowSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSelection::All => f.write_str("All"),
            RowSelection::Filter(_) => f.write_str("Filter(<fn>)"),
            RowSelection::Search(keyword) => f.debug_tuple("Search").field(keyword).finish(),
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Total order on field lookups: missing fields first, then [`Value::sort_cmp`](crate::Value::sort_cmp).
pub fn compare_fields(a: Field<'_>, b: Field<'_>) -> Ordering {
    match (a, b) {
        (Field::Missing, Field::Missing) => Ordering::Equal,
        (Field::Missing, Field::Present(_)) => Ordering::Less,
        (Field::Present(_), Field::Missing) => Ordering::Greater,
        (Field::Present(a), Field::Present(b)) => a.sort_cmp(b),
    }
}

/// Stable in-place sort of `indices` by `field`. Ties keep their order in
/// both directions.
pub fn sort_indices(data: &[Row], indices: &mut [usize], field: &str, direction: SortDirection) {
    let key = |i: usize| data.get(i).map_or(Field::Missing, |row| row.field(field));
    match direction {
        SortDirection::Asc => indices.sort_by(|a, b| compare_fields(key(*a), key(*b))),
        SortDirection::Desc => indices.sort_by(|a, b| compare_fields(key(*b), key(*a))),
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Inputs of a view: which rows, then optionally in which order.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    pub selection: RowSelection,
    pub sort: Option<SortState>,
}

impl ViewQuery {
    pub fn new(selection: RowSelection) -> Self {
        Self {
            selection,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Visible indices for `query`. Sorts on fields that are not sortable
/// columns are ignored.
pub fn derive_view(schema: &Schema, data: &[Row], query: &ViewQuery) -> Vec<usize> {
    let mut indices = query.selection.indices(schema, data);
    if let Some(sort) = &query.sort {
        if schema.is_sortable(&sort.field) {
            sort_indices(data, &mut indices, &sort.field, sort.direction);
        } else {
            log::debug!("ignoring sort on non-sortable field '{}'", sort.field);
        }
    }
    indices
}
