//! The table component.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tabledom::{Document, EventKind, HandlerId, NodeId};

use crate::classes;
use crate::error::TableError;
use crate::model::{ID_FIELD, Row};
use crate::options::TableOptions;
use crate::render::{self, Binding, Mount};
use crate::schema::Schema;
use crate::view::{
    self, RowPredicate, RowSelection, SortDirection, SortState, ViewQuery, derive_view,
};

/// What [`DataTable::dispatch_click`] did with a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// A header click sorted the table.
    Sorted {
        field: String,
        direction: SortDirection,
    },
    /// The row click callback ran.
    RowClicked { id: Option<String>, index: usize },
    /// An action callback ran. `action` is its position in the configured
    /// action list.
    ActionInvoked {
        id: Option<String>,
        index: usize,
        action: usize,
        class_name: String,
    },
    /// Nothing of this table was under the click.
    Ignored,
}

impl Interaction {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Interaction::Ignored)
    }
}

/// A sortable, filterable table bound to an element of a shared [`Document`].
///
/// Every mutation (`set_data`, `sort_by`, `filter`, `search`, `refresh`)
/// rebuilds the table body before returning. Callbacks from the options run
/// synchronously and must not call back into the same table; act on the
/// returned [`Interaction`] instead.
///
/// A table whose mount element was missing at construction is inert: it keeps
/// data and view state but paints nothing.
pub struct DataTable {
    document: Rc<RefCell<Document>>,
    target_id: String,
    schema: Schema,
    options: TableOptions,
    mount: Option<Mount>,

    data: Rc<[Row]>,
    visible: Vec<usize>,
    selection: RowSelection,
    sort: Option<SortState>,

    header_bindings: HashMap<HandlerId, Binding>,
    row_bindings: HashMap<HandlerId, Binding>,
}

impl DataTable {
    /// Mounts a table on the element with id `target_id`.
    ///
    /// A missing target is logged and leaves the table inert.
    pub fn new(
        document: Rc<RefCell<Document>>,
        target_id: impl Into<String>,
        schema: Schema,
        options: TableOptions,
    ) -> Self {
        let target_id = target_id.into();
        let mounted = Self::try_mount(
            Rc::clone(&document),
            target_id.clone(),
            schema.clone(),
            options.clone(),
        );
        match mounted {
            Ok(table) => table,
            Err(err) => {
                log::error!("{err}");
                Self::inert(document, target_id, schema, options)
            }
        }
    }

    /// Mounts a table, failing when no element has id `target_id`.
    pub fn try_mount(
        document: Rc<RefCell<Document>>,
        target_id: impl Into<String>,
        schema: Schema,
        options: TableOptions,
    ) -> Result<Self, TableError> {
        let target_id = target_id.into();
        let (mount, header_bindings) = {
            let mut doc = document
                .try_borrow_mut()
                .map_err(|_| TableError::DocumentBorrowed)?;
            let table = doc
                .element_by_id(&target_id)
                .ok_or_else(|| TableError::mount_target_missing(&target_id))?;
            render::setup(&mut doc, table, &schema, &options)
        };
        log::debug!(
            "mounted table '{}' with {} columns",
            target_id,
            schema.len()
        );

        let mut table = Self::inert(document, target_id, schema, options);
        table.mount = Some(mount);
        table.header_bindings = header_bindings;
        Ok(table)
    }

    fn inert(
        document: Rc<RefCell<Document>>,
        target_id: String,
        schema: Schema,
        options: TableOptions,
    ) -> Self {
        Self {
            document,
            target_id,
            schema,
            options,
            mount: None,
            data: Rc::from(Vec::new()),
            visible: Vec::new(),
            selection: RowSelection::All,
            sort: None,
            header_bindings: HashMap::new(),
            row_bindings: HashMap::new(),
        }
    }

    // =========================================================================
    // Public contract
    // =========================================================================

    /// Replaces the dataset and shows all of it.
    pub fn set_data(&mut self, rows: impl Into<Rc<[Row]>>) {
        self.data = rows.into();
        self.selection = RowSelection::All;
        self.recompute();
        log::debug!("table '{}' holds {} rows", self.target_id, self.data.len());
        self.render();
    }

    /// Sorts the visible rows by `field`, toggling direction on repeated calls.
    ///
    /// Returns `false` without changing anything when `field` is not a
    /// sortable column.
    pub fn sort_by(&mut self, field: &str) -> bool {
        if !self.schema.is_sortable(field) {
            log::debug!("ignoring sort on '{field}': not a sortable column");
            return false;
        }
        let direction = view::next_direction(self.sort.as_ref(), field);
        view::sort_indices(&self.data, &mut self.visible, field, direction);
        self.sort = Some(SortState::new(field, direction));
        log::debug!("sorted table '{}' by {field} {direction}", self.target_id);
        self.render();
        true
    }

    /// Shows the rows of the full dataset for which `predicate` holds.
    pub fn filter(&mut self, predicate: impl Fn(&Row) -> bool + 'static) {
        self.filter_with(Some(Rc::new(predicate)));
    }

    /// Like [`filter`](Self::filter); `None` shows the full dataset.
    pub fn filter_with(&mut self, predicate: Option<RowPredicate>) {
        self.selection = match predicate {
            Some(predicate) => RowSelection::Filter(predicate),
            None => RowSelection::All,
        };
        self.recompute();
        self.render();
    }

    pub fn clear_filter(&mut self) {
        self.filter_with(None);
    }

    /// Shows rows where some column contains `keyword`, ignoring case. A blank
    /// keyword shows the full dataset.
    pub fn search(&mut self, keyword: &str) {
        self.selection = if keyword.trim().is_empty() {
            RowSelection::All
        } else {
            RowSelection::Search(keyword.to_string())
        };
        self.recompute();
        log::debug!(
            "search {:?} on table '{}' matched {} rows",
            keyword,
            self.target_id,
            self.visible.len()
        );
        self.render();
    }

    /// Re-renders the current view.
    pub fn refresh(&mut self) {
        self.render();
    }

    /// Dataset rows whose rendered `tr` carries the `selected` class, in
    /// rendered order. Rows whose id no longer resolves are skipped.
    pub fn selected_rows(&self) -> Vec<&Row> {
        let Some(mount) = &self.mount else {
            return Vec::new();
        };
        let Ok(doc) = self.document.try_borrow() else {
            log::warn!("document is mutably borrowed; no selection read");
            return Vec::new();
        };
        doc.children(mount.tbody)
            .iter()
            .filter_map(|tr| doc.get(*tr))
            .filter(|tr| tr.has_class(classes::SELECTED))
            .filter_map(|tr| tr.data(ID_FIELD))
            .filter_map(|id| self.data.iter().find(|row| row.id().as_deref() == Some(id)))
            .collect()
    }

    /// Routes a click on `target` through the handlers bound by this table.
    ///
    /// Handlers run innermost first. An action control stops the click before
    /// it reaches the row, so at most one callback runs per click.
    pub fn dispatch_click(&mut self, target: NodeId) -> Interaction {
        let handlers = match self.document.try_borrow() {
            Ok(doc) => doc.handlers_along(target, EventKind::Click),
            Err(_) => {
                log::warn!("document is mutably borrowed; dropping click on {target}");
                return Interaction::Ignored;
            }
        };

        for (_, handler) in handlers {
            let binding = self
                .header_bindings
                .get(&handler)
                .or_else(|| self.row_bindings.get(&handler))
                .cloned();
            let Some(binding) = binding else {
                continue;
            };
            return self.run_binding(binding);
        }
        Interaction::Ignored
    }

    fn run_binding(&mut self, binding: Binding) -> Interaction {
        let data = Rc::clone(&self.data);
        match binding {
            Binding::Sort(field) => {
                self.sort_by(&field);
                let direction = self.sort.as_ref().map(|s| s.direction).unwrap_or_default();
                Interaction::Sorted { field, direction }
            }
            Binding::Action { index, row, action } => {
                let (Some(item), Some(descriptor)) =
                    (data.get(row), self.options.actions.get(action).cloned())
                else {
                    return Interaction::Ignored;
                };
                log::debug!("action '{}' on row {index}", descriptor.class_name);
                descriptor.invoke(item, index);
                Interaction::ActionInvoked {
                    id: item.id(),
                    index,
                    action,
                    class_name: descriptor.class_name,
                }
            }
            Binding::Row { index, row } => {
                let (Some(item), Some(callback)) = (data.get(row), self.options.on_row_click.clone())
                else {
                    return Interaction::Ignored;
                };
                callback(item, index);
                Interaction::RowClicked {
                    id: item.id(),
                    index,
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Visible rows in display order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visible
            .iter()
            .filter_map(|i| self.data.get(*i))
            .collect()
    }

    /// Visible rows as dataset indices.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn data(&self) -> &Rc<[Row]> {
        &self.data
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    /// The mount element.
    pub fn table_node(&self) -> Option<NodeId> {
        self.mount.as_ref().map(|m| m.table)
    }

    pub fn body_node(&self) -> Option<NodeId> {
        self.mount.as_ref().map(|m| m.tbody)
    }

    /// Header cell of `field`.
    pub fn header_cell(&self, field: &str) -> Option<NodeId> {
        self.mount.as_ref()?.header(field)
    }

    pub fn action_header(&self) -> Option<NodeId> {
        self.mount.as_ref()?.action_header
    }

    /// Every `tr` currently in the body, the empty-state row included.
    pub fn rendered_rows(&self) -> Vec<NodeId> {
        let Some(mount) = &self.mount else {
            return Vec::new();
        };
        self.document
            .try_borrow()
            .map(|doc| doc.children(mount.tbody).to_vec())
            .unwrap_or_default()
    }

    /// Rendered `tr` of the row with `id`.
    pub fn row_node(&self, id: &str) -> Option<NodeId> {
        let mount = self.mount.as_ref()?;
        let doc = self.document.try_borrow().ok()?;
        doc.children(mount.tbody)
            .iter()
            .copied()
            .find(|tr| doc.get(*tr).and_then(|e| e.data(ID_FIELD)) == Some(id))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn recompute(&mut self) {
        let sort = if self.options.resort_after_filter {
            self.sort.clone()
        } else {
            None
        };
        let query = ViewQuery {
            selection: self.selection.clone(),
            sort,
        };
        self.visible = derive_view(&self.schema, &self.data, &query);
    }

    fn render(&mut self) {
        let Some(mount) = &self.mount else {
            log::trace!("table '{}' is inert; skipping render", self.target_id);
            return;
        };

        // Render transforms run before the document is borrowed.
        let models = render::row_models(&self.schema, &self.options, &self.data, &self.visible);

        let outcome = {
            let Ok(mut doc) = self.document.try_borrow_mut() else {
                log::error!(
                    "document is borrowed elsewhere; table '{}' not rendered",
                    self.target_id
                );
                return;
            };
            render::apply_sort_markers(&mut doc, mount, self.sort.as_ref());
            render::render_body(&mut doc, mount, &self.schema, &self.options, &models)
        };
        self.row_bindings = outcome.bindings;

        if !outcome.empty {
            if let Some(callback) = self.options.on_render_complete.clone() {
                callback();
            }
        }
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("target_id", &self.target_id)
            .field("schema", &self.schema)
            .field("mounted", &self.is_mounted())
            .field("rows", &self.data.len())
            .field("visible", &self.visible)
            .field("selection", &self.selection)
            .field("sort", &self.sort)
            .finish()
    }
}
