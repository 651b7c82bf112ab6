//! Table configuration.

use std::fmt;
use std::rc::Rc;

use crate::action::ActionDescriptor;
use crate::model::Row;

/// Callback for a click on a row outside its action controls.
pub type RowClickCallback = Rc<dyn Fn(&Row, usize)>;

/// Callback fired once after a render pass that produced data rows.
pub type RenderCompleteCallback = Rc<dyn Fn()>;

/// Configuration for a [`DataTable`](crate::DataTable).
///
/// # Example
///
/// ```
/// use datatable::{ActionDescriptor, TableOptions};
///
/// let options = TableOptions::default()
///     .with_action(ActionDescriptor::new("fa-trash", "Delete", "delete-btn", |_, _| {}))
///     .with_empty_text("Nothing recorded yet")
///     .on_row_click(|row, index| println!("{index}: {:?}", row.id()));
/// assert!(options.show_actions);
/// ```
#[derive(Clone)]
pub struct TableOptions {
    /// Append an actions column.
    ///
    /// Default: true
    pub show_actions: bool,

    /// Reserved; carried but not acted on.
    ///
    /// Default: false
    pub show_filter: bool,

    /// Reserved; carried but not acted on.
    ///
    /// Default: false
    pub show_pagination: bool,

    /// Bind header clicks to sorting.
    ///
    /// Default: true
    pub sortable: bool,

    /// Reserved capability flag; search works regardless.
    ///
    /// Default: true
    pub searchable: bool,

    /// Reapply the current sort whenever the visible set is recomputed from
    /// the dataset (`set_data`, `filter`, `search`).
    ///
    /// Default: false, which keeps the recomputed view in dataset order until
    /// the next sort.
    pub resort_after_filter: bool,

    pub actions: Vec<ActionDescriptor>,

    /// Default: "Actions"
    pub action_column_title: String,

    /// Message shown in the placeholder row when nothing is visible.
    ///
    /// Default: "No data"
    pub empty_text: String,

    pub on_row_click: Option<RowClickCallback>,
    pub on_render_complete: Option<RenderCompleteCallback>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            show_actions: true,
            show_filter: false,
            show_pagination: false,
            sortable: true,
            searchable: true,
            resort_after_filter: false,
            actions: Vec::new(),
            action_column_title: "Actions".to_string(),
            empty_text: "No data".to_string(),
            on_row_click: None,
            on_render_complete: None,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_actions(mut self, show: bool) -> Self {
        self.show_actions = show;
        self
    }

    pub fn show_filter(mut self, show: bool) -> Self {
        self.show_filter = show;
        self
    }

    pub fn show_pagination(mut self, show: bool) -> Self {
        self.show_pagination = show;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Keep the sort applied across `set_data`, `filter` and `search`.
    pub fn resort_after_filter(mut self) -> Self {
        self.resort_after_filter = true;
        self
    }

    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = ActionDescriptor>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_action_column_title(mut self, title: impl Into<String>) -> Self {
        self.action_column_title = title.into();
        self
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    pub fn on_row_click(mut self, callback: impl Fn(&Row, usize) + 'static) -> Self {
        self.on_row_click = Some(Rc::new(callback));
        self
    }

    pub fn on_render_complete(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_render_complete = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("show_actions", &self.show_actions)
            .field("show_filter", &self.show_filter)
            .field("show_pagination", &self.show_pagination)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .field("resort_after_filter", &self.resort_after_filter)
            .field("actions", &self.actions)
            .field("action_column_title", &self.action_column_title)
            .field("empty_text", &self.empty_text)
            .field("on_row_click", &self.on_row_click.is_some())
            .field("on_render_complete", &self.on_render_complete.is_some())
            .finish()
    }
}
