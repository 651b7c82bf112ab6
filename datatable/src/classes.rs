//! Class names the table puts on (or reads from) document elements.

/// Header of a sortable column.
pub const SORTABLE: &str = "sortable";
pub const SORT_ASC: &str = "sort-asc";
pub const SORT_DESC: &str = "sort-desc";

/// Header of the actions column.
pub const ACTION_COLUMN: &str = "action-column";

/// Every rendered data row.
pub const DATA_ROW: &str = "data-row";

/// Applied by the host, never by the table; read by `selected_rows`.
pub const SELECTED: &str = "selected";

/// Refund and fee reduction rows.
pub const HIGHLIGHT: &str = "highlight";

pub const ACTION_CELL: &str = "action-cell";
pub const ACTION_BUTTON: &str = "action-button";

/// The single cell of the empty-state row.
pub const EMPTY_PLACEHOLDER: &str = "empty-placeholder";
pub const MUTED: &str = "muted";

/// Tone of delete-tagged buttons.
pub const DANGER: &str = "danger";
/// Tone of edit-tagged buttons.
pub const ACCENT: &str = "accent";

/// Icon font family class put on every action icon.
pub const ICON_FAMILY: &str = "fas";
