//! Per-row action controls.

use std::fmt;
use std::rc::Rc;

use crate::model::{Row, RowKind};

/// Callback run when an action control is activated. Receives the row and its
/// position in the visible set.
pub type ActionCallback = Rc<dyn Fn(&Row, usize)>;

/// One configured action control.
#[derive(Clone)]
pub struct ActionDescriptor {
    /// Icon class, e.g. `fa-edit`.
    pub icon: String,
    pub title: String,
    /// Class tag; `edit` and `delete` substrings select the control's role.
    pub class_name: String,
    pub callback: ActionCallback,
}

impl ActionDescriptor {
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        class_name: impl Into<String>,
        callback: impl Fn(&Row, usize) + 'static,
    ) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            class_name: class_name.into(),
            callback: Rc::new(callback),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.class_name.contains("edit")
    }

    pub fn is_delete(&self) -> bool {
        self.class_name.contains("delete")
    }

    pub fn invoke(&self, row: &Row, index: usize) {
        (self.callback)(row, index);
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("icon", &self.icon)
            .field("title", &self.title)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

/// What the action cell of a row holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCell {
    /// A non-interactive `-` placeholder.
    Placeholder,
    /// Controls for these positions of the configured action list, in order.
    Controls(Vec<usize>),
}

impl ActionCell {
    pub fn controls(&self) -> &[usize] {
        match self {
            ActionCell::Placeholder => &[],
            ActionCell::Controls(indices) => indices,
        }
    }
}

/// Decides which configured actions a row of `kind` gets.
///
/// Initialization rows never get controls. Refund and fee reduction rows lose
/// every edit-tagged action. Everything else gets the full list.
pub fn action_cell(kind: RowKind, actions: &[ActionDescriptor]) -> ActionCell {
    match kind {
        RowKind::Initialization => ActionCell::Placeholder,
        kind if kind.is_special() => ActionCell::Controls(
            actions
                .iter()
                .enumerate()
                .filter(|(_, action)| !action.is_edit())
                .map(|(i, _)| i)
                .collect(),
        ),
        _ => ActionCell::Controls((0..actions.len()).collect()),
    }
}
