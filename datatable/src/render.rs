//! Materializing the table onto a [`Document`].
//!
//! Rendering runs in two phases. [`row_models`] calls the caller's render
//! transforms and decides each row's action cell without touching the
//! document; [`render_body`] then rebuilds the body from those models. The
//! document is only borrowed for the second phase, so render transforms are
//! free to read it.

use std::collections::HashMap;

use tabledom::{Document, EventKind, HandlerId, Markup, NodeId, Tag, TextAlign};

use crate::action::{ActionCell, action_cell};
use crate::classes;
use crate::model::{ID_FIELD, Row, RowKind};
use crate::options::TableOptions;
use crate::schema::Schema;
use crate::view::SortState;

/// What a click on a subscribed element means to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    Sort(String),
    /// `index` is the visible position, `row` the dataset index.
    Row { index: usize, row: usize },
    Action { index: usize, row: usize, action: usize },
}

/// Elements built once at mount time.
#[derive(Debug, Clone)]
pub(crate) struct Mount {
    pub table: NodeId,
    pub tbody: NodeId,
    pub headers: Vec<(String, NodeId)>,
    pub action_header: Option<NodeId>,
}

impl Mount {
    pub fn header(&self, field: &str) -> Option<NodeId> {
        self.headers
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, node)| *node)
    }
}

/// Clears `table` and builds the header row and an empty body.
pub(crate) fn setup(
    doc: &mut Document,
    table: NodeId,
    schema: &Schema,
    options: &TableOptions,
) -> (Mount, HashMap<HandlerId, Binding>) {
    doc.clear_children(table);
    let mut bindings = HashMap::new();

    let thead = doc.create_element(Tag::THead);
    let header_row = doc.create_element(Tag::Tr);

    let mut headers = Vec::with_capacity(schema.len());
    for column in schema.columns() {
        let th = doc.create_element(Tag::Th);
        doc.set_text(th, column.title.as_str());
        if let Some(element) = doc.get_mut(th) {
            element.set_data("field", column.field.as_str());
            if column.sortable {
                element.classes.add(classes::SORTABLE);
            }
        }
        if options.sortable && column.sortable {
            if let Some(handler) = doc.listen(th, EventKind::Click) {
                bindings.insert(handler, Binding::Sort(column.field.clone()));
            }
        }
        doc.append_child(header_row, th);
        headers.push((column.field.clone(), th));
    }

    let action_header = options.show_actions.then(|| {
        let th = doc.create_element(Tag::Th);
        doc.set_text(th, options.action_column_title.as_str());
        if let Some(element) = doc.get_mut(th) {
            element.classes.add(classes::ACTION_COLUMN);
            element.text_align = TextAlign::Center;
        }
        doc.append_child(header_row, th);
        th
    });

    doc.append_child(thead, header_row);
    doc.append_child(table, thead);

    let tbody = doc.create_element(Tag::TBody);
    doc.append_child(table, tbody);

    let mount = Mount {
        table,
        tbody,
        headers,
        action_header,
    };
    (mount, bindings)
}

/// Puts the marker of `sort` on its header and clears it everywhere else.
pub(crate) fn apply_sort_markers(doc: &mut Document, mount: &Mount, sort: Option<&SortState>) {
    for (field, th) in &mount.headers {
        let Some(element) = doc.get_mut(*th) else {
            continue;
        };
        element.classes.remove(classes::SORT_ASC);
        element.classes.remove(classes::SORT_DESC);
        if let Some(sort) = sort.filter(|s| &s.field == field) {
            element.classes.add(sort.direction.marker_class());
        }
    }
}

// =============================================================================
// Row models
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellModel {
    Text(String),
    Markup(Markup),
}

#[derive(Debug, Clone)]
pub(crate) struct RowModel {
    /// Dataset index.
    pub row: usize,
    pub id: Option<String>,
    pub kind: RowKind,
    pub cells: Vec<CellModel>,
    /// `None` when the actions column is hidden.
    pub actions: Option<ActionCell>,
}

/// Computes every visible row's cells. Runs caller render transforms.
pub(crate) fn row_models(
    schema: &Schema,
    options: &TableOptions,
    data: &[Row],
    visible: &[usize],
) -> Vec<RowModel> {
    visible
        .iter()
        .enumerate()
        .filter_map(|(index, &row_index)| {
            let Some(row) = data.get(row_index) else {
                log::warn!("visible index {row_index} is outside the dataset");
                return None;
            };
            let cells = schema
                .columns()
                .iter()
                .map(|column| match &column.render {
                    Some(render) => CellModel::Markup(Markup::parse(render(row, index))),
                    None => CellModel::Text(row.field(&column.field).cell_text()),
                })
                .collect();
            let kind = row.kind();
            Some(RowModel {
                row: row_index,
                id: row.id(),
                kind,
                cells,
                actions: options
                    .show_actions
                    .then(|| action_cell(kind, &options.actions)),
            })
        })
        .collect()
}

// =============================================================================
// Body
// =============================================================================

/// Result of rebuilding the body.
#[derive(Debug, Default)]
pub(crate) struct BodyOutcome {
    pub bindings: HashMap<HandlerId, Binding>,
    /// `tr` elements of data rows, in render order.
    pub rows: Vec<NodeId>,
    pub empty: bool,
}

/// Replaces the body with `models`, or the empty-state row when there are none.
pub(crate) fn render_body(
    doc: &mut Document,
    mount: &Mount,
    schema: &Schema,
    options: &TableOptions,
    models: &[RowModel],
) -> BodyOutcome {
    doc.clear_children(mount.tbody);
    let mut outcome = BodyOutcome::default();

    if models.is_empty() {
        render_placeholder(doc, mount, schema, options);
        outcome.empty = true;
        return outcome;
    }

    for (index, model) in models.iter().enumerate() {
        let tr = render_row(doc, options, model, index, &mut outcome.bindings);
        doc.append_child(mount.tbody, tr);
        outcome.rows.push(tr);
    }
    log::trace!("rendered {} rows", outcome.rows.len());
    outcome
}

fn render_placeholder(doc: &mut Document, mount: &Mount, schema: &Schema, options: &TableOptions) {
    let tr = doc.create_element(Tag::Tr);
    let td = doc.create_element(Tag::Td);
    let span = schema.len() + usize::from(options.show_actions);
    doc.set_text(td, options.empty_text.as_str());
    if let Some(element) = doc.get_mut(td) {
        element.col_span = u16::try_from(span).unwrap_or(u16::MAX).max(1);
        element.text_align = TextAlign::Center;
        element.classes.add(classes::EMPTY_PLACEHOLDER);
        element.classes.add(classes::MUTED);
    }
    doc.append_child(tr, td);
    doc.append_child(mount.tbody, tr);
}

fn render_row(
    doc: &mut Document,
    options: &TableOptions,
    model: &RowModel,
    index: usize,
    bindings: &mut HashMap<HandlerId, Binding>,
) -> NodeId {
    let tr = doc.create_element(Tag::Tr);
    if let Some(element) = doc.get_mut(tr) {
        if let Some(id) = &model.id {
            element.set_data(ID_FIELD, id.as_str());
        }
        element.classes.add(classes::DATA_ROW);
        if model.kind.is_special() {
            element.classes.add(classes::HIGHLIGHT);
        }
    }

    for cell in &model.cells {
        let td = doc.create_element(Tag::Td);
        match cell {
            CellModel::Text(text) => doc.set_text(td, text.as_str()),
            CellModel::Markup(markup) => doc.set_markup(td, markup.clone()),
        }
        doc.append_child(tr, td);
    }

    if let Some(actions) = &model.actions {
        let td = render_action_cell(doc, options, model, actions, index, bindings);
        doc.append_child(tr, td);
    }

    if options.on_row_click.is_some() {
        if let Some(handler) = doc.listen(tr, EventKind::Click) {
            bindings.insert(
                handler,
                Binding::Row {
                    index,
                    row: model.row,
                },
            );
        }
    }
    tr
}

fn render_action_cell(
    doc: &mut Document,
    options: &TableOptions,
    model: &RowModel,
    cell: &ActionCell,
    index: usize,
    bindings: &mut HashMap<HandlerId, Binding>,
) -> NodeId {
    let td = doc.create_element(Tag::Td);
    if let Some(element) = doc.get_mut(td) {
        element.classes.add(classes::ACTION_CELL);
    }

    match cell {
        ActionCell::Placeholder => {
            doc.set_text(td, "-");
            if let Some(element) = doc.get_mut(td) {
                element.text_align = TextAlign::Center;
            }
        }
        ActionCell::Controls(controls) => {
            if let Some(element) = doc.get_mut(td) {
                element.text_align = TextAlign::Center;
            }
            for &action_index in controls {
                let Some(action) = options.actions.get(action_index) else {
                    continue;
                };
                let button = doc.create_element(Tag::Button);
                if let Some(element) = doc.get_mut(button) {
                    element.classes.add(classes::ACTION_BUTTON);
                    if action.is_delete() {
                        element.classes.add(classes::DANGER);
                    } else if action.is_edit() {
                        element.classes.add(classes::ACCENT);
                    }
                    element.classes.add_all(&action.class_name);
                    element.title = Some(action.title.clone());
                }
                if !action.icon.is_empty() {
                    let icon = doc.create_element(Tag::Icon);
                    if let Some(element) = doc.get_mut(icon) {
                        element.classes.add(classes::ICON_FAMILY);
                        element.classes.add_all(&action.icon);
                    }
                    doc.append_child(button, icon);
                }
                if let Some(handler) = doc.listen(button, EventKind::Click) {
                    bindings.insert(
                        handler,
                        Binding::Action {
                            index,
                            row: model.row,
                            action: action_index,
                        },
                    );
                }
                doc.append_child(td, button);
            }
        }
    }
    td
}
