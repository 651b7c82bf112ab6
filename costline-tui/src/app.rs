//! The interactive ledger view.
//!
//! [`App`] owns the document and the table mounted on it, turns key and mouse
//! events into table operations and paints a frame per event batch.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use datatable::{ActionDescriptor, DataTable, Interaction, Row, RowKind, TableOptions, classes};
use tabledom::{
    Document, LayoutResult, Line, NodeId, PaintOptions, Tag, Terminal, Tone, hit_test, paint_table,
};

use crate::error::AppError;
use crate::ledger;

/// Element id the table mounts on.
pub const TABLE_ID: &str = "ledger";

/// Class marking the keyboard cursor row.
const CURSOR: &str = "cursor";

/// Lines painted above the table.
const HEADER_LINES: u16 = 2;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const HELP: &str =
    "1-9 sort  / search  f filter  space select  enter open  e edit  d delete  r refresh  q quit";

// =============================================================================
// Modes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Editing a search keyword that is applied on Enter.
    Search(String),
}

/// Row filter cycled with `f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    /// Refunds and fee reductions.
    Special,
    Regular,
}

impl FilterMode {
    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Special,
            FilterMode::Special => FilterMode::Regular,
            FilterMode::Regular => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Special => "refunds & fee reductions",
            FilterMode::Regular => "regular",
        }
    }

    fn matches(self, row: &Row) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Special => row.kind().is_special(),
            FilterMode::Regular => row.kind() == RowKind::Regular,
        }
    }
}

// =============================================================================
// App
// =============================================================================

pub struct App {
    document: Rc<RefCell<Document>>,
    table: DataTable,
    rows: Vec<Row>,
    cursor: usize,
    mode: Mode,
    filter: FilterMode,
    keyword: String,
    /// Written by table callbacks, shown under the table.
    status: Rc<RefCell<String>>,
    paint: PaintOptions,
    layout: LayoutResult,
    quit: bool,
}

impl App {
    pub fn new(rows: Vec<Row>) -> Self {
        let document = Rc::new(RefCell::new(Document::new()));
        {
            let mut doc = document.borrow_mut();
            let table = doc.create_element(Tag::Table);
            doc.set_id(table, TABLE_ID);
            let root = doc.root();
            doc.append_child(root, table);
        }

        let status = Rc::new(RefCell::new(String::new()));
        let mut table = DataTable::new(
            Rc::clone(&document),
            TABLE_ID,
            ledger::schema(),
            table_options(&status),
        );
        table.set_data(rows.clone());

        Self {
            document,
            table,
            rows,
            cursor: 0,
            mode: Mode::Browse,
            filter: FilterMode::All,
            keyword: String::new(),
            status,
            paint: PaintOptions::default(),
            layout: LayoutResult::default(),
            quit: false,
        }
    }

    /// Draw and handle events until the user quits.
    pub fn run(&mut self, terminal: &mut Terminal) -> Result<(), AppError> {
        terminal.draw(&self.frame())?;
        while !self.quit {
            let events = terminal.poll(Some(POLL_INTERVAL))?;
            if events.is_empty() {
                continue;
            }
            for event in events {
                self.handle_event(event);
            }
            terminal.draw(&self.frame())?;
        }
        Ok(())
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        match &mut self.mode {
            Mode::Search(input) => match key.code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let keyword = std::mem::take(input);
                    self.mode = Mode::Browse;
                    self.apply_search(keyword);
                }
                KeyCode::Esc => self.mode = Mode::Browse,
                _ => {}
            },
            Mode::Browse => self.handle_browse_key(key.code),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char(digit @ '1'..='9') => {
                let position = digit as usize - '1' as usize;
                self.sort_column(position);
            }
            KeyCode::Char('/') => self.mode = Mode::Search(self.keyword.clone()),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Enter => {
                if let Some(tr) = self.cursor_row() {
                    let interaction = self.table.dispatch_click(tr);
                    self.after_interaction(interaction);
                }
            }
            KeyCode::Char('e') => self.click_control("edit"),
            KeyCode::Char('d') => self.click_control("delete"),
            KeyCode::Char('r') => {
                self.table.refresh();
                self.set_status("refreshed");
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(self.last_row());
            }
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.cursor = self.last_row(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let target = {
            let doc = self.document.borrow();
            hit_test(&self.layout, &doc, doc.root(), mouse.column, mouse.row)
        };
        let Some(target) = target else {
            return;
        };
        log::trace!("click at {},{} hit {target}", mouse.column, mouse.row);
        let interaction = self.table.dispatch_click(target);
        self.after_interaction(interaction);
    }

    // =========================================================================
    // Table operations
    // =========================================================================

    fn sort_column(&mut self, position: usize) {
        let Some(field) = self
            .table
            .schema()
            .columns()
            .get(position)
            .map(|column| column.field.clone())
        else {
            return;
        };
        if self.table.sort_by(&field) {
            let direction = self
                .table
                .sort_state()
                .map(|state| state.direction.to_string())
                .unwrap_or_default();
            self.set_status(format!("sorted by {field} {direction}"));
        } else {
            self.set_status(format!("{field} is not sortable"));
        }
    }

    fn apply_search(&mut self, keyword: String) {
        self.filter = FilterMode::All;
        self.table.search(&keyword);
        if keyword.trim().is_empty() {
            self.set_status("search cleared");
        } else {
            self.set_status(format!(
                "{} matches for \"{keyword}\"",
                self.table.visible_indices().len()
            ));
        }
        self.keyword = keyword;
        self.clamp_cursor();
    }

    fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.keyword.clear();
        match self.filter {
            FilterMode::All => self.table.clear_filter(),
            mode => self.table.filter(move |row| mode.matches(row)),
        }
        self.set_status(format!("filter: {}", self.filter.label()));
        self.clamp_cursor();
    }

    /// `set_data` shows the full dataset; put the active filter or search back.
    fn restore_selection(&mut self) {
        match self.filter {
            FilterMode::All if !self.keyword.trim().is_empty() => self.table.search(&self.keyword),
            FilterMode::All => {}
            mode => self.table.filter(move |row| mode.matches(row)),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(tr) = self.cursor_row() else {
            return;
        };
        if let Ok(mut doc) = self.document.try_borrow_mut() {
            if let Some(element) = doc.get_mut(tr) {
                element.classes.toggle(classes::SELECTED);
            }
        }
        let selected = self.table.selected_rows().len();
        self.set_status(format!("{selected} selected"));
    }

    /// Click the control of the cursor row whose class contains `role`.
    fn click_control(&mut self, role: &str) {
        let Some(tr) = self.cursor_row() else {
            return;
        };
        let control = {
            let doc = self.document.borrow();
            doc.descendants(tr).into_iter().find(|node| {
                doc.get(*node).is_some_and(|element| {
                    element.tag == Tag::Button && element.classes.iter().any(|c| c.contains(role))
                })
            })
        };
        match control {
            Some(button) => {
                let interaction = self.table.dispatch_click(button);
                self.after_interaction(interaction);
            }
            None => self.set_status(format!("no {role} control on this row")),
        }
    }

    fn after_interaction(&mut self, interaction: Interaction) {
        log::debug!("{interaction:?}");
        match interaction {
            Interaction::Sorted { field, direction } => {
                self.set_status(format!("sorted by {field} {direction}"));
            }
            Interaction::RowClicked { index, .. } => self.cursor = index,
            Interaction::ActionInvoked {
                id, class_name, ..
            } if class_name.contains("delete") => {
                let before = self.rows.len();
                self.rows.retain(|row| row.id() != id);
                if self.rows.len() != before {
                    self.table.set_data(self.rows.clone());
                    self.restore_selection();
                    self.clamp_cursor();
                }
            }
            Interaction::ActionInvoked { .. } | Interaction::Ignored => {}
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Paint the whole screen and remember where the table landed.
    pub fn frame(&mut self) -> Vec<Line> {
        self.mark_cursor();

        let painted = match self.table.table_node() {
            Some(node) => {
                let doc = self.document.borrow();
                paint_table(&doc, node, &self.paint)
            }
            None => Default::default(),
        };
        self.layout = painted.layout.offset(0, HEADER_LINES);

        let mut lines = Vec::with_capacity(painted.lines.len() + 5);
        let mut title = Line::default();
        title.push("costline", Tone::Header, true);
        title.push(
            format!(
                "  {} of {} entries · filter: {}",
                self.table.visible_indices().len(),
                self.rows.len(),
                self.filter.label()
            ),
            Tone::Muted,
            false,
        );
        lines.push(title);
        lines.push(match &self.mode {
            Mode::Search(input) => Line::styled(format!("search: {input}▏"), Tone::Accent),
            Mode::Browse if !self.keyword.trim().is_empty() => {
                Line::styled(format!("search: {}", self.keyword), Tone::Muted)
            }
            Mode::Browse => Line::default(),
        });
        lines.extend(painted.lines);
        lines.push(Line::default());
        lines.push(Line::styled(self.status(), Tone::Normal));
        lines.push(Line::styled(HELP, Tone::Muted));
        lines
    }

    fn mark_cursor(&mut self) {
        self.clamp_cursor();
        let rendered = self.data_rows();
        let Ok(mut doc) = self.document.try_borrow_mut() else {
            return;
        };
        for (position, tr) in rendered.iter().enumerate() {
            if let Some(element) = doc.get_mut(*tr) {
                if position == self.cursor {
                    element.classes.add(CURSOR);
                } else {
                    element.classes.remove(CURSOR);
                }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Rendered data rows, skipping the empty-state placeholder.
    fn data_rows(&self) -> Vec<NodeId> {
        let doc = self.document.borrow();
        self.table
            .rendered_rows()
            .into_iter()
            .filter(|tr| doc.has_class(*tr, classes::DATA_ROW))
            .collect()
    }

    fn cursor_row(&self) -> Option<NodeId> {
        self.data_rows().get(self.cursor).copied()
    }

    fn last_row(&self) -> usize {
        self.table.visible_indices().len().saturating_sub(1)
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.last_row());
    }

    fn set_status(&self, message: impl Into<String>) {
        *self.status.borrow_mut() = message.into();
    }
}

fn table_options(status: &Rc<RefCell<String>>) -> TableOptions {
    let on_edit = Rc::clone(status);
    let on_delete = Rc::clone(status);
    let on_row = Rc::clone(status);

    TableOptions::default()
        .with_action(ActionDescriptor::new(
            "fa-edit",
            "Edit",
            "edit-btn",
            move |row, index| {
                *on_edit.borrow_mut() = format!("editing #{index}: {}", describe(row));
            },
        ))
        .with_action(ActionDescriptor::new(
            "fa-trash",
            "Delete",
            "delete-btn",
            move |row, _| {
                *on_delete.borrow_mut() = format!("deleted {}", describe(row));
            },
        ))
        .with_empty_text("No matching entries")
        .on_row_click(move |row, index| {
            let mut status = format!("#{index} {}", describe(row));
            let label = row.kind().label();
            if !label.is_empty() {
                status.push_str(&format!(" [{label}]"));
            }
            *on_row.borrow_mut() = status;
        })
        .on_render_complete(|| log::trace!("ledger repainted"))
}

fn describe(row: &Row) -> String {
    let name = row.field("name").cell_text();
    let amount = row.field("amount").cell_text();
    match (name.is_empty(), amount.is_empty()) {
        (true, _) => row.id().unwrap_or_else(|| "row".to_string()),
        (false, true) => name,
        (false, false) => format!("{name} ({amount})"),
    }
}
