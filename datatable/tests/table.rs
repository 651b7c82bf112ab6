use std::cell::{Cell, RefCell};
use std::rc::Rc;

use datatable::{
    ActionDescriptor, Column, DataTable, Interaction, Row, RowSelection, Schema, SortDirection,
    SortState, TableError, TableOptions,
};
use tabledom::{Document, Tag};

fn document_with_table(id: &str) -> Rc<RefCell<Document>> {
    let document = Rc::new(RefCell::new(Document::new()));
    {
        let mut doc = document.borrow_mut();
        let table = doc.create_element(Tag::Table);
        doc.set_id(table, id);
        let root = doc.root();
        doc.append_child(root, table);
    }
    document
}

fn schema() -> Schema {
    Schema::new(vec![
        Column::new("name", "Name"),
        Column::new("amount", "Amount"),
        Column::new("note", "Note").unsortable(),
    ])
    .unwrap()
}

fn scenario_rows() -> Vec<Row> {
    vec![
        Row::with_id("1").set("name", "Bob").set("amount", 5).set("action", "normal"),
        Row::with_id("2").set("name", "Al").set("amount", 9).set("action", "normal"),
    ]
}

fn ledger_rows() -> Vec<Row> {
    vec![
        Row::with_id("1").set("name", "Opening").set("amount", 100).set("action", "初始化"),
        Row::with_id("2").set("name", "Bob").set("amount", 5).set("action", "normal"),
        Row::with_id("3").set("name", "Refund").set("amount", 20).set("action", "回费"),
        Row::with_id("4").set("name", "Al").set("amount", 9).set("action", "normal"),
        Row::with_id("5").set("name", "Discount").set("amount", 3).set("action", "减费"),
    ]
}

fn table_with(options: TableOptions) -> DataTable {
    DataTable::new(document_with_table("ledger"), "ledger", schema(), options)
}

fn ids(table: &DataTable) -> Vec<String> {
    table
        .visible_rows()
        .iter()
        .filter_map(|row| row.id())
        .collect()
}

fn rendered_text(table: &DataTable) -> Vec<String> {
    let doc = table.document().borrow();
    table
        .rendered_rows()
        .iter()
        .map(|tr| {
            let id = doc.get(*tr).and_then(|e| e.data("id")).unwrap_or("-");
            format!("{id}:{}", doc.text_content(*tr))
        })
        .collect()
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_scenario_sort_toggle_then_search() {
    let mut table = table_with(TableOptions::default());
    table.set_data(scenario_rows());

    assert!(table.sort_by("amount"));
    assert_eq!(ids(&table), ["1", "2"]);
    assert!(table.sort_by("amount"));
    assert_eq!(ids(&table), ["2", "1"]);

    table.search("al");
    assert_eq!(ids(&table), ["2"]);
    assert_eq!(rendered_text(&table).len(), 1);
}

// ============================================================================
// View state
// ============================================================================

#[test]
fn test_refresh_is_idempotent() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    table.sort_by("name");

    table.refresh();
    let first = rendered_text(&table);
    table.refresh();
    let second = rendered_text(&table);

    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

#[test]
fn test_search_discards_filter_and_vice_versa() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());

    table.search("o");
    let search_alone = ids(&table);
    table.filter(|row| row.kind().is_special());
    let filter_alone = ids(&table);

    table.filter(|row| row.kind().is_special());
    table.search("o");
    assert_eq!(ids(&table), search_alone);

    table.search("o");
    table.filter(|row| row.kind().is_special());
    assert_eq!(ids(&table), filter_alone);
    assert_eq!(filter_alone, ["3", "5"]);
}

#[test]
fn test_sort_round_trip_reverses_unique_keys() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());

    table.sort_by("amount");
    let ascending = ids(&table);
    table.sort_by("amount");
    let mut descending = ids(&table);
    descending.reverse();

    assert_eq!(ascending, descending);
    assert_eq!(ascending, ["5", "2", "4", "3", "1"]);
}

#[test]
fn test_sort_on_unknown_or_unsortable_field_is_noop() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    let before = rendered_text(&table);

    assert!(!table.sort_by("missing"));
    assert!(!table.sort_by("note"));
    assert!(!table.sort_by("action"));

    assert_eq!(table.sort_state(), None);
    assert_eq!(rendered_text(&table), before);
}

#[test]
fn test_filter_none_and_blank_search_reset() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());

    table.filter(|row| row.get_f64("amount").ok().flatten() > Some(10.0));
    assert_eq!(ids(&table), ["1", "3"]);
    table.filter_with(None);
    assert_eq!(ids(&table).len(), 5);
    assert!(table.selection().is_all());

    table.search("bob");
    assert_eq!(ids(&table), ["2"]);
    table.search("   ");
    assert_eq!(ids(&table).len(), 5);

    table.filter(|_| false);
    table.clear_filter();
    assert_eq!(ids(&table).len(), 5);
}

#[test]
fn test_search_is_case_insensitive_and_schema_scoped() {
    let mut table = table_with(TableOptions::default());
    table.set_data(vec![
        Row::with_id("1").set("name", "BOB").set("secret", "zebra"),
        Row::with_id("2").set("name", "carol").set("note", "Zebra crossing"),
    ]);

    table.search("bob");
    assert_eq!(ids(&table), ["1"]);
    table.search("zebra");
    assert_eq!(ids(&table), ["2"]);
    table.search("9");
    assert!(ids(&table).is_empty());
}

#[test]
fn test_marker_moves_between_columns() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    let name = table.header_cell("name").unwrap();
    let amount = table.header_cell("amount").unwrap();

    table.sort_by("name");
    {
        let doc = table.document().borrow();
        assert!(doc.has_class(name, "sort-asc"));
        assert!(!doc.has_class(amount, "sort-asc"));
    }

    table.sort_by("amount");
    table.sort_by("amount");
    let doc = table.document().borrow();
    assert!(!doc.has_class(name, "sort-asc"));
    assert!(!doc.has_class(name, "sort-desc"));
    assert!(doc.has_class(amount, "sort-desc"));
    assert!(!doc.has_class(amount, "sort-asc"));
}

#[test]
fn test_filter_keeps_marker_but_not_order() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    table.sort_by("amount");

    table.filter(|row| row.id().as_deref() != Some("1"));
    assert_eq!(ids(&table), ["2", "3", "4", "5"]);
    assert_eq!(table.sort_state(), Some(&SortState::asc("amount")));
    let amount = table.header_cell("amount").unwrap();
    assert!(table.document().borrow().has_class(amount, "sort-asc"));

    // The marker still drives the toggle.
    table.sort_by("amount");
    assert_eq!(ids(&table), ["3", "4", "2", "5"]);
    assert_eq!(table.sort_state().unwrap().direction, SortDirection::Desc);
}

#[test]
fn test_resort_after_filter_option() {
    let mut table = table_with(TableOptions::default().resort_after_filter());
    table.set_data(ledger_rows());
    table.sort_by("amount");

    table.filter(|row| row.id().as_deref() != Some("1"));
    assert_eq!(ids(&table), ["5", "2", "4", "3"]);
    table.search("o");
    assert_eq!(ids(&table), ["5", "2", "1"]);
    table.set_data(scenario_rows());
    assert_eq!(ids(&table), ["1", "2"]);
}

#[test]
fn test_set_data_replaces_dataset_and_view() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    table.search("bob");

    table.set_data(scenario_rows());
    assert!(matches!(table.selection(), RowSelection::All));
    assert_eq!(ids(&table), ["1", "2"]);
    assert_eq!(table.data().len(), 2);
}

// ============================================================================
// Selection
// ============================================================================

fn mark_selected(table: &DataTable, id: &str) {
    let node = table.row_node(id).unwrap();
    let document = Rc::clone(table.document());
    let mut doc = document.borrow_mut();
    doc.get_mut(node).unwrap().classes.add("selected");
}

#[test]
fn test_selected_rows_follow_rendered_order() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    table.sort_by("amount");
    mark_selected(&table, "1");
    mark_selected(&table, "5");

    let selected: Vec<_> = table.selected_rows().iter().filter_map(|r| r.id()).collect();
    assert_eq!(selected, ["5", "1"]);
}

#[test]
fn test_selected_rows_only_reads_rendered_rows() {
    let mut table = table_with(TableOptions::default());
    table.set_data(ledger_rows());
    mark_selected(&table, "2");
    mark_selected(&table, "4");

    // A re-render drops markers; the table never re-applies them.
    table.search("al");
    assert!(table.selected_rows().is_empty());

    mark_selected(&table, "4");
    let selected: Vec<_> = table.selected_rows().iter().filter_map(|r| r.id()).collect();
    assert_eq!(selected, ["4"]);
}

#[test]
fn test_selected_placeholder_row_is_ignored() {
    let mut table = table_with(TableOptions::default());
    table.set_data(Vec::<Row>::new());
    let placeholder = table.rendered_rows()[0];
    table
        .document()
        .borrow_mut()
        .get_mut(placeholder)
        .unwrap()
        .classes
        .add("selected");
    assert!(table.selected_rows().is_empty());
}

// ============================================================================
// Interaction
// ============================================================================

type Deletes = Rc<RefCell<Vec<(String, usize)>>>;

fn counting_options(row_clicks: &Rc<Cell<usize>>, deletes: &Deletes) -> TableOptions {
    let row_clicks = Rc::clone(row_clicks);
    let deletes = Rc::clone(deletes);
    TableOptions::default()
        .with_action(ActionDescriptor::new("fa-edit", "Edit", "edit-btn", |_, _| {}))
        .with_action(ActionDescriptor::new(
            "fa-trash",
            "Delete",
            "delete-btn",
            move |row, index| {
                deletes
                    .borrow_mut()
                    .push((row.id().unwrap_or_default(), index));
            },
        ))
        .on_row_click(move |_, _| row_clicks.set(row_clicks.get() + 1))
}

fn button(table: &DataTable, id: &str, class: &str) -> tabledom::NodeId {
    let doc = table.document().borrow();
    let tr = table.row_node(id).unwrap();
    doc.descendants(tr)
        .into_iter()
        .find(|node| doc.has_class(*node, class))
        .unwrap()
}

#[test]
fn test_action_click_does_not_reach_row() {
    let row_clicks = Rc::new(Cell::new(0));
    let deletes = Rc::new(RefCell::new(Vec::new()));
    let mut table = table_with(counting_options(&row_clicks, &deletes));
    table.set_data(ledger_rows());
    table.sort_by("amount");

    let delete = button(&table, "4", "delete-btn");
    let interaction = table.dispatch_click(delete);

    assert_eq!(
        interaction,
        Interaction::ActionInvoked {
            id: Some("4".to_string()),
            index: 2,
            action: 1,
            class_name: "delete-btn".to_string(),
        }
    );
    assert_eq!(deletes.borrow().as_slice(), &[("4".to_string(), 2)]);
    assert_eq!(row_clicks.get(), 0);
}

#[test]
fn test_row_click_reports_visible_index() {
    let row_clicks = Rc::new(Cell::new(0));
    let deletes = Rc::new(RefCell::new(Vec::new()));
    let mut table = table_with(counting_options(&row_clicks, &deletes));
    table.set_data(ledger_rows());
    table.search("al");

    let tr = table.row_node("4").unwrap();
    let cell = table.document().borrow().children(tr)[0];
    let interaction = table.dispatch_click(cell);

    assert_eq!(
        interaction,
        Interaction::RowClicked {
            id: Some("4".to_string()),
            index: 0,
        }
    );
    assert_eq!(row_clicks.get(), 1);
    assert!(deletes.borrow().is_empty());
}

#[test]
fn test_header_click_sorts() {
    let mut table = table_with(TableOptions::default());
    table.set_data(scenario_rows());
    let header = table.header_cell("amount").unwrap();

    let first = table.dispatch_click(header);
    assert_eq!(
        first,
        Interaction::Sorted {
            field: "amount".to_string(),
            direction: SortDirection::Asc,
        }
    );
    let second = table.dispatch_click(header);
    assert!(matches!(
        second,
        Interaction::Sorted {
            direction: SortDirection::Desc,
            ..
        }
    ));
    assert_eq!(ids(&table), ["2", "1"]);
}

#[test]
fn test_header_clicks_disabled_by_option() {
    let mut table = table_with(TableOptions::default().sortable(false));
    table.set_data(scenario_rows());
    let header = table.header_cell("amount").unwrap();

    assert!(table.dispatch_click(header).is_ignored());
    assert_eq!(table.sort_state(), None);
    // Programmatic sorting still works.
    assert!(table.sort_by("amount"));
}

#[test]
fn test_unsortable_header_is_not_clickable() {
    let mut table = table_with(TableOptions::default());
    table.set_data(scenario_rows());
    let note = table.header_cell("note").unwrap();
    assert!(table.dispatch_click(note).is_ignored());
    assert!(!table.document().borrow().has_class(note, "sortable"));
}

#[test]
fn test_listeners_are_freed_on_rerender() {
    let row_clicks = Rc::new(Cell::new(0));
    let deletes = Rc::new(RefCell::new(Vec::new()));
    let mut table = table_with(counting_options(&row_clicks, &deletes));
    table.set_data(ledger_rows());

    let stale_row = table.row_node("2").unwrap();
    let stale_button = button(&table, "2", "delete-btn");
    let live = table.document().borrow().len();

    table.refresh();
    table.refresh();

    assert_eq!(table.document().borrow().len(), live);
    assert!(table.dispatch_click(stale_row).is_ignored());
    assert!(table.dispatch_click(stale_button).is_ignored());
    assert_eq!(row_clicks.get(), 0);
    assert!(deletes.borrow().is_empty());
}

#[test]
fn test_callbacks_may_use_the_document() {
    let mut options = TableOptions::default();
    let document = document_with_table("ledger");
    {
        let document = Rc::clone(&document);
        options = options.on_row_click(move |row, _| {
            let mut doc = document.borrow_mut();
            let tbody_rows: Vec<_> = doc
                .descendants(doc.root())
                .into_iter()
                .filter(|n| doc.get(*n).and_then(|e| e.data("id")) == row.id().as_deref())
                .collect();
            for tr in tbody_rows {
                if let Some(element) = doc.get_mut(tr) {
                    element.classes.toggle("selected");
                }
            }
        });
    }
    let mut table = DataTable::new(Rc::clone(&document), "ledger", schema(), options);
    table.set_data(scenario_rows());

    let tr = table.row_node("2").unwrap();
    table.dispatch_click(tr);

    let selected: Vec<_> = table.selected_rows().iter().filter_map(|r| r.id()).collect();
    assert_eq!(selected, ["2"]);
}

#[test]
fn test_render_complete_fires_once_per_pass() {
    let renders = Rc::new(Cell::new(0));
    let counter = Rc::clone(&renders);
    let options = TableOptions::default().on_render_complete(move || counter.set(counter.get() + 1));
    let mut table = table_with(options);

    table.set_data(scenario_rows());
    assert_eq!(renders.get(), 1);
    table.sort_by("name");
    table.refresh();
    assert_eq!(renders.get(), 3);

    // The empty-state path does not report completion.
    table.search("nobody");
    assert_eq!(renders.get(), 3);
}

// ============================================================================
// Mounting
// ============================================================================

#[test]
fn test_try_mount_reports_missing_target() {
    let document = document_with_table("ledger");
    let err = DataTable::try_mount(document, "nope", schema(), TableOptions::default()).unwrap_err();
    assert_eq!(err, TableError::mount_target_missing("nope"));
}

#[test]
fn test_inert_table_accepts_every_call() {
    let document = document_with_table("ledger");
    let before = document.borrow().len();
    let mut table = DataTable::new(Rc::clone(&document), "nope", schema(), TableOptions::default());
    assert!(!table.is_mounted());

    table.set_data(ledger_rows());
    assert!(table.sort_by("amount"));
    table.filter(|row| row.kind().is_special());
    table.clear_filter();
    table.search("bob");
    table.refresh();

    assert_eq!(ids(&table), ["2"]);
    assert!(table.selected_rows().is_empty());
    assert!(table.rendered_rows().is_empty());
    assert_eq!(table.header_cell("name"), None);
    let root = document.borrow().root();
    assert!(table.dispatch_click(root).is_ignored());
    assert_eq!(document.borrow().len(), before);
}

#[test]
fn test_mount_replaces_existing_content() {
    let document = document_with_table("ledger");
    {
        let mut doc = document.borrow_mut();
        let table = doc.element_by_id("ledger").unwrap();
        let stray = doc.create_element(Tag::Div);
        doc.append_child(table, stray);
    }
    let table = DataTable::new(Rc::clone(&document), "ledger", schema(), TableOptions::default());
    let doc = document.borrow();
    let children = doc.children(table.table_node().unwrap());
    assert_eq!(children.len(), 2);
    assert_eq!(doc.get(children[0]).unwrap().tag, Tag::THead);
    assert_eq!(doc.get(children[1]).unwrap().tag, Tag::TBody);
}
