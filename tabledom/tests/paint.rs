use tabledom::{
    hit_test, hit_test_any, paint_table, Document, EventKind, Markup, NodeId, PaintOptions,
    Tag, TextAlign, Tone,
};

struct Fixture {
    doc: Document,
    table: NodeId,
    header: NodeId,
    row: NodeId,
    button: NodeId,
}

/// Two columns plus an action column with one button.
fn fixture() -> Fixture {
    let mut doc = Document::new();
    let root = doc.root();
    let table = doc.create_element(Tag::Table);
    doc.append_child(root, table);
    let thead = doc.create_element(Tag::THead);
    let tbody = doc.create_element(Tag::TBody);
    doc.append_child(table, thead);
    doc.append_child(table, tbody);

    let header_row = doc.create_element(Tag::Tr);
    doc.append_child(thead, header_row);
    let mut header = header_row;
    for (i, title) in ["Name", "Amount", "Actions"].iter().enumerate() {
        let th = doc.create_element(Tag::Th);
        doc.set_text(th, *title);
        doc.append_child(header_row, th);
        if i == 0 {
            doc.get_mut(th).unwrap().classes.add("sort-asc");
            doc.listen(th, EventKind::Click);
            header = th;
        }
    }

    let row = doc.create_element(Tag::Tr);
    doc.append_child(tbody, row);
    doc.listen(row, EventKind::Click);
    for value in ["Bob", "5"] {
        let td = doc.create_element(Tag::Td);
        doc.set_text(td, value);
        doc.append_child(row, td);
    }
    let action_cell = doc.create_element(Tag::Td);
    doc.append_child(row, action_cell);
    let button = doc.create_element(Tag::Button);
    doc.get_mut(button).unwrap().classes.add_all("action-button danger");
    doc.get_mut(button).unwrap().title = Some("Delete".to_string());
    let icon = doc.create_element(Tag::Icon);
    doc.get_mut(icon).unwrap().classes.add_all("fas fa-trash");
    doc.append_child(button, icon);
    doc.append_child(action_cell, button);
    doc.listen(button, EventKind::Click);

    Fixture {
        doc,
        table,
        header,
        row,
        button,
    }
}

// ============================================================================
// Painting
// ============================================================================

#[test]
fn test_sort_marker_and_button_glyph() {
    let f = fixture();
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());
    let lines = painted.text_lines();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Name ▲"));
    assert!(lines[2].contains("[✖]"));
    assert!(lines[1].chars().all(|c| c == '─'));
}

#[test]
fn test_button_title_used_without_known_icon() {
    let mut f = fixture();
    let icon = f.doc.children(f.button)[0];
    f.doc.get_mut(icon).unwrap().classes.clear();
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());
    assert!(painted.text_lines()[2].contains("[D]"));
}

#[test]
fn test_colspan_cell_spans_all_columns() {
    let mut doc = Document::new();
    let table = doc.create_element(Tag::Table);
    let thead = doc.create_element(Tag::THead);
    let tbody = doc.create_element(Tag::TBody);
    doc.append_child(table, thead);
    doc.append_child(table, tbody);
    let header = doc.create_element(Tag::Tr);
    doc.append_child(thead, header);
    for title in ["Name", "Amount"] {
        let th = doc.create_element(Tag::Th);
        doc.set_text(th, title);
        doc.append_child(header, th);
    }
    let tr = doc.create_element(Tag::Tr);
    doc.append_child(tbody, tr);
    let td = doc.create_element(Tag::Td);
    doc.set_text(td, "No data");
    {
        let element = doc.get_mut(td).unwrap();
        element.col_span = 2;
        element.text_align = TextAlign::Center;
        element.classes.add("muted");
    }
    doc.append_child(tr, td);

    let painted = paint_table(&doc, table, &PaintOptions::default());
    let lines = painted.text_lines();
    assert_eq!(lines[2].trim(), "No data");
    assert_eq!(lines[2].chars().count(), lines[0].chars().count());
    assert!(painted.lines[2].spans.iter().all(|s| s.tone == Tone::Muted));
}

#[test]
fn test_row_class_sets_tone() {
    let mut f = fixture();
    f.doc.get_mut(f.row).unwrap().classes.add("selected");
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());

    let row_line = &painted.lines[2];
    assert_eq!(row_line.spans[0].tone, Tone::Selected);
    // The delete button keeps its own tone.
    assert!(row_line
        .spans
        .iter()
        .any(|s| s.text.contains("[✖]") && s.tone == Tone::Danger));
}

#[test]
fn test_markup_fragment_classes_map_to_tones() {
    let mut doc = Document::new();
    let table = doc.create_element(Tag::Table);
    let tr = doc.create_element(Tag::Tr);
    doc.append_child(table, tr);
    let td = doc.create_element(Tag::Td);
    doc.set_markup(td, Markup::parse(r#"<span class="highlight">回费</span> 3"#));
    doc.append_child(tr, td);

    let painted = paint_table(&doc, table, &PaintOptions::default());
    assert_eq!(painted.text_lines(), vec!["回费 3".to_string()]);
    assert_eq!(painted.lines[0].spans[0].tone, Tone::Highlight);
}

#[test]
fn test_long_cells_are_truncated() {
    let mut doc = Document::new();
    let table = doc.create_element(Tag::Table);
    let tr = doc.create_element(Tag::Tr);
    doc.append_child(table, tr);
    let td = doc.create_element(Tag::Td);
    doc.set_text(td, "a very long description that keeps going");
    doc.append_child(tr, td);

    let options = PaintOptions::default().with_max_column_width(10);
    let painted = paint_table(&doc, table, &options);
    assert_eq!(painted.text_lines()[0], "a very lo…");
}

// ============================================================================
// Hit Testing
// ============================================================================

#[test]
fn test_click_on_button_hits_button() {
    let f = fixture();
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());
    let rect = painted.layout.get(f.button).unwrap();

    let hit = hit_test(&painted.layout, &f.doc, f.doc.root(), rect.x, rect.y);
    assert_eq!(hit, Some(f.button));
}

#[test]
fn test_click_on_plain_cell_hits_row() {
    let f = fixture();
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());

    assert_eq!(hit_test(&painted.layout, &f.doc, f.doc.root(), 0, 2), Some(f.row));
    assert_eq!(hit_test(&painted.layout, &f.doc, f.doc.root(), 0, 0), Some(f.header));
}

#[test]
fn test_rule_line_hits_nothing_clickable() {
    let f = fixture();
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());

    assert_eq!(hit_test(&painted.layout, &f.doc, f.doc.root(), 0, 1), None);
    assert_eq!(
        hit_test_any(&painted.layout, &f.doc, f.doc.root(), 0, 1),
        Some(f.table)
    );
    assert_eq!(hit_test(&painted.layout, &f.doc, f.doc.root(), 0, 40), None);
}

#[test]
fn test_offset_layout_follows_screen_position() {
    let f = fixture();
    let painted = paint_table(&f.doc, f.table, &PaintOptions::default());
    let shifted = painted.layout.offset(0, 2);

    assert_eq!(hit_test(&shifted, &f.doc, f.doc.root(), 0, 4), Some(f.row));
}
