//! Painting a `table` element into styled text lines.
//!
//! The painter walks `thead`/`tbody` rows, sizes columns by display width,
//! honours `colspan` and alignment, and turns classes into [`Tone`]s through
//! the rules in [`PaintOptions`], the way a stylesheet would. Every painted
//! element gets a rectangle in the returned [`LayoutResult`] so clicks can be
//! routed back with [`hit_test`](crate::hit_test).

use crate::document::{Document, NodeId};
use crate::element::{Content, Element, Tag, TextAlign};
use crate::layout::{LayoutResult, Rect};
use crate::text::{align_offset, display_width, single_line, truncate_to_width};

/// Visual role of a span; the terminal maps tones to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Tone {
    #[default]
    Normal,
    Header,
    Muted,
    Accent,
    Highlight,
    Danger,
    Selected,
    Focused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| display_width(&s.text)).sum()
    }

    /// A line holding one span.
    pub fn styled(text: impl Into<String>, tone: Tone) -> Self {
        let mut line = Self::default();
        line.push(text, tone, false);
        line
    }

    /// Append text, merging into the last span when the style matches.
    pub fn push(&mut self, text: impl Into<String>, tone: Tone, bold: bool) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.tone == tone && last.bold == bold => last.text.push_str(&text),
            _ => self.spans.push(Span { text, tone, bold }),
        }
    }
}

/// Class-driven presentation rules.
#[derive(Debug, Clone)]
pub struct PaintOptions {
    /// Widest a column may grow, in display columns.
    pub max_column_width: usize,
    pub column_gap: String,
    pub rule: char,
    /// Class → tone, first match wins.
    pub tone_classes: Vec<(String, Tone)>,
    /// Header class → marker appended to the title.
    pub sort_markers: Vec<(String, String)>,
    /// Icon class → glyph shown inside buttons.
    pub icon_glyphs: Vec<(String, String)>,
}

impl Default for PaintOptions {
    fn default() -> Self {
        let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self {
            max_column_width: 28,
            column_gap: " │ ".to_string(),
            rule: '─',
            tone_classes: vec![
                ("cursor".to_string(), Tone::Focused),
                ("selected".to_string(), Tone::Selected),
                ("highlight".to_string(), Tone::Highlight),
                ("danger".to_string(), Tone::Danger),
                ("accent".to_string(), Tone::Accent),
                ("muted".to_string(), Tone::Muted),
            ],
            sort_markers: pairs(&[("sort-asc", " ▲"), ("sort-desc", " ▼")]),
            icon_glyphs: pairs(&[
                ("fa-edit", "✎"),
                ("fa-pen", "✎"),
                ("fa-trash", "✖"),
                ("fa-trash-alt", "✖"),
                ("fa-eye", "◉"),
                ("fa-copy", "⧉"),
            ]),
        }
    }
}

impl PaintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width.max(1);
        self
    }

    /// Add a class rule ahead of the defaults.
    pub fn with_tone(mut self, class: impl Into<String>, tone: Tone) -> Self {
        self.tone_classes.insert(0, (class.into(), tone));
        self
    }

    pub fn with_icon(mut self, class: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.icon_glyphs.insert(0, (class.into(), glyph.into()));
        self
    }

    fn tone_of(&self, element: &Element) -> Option<Tone> {
        self.tone_classes
            .iter()
            .find(|(class, _)| element.has_class(class))
            .map(|(_, tone)| *tone)
    }

    fn tone_of_classes(&self, classes: &[String]) -> Option<Tone> {
        self.tone_classes
            .iter()
            .find(|(class, _)| classes.iter().any(|c| c == class))
            .map(|(_, tone)| *tone)
    }

    fn sort_marker(&self, element: &Element) -> Option<&str> {
        self.sort_markers
            .iter()
            .find(|(class, _)| element.has_class(class))
            .map(|(_, marker)| marker.as_str())
    }

    fn glyph(&self, element: &Element) -> Option<&str> {
        self.icon_glyphs
            .iter()
            .find(|(class, _)| element.has_class(class))
            .map(|(_, glyph)| glyph.as_str())
    }
}

/// Painted lines plus where each element landed.
#[derive(Debug, Clone, Default)]
pub struct Painted {
    pub lines: Vec<Line>,
    pub layout: LayoutResult,
}

impl Painted {
    /// Lines as plain strings, for logs and tests.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }

    pub fn width(&self) -> usize {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }
}

// =============================================================================
// Cell model
// =============================================================================

struct Piece {
    text: String,
    tone: Option<Tone>,
    bold: bool,
    node: Option<NodeId>,
}

struct CellPaint {
    node: NodeId,
    span: usize,
    align: TextAlign,
    tone: Option<Tone>,
    pieces: Vec<Piece>,
}

impl CellPaint {
    fn width(&self) -> usize {
        self.pieces.iter().map(|p| display_width(&p.text)).sum()
    }
}

struct RowPaint {
    node: NodeId,
    header: bool,
    tone: Option<Tone>,
    cells: Vec<CellPaint>,
}

fn collect_rows(doc: &Document, table: NodeId, options: &PaintOptions) -> Vec<RowPaint> {
    let mut rows = Vec::new();
    for section in doc.children(table) {
        let Some(element) = doc.get(*section) else {
            continue;
        };
        match element.tag {
            Tag::THead | Tag::TBody => {
                let header = element.tag == Tag::THead;
                for row in doc.children(*section) {
                    if let Some(paint) = row_paint(doc, *row, header, options) {
                        rows.push(paint);
                    }
                }
            }
            Tag::Tr => {
                if let Some(paint) = row_paint(doc, *section, false, options) {
                    rows.push(paint);
                }
            }
            _ => {}
        }
    }
    rows
}

fn row_paint(doc: &Document, row: NodeId, header: bool, options: &PaintOptions) -> Option<RowPaint> {
    let element = doc.get(row).filter(|e| e.tag == Tag::Tr)?;
    let cells = element
        .children()
        .iter()
        .filter_map(|cell| cell_paint(doc, *cell, options))
        .collect();
    Some(RowPaint {
        node: row,
        header,
        tone: options.tone_of(element),
        cells,
    })
}

fn cell_paint(doc: &Document, cell: NodeId, options: &PaintOptions) -> Option<CellPaint> {
    let element = doc.get(cell).filter(|e| e.tag.is_cell())?;
    let mut pieces = content_pieces(element.content(), options);

    for (i, child) in element.children().iter().enumerate() {
        if i > 0 || !pieces.is_empty() {
            pieces.push(Piece {
                text: " ".to_string(),
                tone: None,
                bold: false,
                node: None,
            });
        }
        pieces.extend(child_pieces(doc, *child, options));
    }

    if element.tag == Tag::Th {
        if let Some(marker) = options.sort_marker(element) {
            pieces.push(Piece {
                text: marker.to_string(),
                tone: None,
                bold: true,
                node: None,
            });
        }
    }

    Some(CellPaint {
        node: cell,
        span: usize::from(element.col_span.max(1)),
        align: element.text_align,
        tone: options.tone_of(element),
        pieces,
    })
}

fn content_pieces(content: &Content, options: &PaintOptions) -> Vec<Piece> {
    match content {
        Content::None => Vec::new(),
        Content::Text(text) => vec![Piece {
            text: single_line(text),
            tone: None,
            bold: false,
            node: None,
        }],
        Content::Markup(markup) => markup
            .fragments()
            .iter()
            .map(|fragment| Piece {
                text: single_line(&fragment.text),
                tone: options.tone_of_classes(&fragment.classes),
                bold: fragment.bold,
                node: None,
            })
            .collect(),
    }
}

fn child_pieces(doc: &Document, node: NodeId, options: &PaintOptions) -> Vec<Piece> {
    let Some(element) = doc.get(node) else {
        return Vec::new();
    };
    match element.tag {
        Tag::Button => {
            let glyph = element
                .children()
                .iter()
                .filter_map(|c| doc.get(*c))
                .find_map(|icon| options.glyph(icon))
                .map(str::to_string)
                .or_else(|| {
                    let text = doc.text_content(node);
                    (!text.is_empty()).then_some(text)
                })
                .or_else(|| {
                    element
                        .title
                        .as_deref()
                        .and_then(|t| t.chars().next())
                        .map(String::from)
                })
                .unwrap_or_else(|| "•".to_string());
            vec![Piece {
                text: format!("[{}]", single_line(&glyph)),
                tone: options.tone_of(element),
                bold: false,
                node: Some(node),
            }]
        }
        Tag::Icon => vec![Piece {
            text: options.glyph(element).unwrap_or("").to_string(),
            tone: options.tone_of(element),
            bold: false,
            node: None,
        }],
        _ => vec![Piece {
            text: single_line(&doc.text_content(node)),
            tone: options.tone_of(element),
            bold: false,
            node: element.listens_to(crate::EventKind::Click).then_some(node),
        }],
    }
}

// =============================================================================
// Layout
// =============================================================================

fn column_widths(rows: &[RowPaint], options: &PaintOptions) -> Vec<usize> {
    let columns = rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.span).sum::<usize>())
        .max()
        .unwrap_or(0);
    let mut widths = vec![1usize; columns];
    for row in rows {
        let mut col = 0;
        for cell in &row.cells {
            if cell.span == 1 {
                if let Some(width) = widths.get_mut(col) {
                    *width = (*width).max(cell.width().min(options.max_column_width));
                }
            }
            col += cell.span;
        }
    }
    widths
}

/// Paint the `table` element at `table` into lines.
///
/// Unknown or stale handles paint nothing.
pub fn paint_table(doc: &Document, table: NodeId, options: &PaintOptions) -> Painted {
    let mut painted = Painted::default();
    if doc.get(table).is_none() {
        return painted;
    }

    let rows = collect_rows(doc, table, options);
    let widths = column_widths(&rows, options);
    let gap_width = display_width(&options.column_gap);
    let total_width =
        widths.iter().sum::<usize>() + gap_width * widths.len().saturating_sub(1);

    let mut header_done = false;
    for row in &rows {
        if !row.header && !header_done && !painted.lines.is_empty() {
            push_rule(&mut painted, options, total_width);
        }
        if !row.header {
            header_done = true;
        }
        paint_row(&mut painted, row, &widths, options, total_width);
    }

    let height = painted.lines.len() as u16;
    painted
        .layout
        .insert(table, Rect::new(0, 0, total_width as u16, height));
    painted
}

fn push_rule(painted: &mut Painted, options: &PaintOptions, width: usize) {
    let mut line = Line::default();
    line.push(options.rule.to_string().repeat(width), Tone::Muted, false);
    painted.lines.push(line);
}

fn paint_row(
    painted: &mut Painted,
    row: &RowPaint,
    widths: &[usize],
    options: &PaintOptions,
    total_width: usize,
) {
    let y = painted.lines.len() as u16;
    let row_tone = if row.header {
        Tone::Header
    } else {
        row.tone.unwrap_or_default()
    };
    let mut line = Line::default();
    let mut col = 0;
    let mut x = 0usize;

    for (i, cell) in row.cells.iter().enumerate() {
        if i > 0 {
            line.push(options.column_gap.clone(), Tone::Muted, false);
            x += display_width(&options.column_gap);
        }
        let end = (col + cell.span).min(widths.len());
        let span_count = end.saturating_sub(col);
        let width = widths[col.min(end)..end].iter().sum::<usize>()
            + display_width(&options.column_gap) * span_count.saturating_sub(1);
        let cell_tone = if row.header {
            Tone::Header
        } else {
            cell.tone.unwrap_or(row_tone)
        };

        paint_cell(painted, &mut line, cell, x, y, width, cell_tone, row.header);
        x += width;
        col = end;
    }

    painted
        .layout
        .insert(row.node, Rect::new(0, y, total_width.max(x) as u16, 1));
    painted.lines.push(line);
}

#[allow(clippy::too_many_arguments)]
fn paint_cell(
    painted: &mut Painted,
    line: &mut Line,
    cell: &CellPaint,
    x: usize,
    y: u16,
    width: usize,
    tone: Tone,
    header: bool,
) {
    let content_width = cell.width().min(width);
    let left = align_offset(content_width, width, cell.align);
    line.push(" ".repeat(left), tone, false);

    let mut used = left;
    for piece in &cell.pieces {
        let remaining = width.saturating_sub(used);
        if remaining == 0 {
            break;
        }
        let text = truncate_to_width(&piece.text, remaining);
        let piece_width = display_width(&text);
        if let Some(node) = piece.node {
            painted.layout.insert(
                node,
                Rect::new((x + used) as u16, y, piece_width as u16, 1),
            );
        }
        line.push(text, piece.tone.unwrap_or(tone), piece.bold || header);
        used += piece_width;
    }

    line.push(" ".repeat(width.saturating_sub(used)), tone, false);
    painted
        .layout
        .insert(cell.node, Rect::new(x as u16, y, width as u16, 1));
}
