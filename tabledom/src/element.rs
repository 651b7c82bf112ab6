use std::collections::BTreeMap;
use std::fmt;

use crate::document::NodeId;
use crate::event::{EventKind, HandlerId};
use crate::markup::Markup;

/// Element kinds understood by the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Table,
    THead,
    TBody,
    Tr,
    Th,
    Td,
    Button,
    Icon,
    Span,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Table => "table",
            Tag::THead => "thead",
            Tag::TBody => "tbody",
            Tag::Tr => "tr",
            Tag::Th => "th",
            Tag::Td => "td",
            Tag::Button => "button",
            Tag::Icon => "i",
            Tag::Span => "span",
        }
    }

    /// Table cells: `th` and `td`.
    pub fn is_cell(self) -> bool {
        matches!(self, Tag::Th | Tag::Td)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inline content of an element.
///
/// Setting content through [`Document::set_text`](crate::Document::set_text) or
/// [`Document::set_markup`](crate::Document::set_markup) drops the element's
/// children, mirroring `textContent` / `innerHTML` assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    #[default]
    None,
    Text(String),
    Markup(Markup),
}

impl Content {
    /// The content as plain text, markup tags stripped.
    pub fn plain_text(&self) -> String {
        match self {
            Content::None => String::new(),
            Content::Text(text) => text.clone(),
            Content::Markup(markup) => markup.plain_text(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::None => true,
            Content::Text(text) => text.is_empty(),
            Content::Markup(markup) => markup.fragments().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Ordered, duplicate-free set of class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace separated class attribute.
    pub fn parse(classes: &str) -> Self {
        let mut list = Self::new();
        list.add_all(classes);
        list
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    /// Add a class. Returns `false` if it was already present.
    pub fn add(&mut self, class: &str) -> bool {
        let class = class.trim();
        if class.is_empty() || self.contains(class) {
            return false;
        }
        self.0.push(class.to_string());
        true
    }

    /// Add every class of a whitespace separated list.
    pub fn add_all(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            self.add(class);
        }
    }

    /// Remove a class. Returns `true` if it was present.
    pub fn remove(&mut self, class: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != class);
        self.0.len() != before
    }

    /// Flip a class and return whether it is now present.
    pub fn toggle(&mut self, class: &str) -> bool {
        if self.remove(class) {
            false
        } else {
            self.add(class)
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    // Identity
    pub tag: Tag,
    pub(crate) id: Option<String>,

    // Attributes
    pub classes: ClassList,
    /// `data-*` attributes, keyed without the prefix.
    pub dataset: BTreeMap<String, String>,
    pub title: Option<String>,
    pub col_span: u16,
    pub text_align: TextAlign,

    // Content
    pub(crate) content: Content,

    // Tree
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    // Interaction
    pub(crate) listeners: Vec<(EventKind, HandlerId)>,
}

impl Element {
    pub(crate) fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: ClassList::new(),
            dataset: BTreeMap::new(),
            title: None,
            col_span: 1,
            text_align: TextAlign::Left,
            content: Content::None,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.dataset.insert(key.into(), value.into());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn listeners(&self) -> &[(EventKind, HandlerId)] {
        &self.listeners
    }

    /// Whether any listener is bound for `kind`.
    pub fn listens_to(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }
}
