//! A small retained element document for terminal tables.
//!
//! `tabledom` plays the part a browser document plays for a web table: elements
//! are created, looked up by id, given classes and `data-*` attributes, nested,
//! cleared and subscribed to. Painting turns a `table` element into styled text
//! lines plus a layout that [`hit_test`] uses to route clicks back to elements.

pub mod document;
pub mod element;
pub mod event;
pub mod hit;
pub mod layout;
pub mod markup;
pub mod paint;
pub mod terminal;
pub mod text;

pub use document::{Document, NodeId};
pub use element::{ClassList, Content, Element, Tag, TextAlign};
pub use event::{EventKind, HandlerId, Propagation};
pub use hit::{hit_test, hit_test_any};
pub use layout::{LayoutResult, Rect};
pub use markup::{Fragment, Markup};
pub use paint::{paint_table, Line, PaintOptions, Painted, Span, Tone};
pub use terminal::Terminal;
