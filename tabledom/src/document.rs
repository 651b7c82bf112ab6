//! The element arena.

use std::collections::HashMap;
use std::fmt;

use crate::element::{Content, Element, Tag};
use crate::event::{EventKind, HandlerId};
use crate::markup::Markup;

/// Handle to an element in a [`Document`].
///
/// Handles carry a generation, so a handle to a removed element never
/// resolves to whatever element later reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// A tree of elements with an id registry.
///
/// The document owns a root `div` (the "body"). Elements are created detached
/// and become part of the tree once appended somewhere under the root.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    ids: HashMap<String, NodeId>,
    root: NodeId,
    next_handler: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            ids: HashMap::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            next_handler: 0,
        };
        doc.root = doc.create_element(Tag::Div);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // =========================================================================
    // Creation and access
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let element = Element::new(tag);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.element = Some(element);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                element: Some(element),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Whether `node` still refers to a live element.
    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.slots
            .get(node.index as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(node.index as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    /// Number of live elements, the root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.element.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Id registry
    // =========================================================================

    /// Find an element by its `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied().filter(|node| self.contains(*node))
    }

    /// Set the `id` attribute. The most recent holder of an id wins lookups.
    pub fn set_id(&mut self, node: NodeId, id: impl Into<String>) -> bool {
        let id = id.into();
        let Some(element) = self.get_mut(node) else {
            return false;
        };
        let previous = element.id.replace(id.clone());
        if let Some(previous) = previous {
            if self.ids.get(&previous) == Some(&node) {
                self.ids.remove(&previous);
            }
        }
        self.ids.insert(id, node);
        true
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent. Refuses to create cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.ancestors(parent).any(|a| a == child) {
            log::warn!("refusing to append {child} under its own descendant {parent}");
            return false;
        }
        self.detach(child);
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.get_mut(parent) {
            element.children.push(child);
        }
        true
    }

    /// Remove every child of `node`, freeing the removed subtrees.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = match self.get_mut(node) {
            Some(element) => std::mem::take(&mut element.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Detach `node` from its parent and free it with its descendants.
    /// The root cannot be removed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.free_subtree(node);
    }

    /// Replace the element's content with plain text.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.set_content(node, Content::Text(text.into()));
    }

    /// Replace the element's content with parsed markup.
    pub fn set_markup(&mut self, node: NodeId, markup: Markup) {
        self.set_content(node, Content::Markup(markup));
    }

    fn set_content(&mut self, node: NodeId, content: Content) {
        if !self.contains(node) {
            return;
        }
        self.clear_children(node);
        if let Some(element) = self.get_mut(node) {
            element.content = content;
        }
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.get_mut(node).and_then(|e| e.parent.take());
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|c| *c != node);
        }
    }

    fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            let Some(element) = slot.element.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);

            if let Some(id) = element.id {
                if self.ids.get(&id) == Some(&current) {
                    self.ids.remove(&id);
                }
            }
            stack.extend(element.children);
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Children of `node`; empty for stale handles.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|e| e.children()).unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|e| e.parent)
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Concatenated plain text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = self
            .get(node)
            .map(|e| e.content.plain_text())
            .unwrap_or_default();
        for child in self.children(node) {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node).is_some_and(|e| e.has_class(class))
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe `node` to `kind`. Returns `None` for stale handles.
    pub fn listen(&mut self, node: NodeId, kind: EventKind) -> Option<HandlerId> {
        if !self.contains(node) {
            return None;
        }
        let handler = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.get_mut(node)?.listeners.push((kind, handler));
        Some(handler)
    }

    /// `target` followed by its ancestors: the order an event bubbles in.
    pub fn bubble_path(&self, target: NodeId) -> Vec<NodeId> {
        if !self.contains(target) {
            return Vec::new();
        }
        std::iter::once(target).chain(self.ancestors(target)).collect()
    }

    /// Handlers for `kind` along the bubble path of `target`, innermost first.
    pub fn handlers_along(&self, target: NodeId, kind: EventKind) -> Vec<(NodeId, HandlerId)> {
        self.bubble_path(target)
            .into_iter()
            .flat_map(|node| {
                self.get(node)
                    .map(|e| e.listeners.clone())
                    .unwrap_or_default()
                    .into_iter()
                    .filter(move |(k, _)| *k == kind)
                    .map(move |(_, handler)| (node, handler))
            })
            .collect()
    }
}
