#![forbid(unsafe_code)]

//! Generational arena of elements with attach/detach and deep cloning.
//!
//! Invariants:
//! - The root ("body") always exists and can never be detached or removed.
//! - A node has at most one parent; `append_child` re-parents silently.
//! - Removing a subtree bumps every freed slot's generation, so stale
//!   [`NodeId`]s are rejected rather than resolving to recycled nodes.
//!
//! Failure modes:
//! - Operations on stale ids return `None` / [`DomError::StaleNode`];
//!   nothing panics.
//! - Appending a node under its own descendant is rejected with
//!   [`DomError::WouldCycle`].

use ahash::AHashMap;
use scrim_style::InlineStyle;
use tracing::trace;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Raw slot index, for logging only.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// Errors from tree mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The id refers to a node that no longer exists.
    StaleNode,
    /// The append would make a node its own ancestor.
    WouldCycle,
    /// The root cannot be detached or removed.
    RootImmutable,
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleNode => write!(f, "node id is stale or foreign"),
            Self::WouldCycle => write!(f, "append would create a cycle"),
            Self::RootImmutable => write!(f, "the document root cannot be moved or removed"),
        }
    }
}

impl std::error::Error for DomError {}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    text: Option<String>,
    attrs: AHashMap<String, String>,
    style: InlineStyle,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: String) -> Self {
        Self {
            tag,
            text: None,
            attrs: AHashMap::new(),
            style: InlineStyle::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An element tree with a permanent root.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    focus: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root element.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            focus: None,
        };
        doc.root = doc.create_element("body");
        doc
    }

    /// The permanent root element.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element with the given tag.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let node = Node::new(tag.into());
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Whether the id refers to a live node in this document.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Tag name of a node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.tag.as_str())
    }

    /// Text content of a node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| n.text.as_deref())
    }

    /// Set the text content of a node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            node.text = Some(text.into());
        }
    }

    /// Attribute value of a node.
    #[must_use]
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attrs.get(key)).map(String::as_str)
    }

    /// Set an attribute on a node.
    pub fn set_attr(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            node.attrs.insert(key.into(), value.into());
        }
    }

    /// Inline style of a node.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.get(id).map(|n| &n.style)
    }

    /// Mutable inline style of a node.
    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut InlineStyle> {
        self.get_mut(id).map(|n| &mut n.style)
    }

    /// Children of a node, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Parent of a node, if attached to one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Whether the node is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Append `child` as the last child of `parent`, re-parenting if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(DomError::StaleNode);
        }
        if child == self.root {
            return Err(DomError::RootImmutable);
        }
        // Reject appending a node under its own subtree.
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(DomError::WouldCycle);
            }
            cursor = self.get(current).and_then(|n| n.parent);
        }
        self.unlink(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Unlink a node from its parent, keeping the subtree alive.
    ///
    /// This is how a template is held: detached but cloneable.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.contains(id) {
            return Err(DomError::StaleNode);
        }
        if id == self.root {
            return Err(DomError::RootImmutable);
        }
        self.unlink(id);
        Ok(())
    }

    /// Remove a node and its whole subtree, freeing the slots.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.contains(id) {
            return Err(DomError::StaleNode);
        }
        if id == self.root {
            return Err(DomError::RootImmutable);
        }
        self.unlink(id);
        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                freed += 1;
                stack.extend(node.children);
            }
            if self.focus == Some(current) {
                self.focus = None;
            }
        }
        trace!(root = id.index(), freed, "removed subtree");
        Ok(())
    }

    /// Remove every child subtree of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children {
            let _ = self.remove_subtree(child);
        }
    }

    /// Deep-clone a subtree, returning the detached clone root.
    ///
    /// Tag, text, attributes, and inline style are copied; ids are fresh.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let clone = self.clone_rec(id).ok_or(DomError::StaleNode)?;
        trace!(source = id.index(), clone = clone.index(), "cloned subtree");
        Ok(clone)
    }

    fn clone_rec(&mut self, id: NodeId) -> Option<NodeId> {
        let (tag, text, attrs, style, children) = {
            let node = self.get(id)?;
            (
                node.tag.clone(),
                node.text.clone(),
                node.attrs.clone(),
                node.style.clone(),
                node.children.clone(),
            )
        };
        let clone = self.create_element(tag);
        if let Some(node) = self.get_mut(clone) {
            node.text = text;
            node.attrs = attrs;
            node.style = style;
        }
        for child in children {
            if let Some(child_clone) = self.clone_rec(child) {
                let _ = self.append_child(clone, child_clone);
            }
        }
        Some(clone)
    }

    /// First descendant (depth-first, including `root`) carrying the
    /// attribute `key=value`.
    #[must_use]
    pub fn descendant_with_attr(&self, root: NodeId, key: &str, value: &str) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let node = self.get(current)?;
            if node.attrs.get(key).is_some_and(|v| v == value) {
                return Some(current);
            }
            // Push in reverse so the first child is visited first.
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Move focus to a node. The single focus marker this library supports.
    pub fn set_focus(&mut self, id: NodeId) {
        if self.contains(id) {
            self.focus = Some(id);
        }
    }

    /// The currently focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.filter(|id| self.contains(*id))
    }

    /// Structural equality of two subtrees: tag, text, attributes, style,
    /// and child shape, ignoring ids.
    #[must_use]
    pub fn subtree_eq(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(na), Some(nb)) = (self.get(a), self.get(b)) else {
            return false;
        };
        if na.tag != nb.tag
            || na.text != nb.text
            || na.attrs != nb.attrs
            || na.style != nb.style
            || na.children.len() != nb.children.len()
        {
            return false;
        }
        na.children
            .iter()
            .zip(&nb.children)
            .all(|(ca, cb)| self.subtree_eq(*ca, *cb))
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }
}
