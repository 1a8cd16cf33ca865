//! Node tree for the Tagflow markup toolkit.
//!
//! This crate provides an arena-based tree of typed markup nodes, the
//! addressing pass that gives every node its positional path, the canonical
//! serializer, and the plain-record form used to move nodes in and out of a
//! tree.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! Slot 0 ([`NodeId::ROOT`]) is a `Document` container whose children are the
//! root collection; every path is relative to it. Slots are never reused, so an
//! id held by a view keeps naming the same node even after it is detached.

mod address;
mod record;
mod serialize;

use std::collections::HashSet;

use indexmap::IndexMap;

pub use record::NodeRecord;

/// Map of attribute names to values for an element, in insertion order.
pub type AttributesMap = IndexMap<String, String>;

/// Ordered child indices locating a node from the root collection down.
pub type Path = Vec<usize>;

/// A type-safe index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root container is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A node stored in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node is, with its kind-specific fields.
    pub kind: NodeKind,

    /// Containing node, `None` for the root container and for detached nodes.
    pub parent: Option<NodeId>,

    /// Ordered children. Only `Document` and non-void `Element` nodes have any.
    pub children: Vec<NodeId>,

    /// Position from the root collection, recomputed by [`DomTree::readdress`].
    /// Empty for the root container and for nodes not attached to the tree.
    pub path: Path,
}

/// Every kind of node the parser can produce, plus the root container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The container holding the root collection.
    Document,
    /// A named tag with attributes.
    Element(ElementData),
    /// A literal character span.
    Text(String),
    /// Comment body without its delimiters.
    Comment(String),
    /// Doctype body, e.g. `html`.
    Doctype(String),
    /// XML-style `<?name ...?>` header.
    Header(HeaderData),
    /// `{{key}}` token with an optional bound value.
    Placeholder(PlaceholderData),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name, case preserved.
    pub name: String,
    /// Attributes; boolean attributes have an empty value.
    pub attrs: AttributesMap,
    /// Void elements never have children and serialize self-closed.
    pub is_void: bool,
}

impl ElementData {
    /// Create an element with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: AttributesMap::new(),
            is_void: false,
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Returns the set of class names from the class attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|classlist| classlist.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Data of an XML-style header such as `<?xml version="1.0" encoding="UTF-8"?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderData {
    /// Header name, e.g. `xml`.
    pub name: String,
    /// `version` pseudo-attribute.
    pub version: Option<String>,
    /// `encoding` pseudo-attribute.
    pub encoding: Option<String>,
}

/// Data of a `{{key}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderData {
    /// Key between the braces, trimmed.
    pub key: String,
    /// Bound value; serialized in place of the token once set.
    pub value: Option<String>,
}

/// Arena-based node tree.
///
/// All nodes live in one vector and refer to each other by [`NodeId`]. The
/// tree exclusively owns its nodes; views over it hold ids only.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes ever allocated, indexed by `NodeId`.
    /// The root container is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the empty root container.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            kind: NodeKind::Document,
            parent: None,
            children: Vec::new(),
            path: Path::new(),
        };
        Self {
            nodes: vec![document],
        }
    }

    /// Get the root container id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, detached ones and the root container included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the root container).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            path: Path::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Inserts `child` at `index` in `parent`'s children. An index past the
    /// end appends.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let Some(parent_node) = self.nodes.get_mut(parent.0) else {
            return;
        };
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        if let Some(child_node) = self.nodes.get_mut(child.0) {
            child_node.parent = Some(parent);
        }
    }

    /// Detaches and returns the child at `index`, or `None` when out of range.
    ///
    /// Every path in the detached subtree is cleared.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let parent_node = self.nodes.get_mut(parent.0)?;
        if index >= parent_node.children.len() {
            return None;
        }
        let child = parent_node.children.remove(index);
        self.detach(child);
        Some(child)
    }

    /// Detaches every child of `parent` and attaches `new_children` instead.
    pub fn replace_children(&mut self, parent: NodeId, new_children: Vec<NodeId>) {
        let Some(parent_node) = self.nodes.get_mut(parent.0) else {
            return;
        };
        let old = std::mem::take(&mut parent_node.children);
        for child in old {
            self.detach(child);
        }
        for child in new_children {
            self.append_child(parent, child);
        }
    }

    /// Mark a subtree as no longer part of the tree.
    fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
        for descendant in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(descendant.0) {
                node.path.clear();
            }
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The root collection: the top-level nodes.
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Get the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Get the path of a node. Empty when detached.
    #[must_use]
    pub fn path(&self, id: NodeId) -> &[usize] {
        self.get(id).map_or(&[], |n| n.path.as_slice())
    }

    /// Follow `path` from the root collection down.
    #[must_use]
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        if path.is_empty() {
            return None;
        }
        path.iter().try_fold(NodeId::ROOT, |current, &index| {
            self.children(current).get(index).copied()
        })
    }

    /// Whether `id` is reachable from the root container.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == NodeId::ROOT {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The node itself followed by all of its descendants, in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Whether this node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Whether this node is a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        self.as_text(id).is_some()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
