//! Plain-record form of nodes.
//!
//! A [`NodeRecord`] is an owned, self-contained copy of a node and its
//! subtree. The parser produces records, insertions consume them, and any
//! subtree can be exported as one. Records carry no path: a node gets its
//! address only once it is imported into a tree and the tree is re-addressed.

use serde::{Deserialize, Serialize};

use crate::{AttributesMap, DomTree, ElementData, HeaderData, NodeId, NodeKind, PlaceholderData};

/// An owned node with its subtree, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeRecord {
    /// A named tag.
    Element {
        /// Tag name, case preserved.
        name: String,
        /// Attributes in source order.
        #[serde(default)]
        attributes: AttributesMap,
        /// Child records. Always empty when `is_void` is set.
        #[serde(default)]
        children: Vec<NodeRecord>,
        /// Void elements never have children.
        #[serde(default)]
        is_void: bool,
    },
    /// A literal character span.
    Text {
        /// The characters.
        text: String,
    },
    /// A comment body.
    Comment {
        /// Body without `<!--`/`-->`.
        comment: String,
    },
    /// A doctype body.
    Doctype {
        /// Body without `<!DOCTYPE`/`>`.
        doctype: String,
    },
    /// An XML-style header.
    Header {
        /// Header name.
        name: String,
        /// `version` pseudo-attribute.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        /// `encoding` pseudo-attribute.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        encoding: Option<String>,
    },
    /// A `{{key}}` placeholder.
    Placeholder {
        /// Placeholder key.
        key: String,
        /// Bound value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl NodeRecord {
    /// A non-void element without attributes or children.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::Element {
            name: name.into(),
            attributes: AttributesMap::new(),
            children: Vec::new(),
            is_void: false,
        }
    }

    /// A void element without attributes.
    #[must_use]
    pub fn void_element(name: impl Into<String>) -> Self {
        Self::Element {
            name: name.into(),
            attributes: AttributesMap::new(),
            children: Vec::new(),
            is_void: true,
        }
    }

    /// A text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// A comment node.
    #[must_use]
    pub fn comment(comment: impl Into<String>) -> Self {
        Self::Comment {
            comment: comment.into(),
        }
    }

    /// A doctype node.
    #[must_use]
    pub fn doctype(doctype: impl Into<String>) -> Self {
        Self::Doctype {
            doctype: doctype.into(),
        }
    }

    /// An unbound placeholder.
    #[must_use]
    pub fn placeholder(key: impl Into<String>) -> Self {
        Self::Placeholder {
            key: key.into(),
            value: None,
        }
    }

    /// Element name, if this is an element.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Child records; empty for every kind but non-void elements.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Attributes; `None` unless this is an element.
    #[must_use]
    pub fn attributes(&self) -> Option<&AttributesMap> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}

impl DomTree {
    /// Build an addressed tree whose root collection is `records`.
    #[must_use]
    pub fn from_records(records: &[NodeRecord]) -> Self {
        let mut tree = Self::new();
        for record in records {
            let id = tree.import(record);
            tree.append_child(NodeId::ROOT, id);
        }
        tree.readdress();
        tree
    }

    /// Deep-copy `record` into the arena as a detached subtree with empty
    /// paths. Attach it with [`DomTree::insert_child`] and re-address.
    pub fn import(&mut self, record: &NodeRecord) -> NodeId {
        let (kind, children) = match record {
            NodeRecord::Element {
                name,
                attributes,
                children,
                is_void,
            } => (
                NodeKind::Element(ElementData {
                    name: name.clone(),
                    attrs: attributes.clone(),
                    is_void: *is_void,
                }),
                if *is_void { &[][..] } else { children.as_slice() },
            ),
            NodeRecord::Text { text } => (NodeKind::Text(text.clone()), &[][..]),
            NodeRecord::Comment { comment } => (NodeKind::Comment(comment.clone()), &[][..]),
            NodeRecord::Doctype { doctype } => (NodeKind::Doctype(doctype.clone()), &[][..]),
            NodeRecord::Header {
                name,
                version,
                encoding,
            } => (
                NodeKind::Header(HeaderData {
                    name: name.clone(),
                    version: version.clone(),
                    encoding: encoding.clone(),
                }),
                &[][..],
            ),
            NodeRecord::Placeholder { key, value } => (
                NodeKind::Placeholder(PlaceholderData {
                    key: key.clone(),
                    value: value.clone(),
                }),
                &[][..],
            ),
        };
        let id = self.alloc(kind);
        for child in children {
            let child_id = self.import(child);
            self.append_child(id, child_id);
        }
        id
    }

    /// Export a node and its subtree. `None` for unknown ids and for the root
    /// container, which is not a node of its own.
    #[must_use]
    pub fn to_record(&self, id: NodeId) -> Option<NodeRecord> {
        let record = match self.kind(id)? {
            NodeKind::Document => return None,
            NodeKind::Element(data) => NodeRecord::Element {
                name: data.name.clone(),
                attributes: data.attrs.clone(),
                children: self
                    .children(id)
                    .iter()
                    .filter_map(|&child| self.to_record(child))
                    .collect(),
                is_void: data.is_void,
            },
            NodeKind::Text(text) => NodeRecord::text(text.clone()),
            NodeKind::Comment(comment) => NodeRecord::comment(comment.clone()),
            NodeKind::Doctype(doctype) => NodeRecord::doctype(doctype.clone()),
            NodeKind::Header(header) => NodeRecord::Header {
                name: header.name.clone(),
                version: header.version.clone(),
                encoding: header.encoding.clone(),
            },
            NodeKind::Placeholder(placeholder) => NodeRecord::Placeholder {
                key: placeholder.key.clone(),
                value: placeholder.value.clone(),
            },
        };
        Some(record)
    }

    /// Export the whole root collection.
    #[must_use]
    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.root_nodes()
            .iter()
            .filter_map(|&id| self.to_record(id))
            .collect()
    }
}
