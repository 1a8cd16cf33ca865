//! The query language.
//!
//! A query is a single string whose first character picks what it matches:
//!
//! - `#main`: elements whose `id` attribute is `main`
//! - `.lead`: elements whose whitespace-separated `class` list contains `lead`
//! - `*hello`: text nodes containing `hello`, ignoring case
//! - `div`: elements named exactly `div`

use std::collections::HashSet;
use std::fmt;

use tagflow_dom::{DomTree, NodeId, NodeKind};

/// A parsed query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// `#value`: the `id` attribute equals the value.
    Id(String),
    /// `.value`: the `class` list contains the value.
    Class(String),
    /// `*value`: a text node whose body contains the value, case-insensitively.
    Text(String),
    /// `value`: the element name equals the value, case-sensitively.
    Name(String),
}

impl Query {
    /// Parse a query string by its leading sigil.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        if let Some(id) = query.strip_prefix('#') {
            Self::Id(id.to_string())
        } else if let Some(class) = query.strip_prefix('.') {
            Self::Class(class.to_string())
        } else if let Some(text) = query.strip_prefix('*') {
            Self::Text(text.to_string())
        } else {
            Self::Name(query.to_string())
        }
    }

    /// Whether the node `id` of `tree` matches, looking at that node only.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match (self, tree.kind(id)) {
            (Self::Id(value), Some(NodeKind::Element(data))) => data.id() == Some(value.as_str()),
            (Self::Class(value), Some(NodeKind::Element(data))) => {
                data.classes().contains(value.as_str())
            }
            (Self::Name(value), Some(NodeKind::Element(data))) => data.name == *value,
            (Self::Text(value), Some(NodeKind::Text(text))) => {
                text.to_lowercase().contains(&value.to_lowercase())
            }
            _ => false,
        }
    }

    /// Deep selection starting from `level`.
    ///
    /// Nodes of `level` that match come first. Then, for every element of
    /// `level` in order, the matches found among its children (recursively)
    /// follow; when those inner matches include text nodes, the text nodes are
    /// replaced by the element itself, placed ahead of the remaining inner
    /// matches. Each node appears once, at its first position.
    #[must_use]
    pub fn select(&self, tree: &DomTree, level: &[NodeId]) -> Vec<NodeId> {
        let mut found: Vec<NodeId> = level
            .iter()
            .copied()
            .filter(|&id| self.matches(tree, id))
            .collect();

        for &id in level {
            if !tree.is_element(id) {
                continue;
            }
            let inner = self.select(tree, tree.children(id));
            if inner.iter().any(|&node| tree.is_text(node)) {
                found.push(id);
                found.extend(inner.into_iter().filter(|&node| !tree.is_text(node)));
            } else {
                found.extend(inner);
            }
        }

        let mut seen = HashSet::new();
        found.retain(|&id| seen.insert(id));
        found
    }
}

impl From<&str> for Query {
    fn from(query: &str) -> Self {
        Self::parse(query)
    }
}

impl From<String> for Query {
    fn from(query: String) -> Self {
        Self::parse(&query)
    }
}

impl From<&String> for Query {
    fn from(query: &String) -> Self {
        Self::parse(query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(value) => write!(f, "#{value}"),
            Self::Class(value) => write!(f, ".{value}"),
            Self::Text(value) => write!(f, "*{value}"),
            Self::Name(value) => f.write_str(value),
        }
    }
}
