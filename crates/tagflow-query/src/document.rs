use std::fmt;

use tagflow_common::{DiagnosticEvent, DiagnosticSink, NoopSink};
use tagflow_dom::{DomTree, NodeId, NodeKind, NodeRecord};
use tagflow_html::{MarkupParser, ParseError};

use crate::query::Query;
use crate::selection::Selection;

pub(crate) const COMPONENT: &str = "Query";

/// A parsed document: the root view over a node tree it exclusively owns.
///
/// Every [`Selection`] borrows the document mutably, so edits made through a
/// selection land in this tree and are visible to whatever is selected next.
#[derive(Debug)]
pub struct Document<S: DiagnosticSink = NoopSink> {
    pub(crate) tree: DomTree,
    pub(crate) sink: S,
}

impl Document<NoopSink> {
    /// Parse `input` without recording diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMarkup`] for a `<` inside a tag.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with_sink(input, NoopSink)
    }

    /// Wrap an existing tree.
    #[must_use]
    pub fn from_tree(tree: DomTree) -> Self {
        Self::with_sink(tree, NoopSink)
    }

    /// Build a document whose root collection is a copy of `records`.
    #[must_use]
    pub fn from_records(records: &[NodeRecord]) -> Self {
        Self::from_tree(DomTree::from_records(records))
    }
}

impl<S: DiagnosticSink> Document<S> {
    /// Parse `input`, recording parser and query diagnostics into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMarkup`] for a `<` inside a tag.
    pub fn parse_with_sink(input: &str, mut sink: S) -> Result<Self, ParseError> {
        let tree = MarkupParser::new(&mut sink).parse_tree(input)?;
        Ok(Self::with_sink(tree, sink))
    }

    /// Wrap an existing tree, recording diagnostics into `sink`.
    pub fn with_sink(mut tree: DomTree, sink: S) -> Self {
        tree.readdress();
        Self { tree, sink }
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The diagnostic sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the diagnostic sink, e.g. to clear a `MemorySink`.
    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Give up the document, keeping the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The root collection.
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeId] {
        self.tree.root_nodes()
    }

    /// Deep selection over the whole document without creating a view.
    #[must_use]
    pub fn query(&self, query: impl Into<Query>) -> Vec<NodeId> {
        query.into().select(&self.tree, self.tree.root_nodes())
    }

    /// Deep selection over the whole document, as an editable view.
    pub fn select(&mut self, query: impl Into<Query>) -> Selection<'_, S> {
        let query = query.into();
        let nodes = query.select(&self.tree, self.tree.root_nodes());
        self.trace(format!("`{query}` matched {} nodes", nodes.len()));
        Selection::new(self, nodes)
    }

    /// A view holding the root collection itself.
    pub fn root_view(&mut self) -> Selection<'_, S> {
        let nodes = self.tree.root_nodes().to_vec();
        Selection::new(self, nodes)
    }

    /// Top-level elements.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        self.root_nodes()
            .iter()
            .copied()
            .filter(|&id| self.tree.is_element(id))
            .collect()
    }

    /// Bodies of the top-level comments.
    #[must_use]
    pub fn comments(&self) -> Vec<&str> {
        self.root_nodes()
            .iter()
            .filter_map(|&id| match self.tree.kind(id) {
                Some(NodeKind::Comment(body)) => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Body of the first top-level doctype.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.root_nodes()
            .iter()
            .find_map(|&id| match self.tree.kind(id) {
                Some(NodeKind::Doctype(body)) => Some(body.as_str()),
                _ => None,
            })
    }

    /// Bind `value` to every placeholder named `key`, anywhere in the document.
    pub fn populate_placeholder(&mut self, key: &str, value: &str) -> &mut Self {
        let roots = self.tree.root_nodes().to_vec();
        let _ = self.bind_placeholders(&roots, key, value);
        self
    }

    /// Serialize the whole document.
    #[must_use]
    pub fn to_markup(&self) -> String {
        self.tree.to_markup()
    }

    /// Export the whole document as records.
    #[must_use]
    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.tree.to_records()
    }

    /// Bind placeholders in the subtrees of `nodes`. Returns how many were bound.
    pub(crate) fn bind_placeholders(&mut self, nodes: &[NodeId], key: &str, value: &str) -> usize {
        let mut bound = 0;
        for &node in nodes {
            for id in self.tree.descendants(node) {
                if let Some(entry) = self.tree.get_mut(id)
                    && let NodeKind::Placeholder(placeholder) = &mut entry.kind
                    && placeholder.key == key
                {
                    placeholder.value = Some(value.to_string());
                    bound += 1;
                }
            }
        }
        self.trace(format!("bound {bound} placeholders named `{key}`"));
        bound
    }

    /// Splice `id` out of the tree by following its path from the root.
    ///
    /// Nodes that are detached, or whose path no longer leads back to them,
    /// are left alone.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> bool {
        let path = self.tree.path(id).to_vec();
        let Some((&index, parent_path)) = path.split_last() else {
            self.warning("selected node is no longer in the tree; skipping its removal".to_string());
            return false;
        };
        let parent = if parent_path.is_empty() {
            Some(NodeId::ROOT)
        } else {
            self.tree.node_at_path(parent_path)
        };
        let Some(parent) = parent.filter(|_| self.tree.node_at_path(&path) == Some(id)) else {
            self.warning(format!(
                "stale address {path:?} does not lead to the selected node; skipping its removal"
            ));
            return false;
        };
        let _ = self.tree.remove_child_at(parent, index);
        self.tree.readdress();
        self.trace(format!("removed node at {path:?}"));
        true
    }

    pub(crate) fn trace(&mut self, message: String) {
        self.sink.record(DiagnosticEvent::trace(COMPONENT, message));
    }

    pub(crate) fn warning(&mut self, message: String) {
        self.sink.record(DiagnosticEvent::warning(COMPONENT, message));
    }
}

impl<S: DiagnosticSink> fmt::Display for Document<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}
