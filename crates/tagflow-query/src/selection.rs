use tagflow_common::{DiagnosticSink, NoopSink};
use tagflow_dom::{NodeId, NodeKind, NodeRecord};
use tagflow_html::{MarkupParser, ParseError};

use crate::document::Document;
use crate::query::Query;

/// A view: some nodes of a [`Document`], selected by a query.
///
/// The view holds node ids only. Every edit goes straight to the document's
/// tree, and structural edits re-address the whole tree before returning.
/// Edits apply to the elements of the view; other nodes are passed over.
#[derive(Debug)]
pub struct Selection<'a, S: DiagnosticSink = NoopSink> {
    document: &'a mut Document<S>,
    nodes: Vec<NodeId>,
}

impl<'a, S: DiagnosticSink> Selection<'a, S> {
    pub(crate) const fn new(document: &'a mut Document<S>, nodes: Vec<NodeId>) -> Self {
        Self { document, nodes }
    }

    /// Selected nodes, in selection order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of selected nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Selected elements only.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .copied()
            .filter(|&id| self.document.tree.is_element(id))
            .collect()
    }

    /// The document this view is over.
    #[must_use]
    pub fn document(&self) -> &Document<S> {
        self.document
    }

    /// Give up the view, keeping the document borrow.
    #[must_use]
    pub fn into_document(self) -> &'a mut Document<S> {
        self.document
    }

    /// Deep selection starting from this view's nodes.
    #[must_use]
    pub fn select(self, query: impl Into<Query>) -> Self {
        let Self { document, nodes } = self;
        let query = query.into();
        let found = query.select(&document.tree, &nodes);
        document.trace(format!(
            "`{query}` matched {} of {} nodes in view",
            found.len(),
            nodes.len()
        ));
        Self::new(document, found)
    }

    /// Insert a copy of `record` into every selected element, at `index` or
    /// at the end. An index past the end appends. Void elements are skipped.
    pub fn insert(&mut self, record: &NodeRecord, index: Option<usize>) -> &mut Self {
        let mut inserted = 0;
        for &id in &self.nodes {
            let Some(element) = self.document.tree.as_element(id) else {
                continue;
            };
            if element.is_void {
                let message = format!("<{}> is void; not inserting into it", element.name);
                self.document.warning(message);
                continue;
            }
            let copy = self.document.tree.import(record);
            match index {
                Some(index) => self.document.tree.insert_child(id, index, copy),
                None => self.document.tree.append_child(id, copy),
            }
            inserted += 1;
        }
        self.document.tree.readdress();
        self.document
            .trace(format!("inserted a node into {inserted} elements"));
        self
    }

    /// Remove the child at `index` of every selected element. Elements with
    /// fewer children are left alone.
    pub fn remove_at(&mut self, index: usize) -> &mut Self {
        let removed = self.remove_children_at(index);
        self.document.tree.readdress();
        self.document
            .trace(format!("removed child {index} of {removed} elements"));
        self
    }

    /// Remove the selected nodes themselves from the document and return it.
    ///
    /// Each node is located by following its path from the root; the tree is
    /// re-addressed after every removal, so later paths stay accurate. Nodes
    /// already gone (for instance, inside an earlier removed node) are skipped.
    pub fn remove_selected(self) -> &'a mut Document<S> {
        let Self { document, nodes } = self;
        let removed = nodes
            .into_iter()
            .filter(|&id| document.remove_node(id))
            .count();
        document.tree.readdress();
        document.trace(format!("removed {removed} selected nodes"));
        document
    }

    /// Remove every child of every selected element.
    pub fn remove_all_children(&mut self) -> &mut Self {
        let most = self
            .nodes
            .iter()
            .filter(|&&id| self.document.tree.is_element(id))
            .map(|&id| self.document.tree.children(id).len())
            .max()
            .unwrap_or(0);
        for index in (0..most).rev() {
            let _ = self.remove_children_at(index);
        }
        self.document.tree.readdress();
        self.document
            .trace(format!("cleared the children of {} elements", self.nodes.len()));
        self
    }

    /// Set an attribute on every selected element. An existing attribute keeps
    /// its position; a new one is appended.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        for &id in &self.nodes {
            if let Some(element) = self.document.tree.as_element_mut(id) {
                let _ = element.attrs.insert(name.to_string(), value.to_string());
            }
        }
        self.document
            .trace(format!("set {name}=\"{value}\" on {} nodes", self.nodes.len()));
        self
    }

    /// Remove an attribute from every selected element.
    pub fn remove_attribute(&mut self, name: &str) -> &mut Self {
        for &id in &self.nodes {
            if let Some(element) = self.document.tree.as_element_mut(id) {
                let _ = element.attrs.shift_remove(name);
            }
        }
        self.document
            .trace(format!("removed {name} from {} nodes", self.nodes.len()));
        self
    }

    /// Value of an attribute on the first selected element.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let first = self
            .nodes
            .iter()
            .find_map(|&id| self.document.tree.as_element(id))?;
        first.attrs.get(name).map(String::as_str)
    }

    /// Per selected node: the markup of an element's children, the body of a
    /// text node, or an empty string for anything else.
    #[must_use]
    pub fn inner_markup(&self) -> Vec<String> {
        let tree = &self.document.tree;
        self.nodes
            .iter()
            .map(|&id| match tree.kind(id) {
                Some(NodeKind::Element(_)) => tree.children_markup(id),
                Some(NodeKind::Text(text)) => text.clone(),
                _ => String::new(),
            })
            .collect()
    }

    /// Replace the content of every selected node.
    ///
    /// Elements get the children parsed from `markup`, each element its own
    /// copy; text nodes get `markup` as their literal body. Void elements are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `markup` is malformed; the document is then
    /// left unchanged.
    pub fn set_inner_markup(&mut self, markup: &str) -> Result<&mut Self, ParseError> {
        let needs_parse = self.nodes.iter().any(|&id| {
            self.document
                .tree
                .as_element(id)
                .is_some_and(|element| !element.is_void)
        });
        let records = if needs_parse {
            MarkupParser::new(&mut self.document.sink).parse(markup)?
        } else {
            Vec::new()
        };

        for &id in &self.nodes {
            if let Some(element) = self.document.tree.as_element(id) {
                if element.is_void {
                    let message = format!("<{}> is void; not setting its content", element.name);
                    self.document.warning(message);
                    continue;
                }
                let children = records
                    .iter()
                    .map(|record| self.document.tree.import(record))
                    .collect();
                self.document.tree.replace_children(id, children);
            } else if let Some(node) = self.document.tree.get_mut(id)
                && let NodeKind::Text(text) = &mut node.kind
            {
                markup.clone_into(text);
            }
        }
        self.document.tree.readdress();
        self.document
            .trace(format!("replaced the content of {} nodes", self.nodes.len()));
        Ok(self)
    }

    /// Rename every selected element.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        for &id in &self.nodes {
            if let Some(element) = self.document.tree.as_element_mut(id) {
                name.clone_into(&mut element.name);
            }
        }
        self.document.tree.readdress();
        self.document
            .trace(format!("renamed {} nodes to <{name}>", self.nodes.len()));
        self
    }

    /// Bind `value` to every placeholder named `key` within the selected
    /// nodes' subtrees.
    pub fn populate_placeholder(&mut self, key: &str, value: &str) -> &mut Self {
        let _ = self.document.bind_placeholders(&self.nodes, key, value);
        self
    }

    /// Serialize the selected nodes, concatenated.
    #[must_use]
    pub fn to_markup(&self) -> String {
        self.document.tree.nodes_markup(&self.nodes)
    }

    fn remove_children_at(&mut self, index: usize) -> usize {
        let mut removed = 0;
        for &id in &self.nodes {
            if self.document.tree.is_element(id)
                && self.document.tree.remove_child_at(id, index).is_some()
            {
                removed += 1;
            }
        }
        removed
    }
}
