//! Canonical markup serialization.
//!
//! - Elements: `<name attr="val" flag>children</name>`, or `<name attr="val"/>` when void
//! - Comments: `<!-- body -->`
//! - Doctypes: `<!DOCTYPE body>`
//! - Headers: `<?name version="v" encoding="e"?>`, absent fields omitted
//! - Text: verbatim
//! - Placeholders: the bound value, or `{{key}}` while unbound

use std::fmt::{self, Write};

use crate::{DomTree, NodeId, NodeKind};

impl DomTree {
    /// Serialize the whole root collection.
    #[must_use]
    pub fn to_markup(&self) -> String {
        self.children_markup(NodeId::ROOT)
    }

    /// Serialize one node, its subtree included.
    #[must_use]
    pub fn node_markup(&self, id: NodeId) -> String {
        self.nodes_markup(&[id])
    }

    /// Serialize the children of a node, concatenated (its inner markup).
    #[must_use]
    pub fn children_markup(&self, id: NodeId) -> String {
        self.nodes_markup(self.children(id))
    }

    /// Serialize a list of nodes, concatenated.
    #[must_use]
    pub fn nodes_markup(&self, ids: &[NodeId]) -> String {
        let mut out = String::new();
        for &id in ids {
            // Writing into a String cannot fail.
            let _ = self.write_node(&mut out, id);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId) -> fmt::Result {
        let Some(kind) = self.kind(id) else {
            return Ok(());
        };
        match kind {
            NodeKind::Document => self.write_children(out, id),
            NodeKind::Element(data) => {
                write!(out, "<{}", data.name)?;
                for (name, value) in &data.attrs {
                    if value.is_empty() {
                        write!(out, " {name}")?;
                    } else {
                        write!(out, " {name}=\"{value}\"")?;
                    }
                }
                if data.is_void {
                    return out.write_str("/>");
                }
                out.write_char('>')?;
                self.write_children(out, id)?;
                write!(out, "</{}>", data.name)
            }
            NodeKind::Text(text) => out.write_str(text),
            NodeKind::Comment(body) => write!(out, "<!-- {body} -->"),
            NodeKind::Doctype(body) => write!(out, "<!DOCTYPE {body}>"),
            NodeKind::Header(header) => {
                write!(out, "<?{}", header.name)?;
                if let Some(version) = header.version.as_deref().filter(|v| !v.is_empty()) {
                    write!(out, " version=\"{version}\"")?;
                }
                if let Some(encoding) = header.encoding.as_deref().filter(|e| !e.is_empty()) {
                    write!(out, " encoding=\"{encoding}\"")?;
                }
                out.write_str("?>")
            }
            NodeKind::Placeholder(placeholder) => match &placeholder.value {
                Some(value) => out.write_str(value),
                None => write!(out, "{{{{{}}}}}", placeholder.key),
            },
        }
    }

    fn write_children(&self, out: &mut String, id: NodeId) -> fmt::Result {
        for &child in self.children(id) {
            self.write_node(out, child)?;
        }
        Ok(())
    }
}
