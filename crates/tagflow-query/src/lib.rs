//! Query and edit parsed markup.
//!
//! A [`Document`] owns the node tree and is the root view. [`Document::select`]
//! runs a deep [`Query`] and returns a [`Selection`], a view holding node ids
//! plus a mutable borrow of the document, through which structural and
//! attribute edits are applied to the one tree.
//!
//! ```
//! use tagflow_query::Document;
//!
//! let mut doc = Document::parse(r#"<div><a class="abc" href="/">Home</a></div>"#).unwrap();
//! doc.select(".abc").set_attribute("href", "https://example.com");
//! assert_eq!(
//!     doc.to_markup(),
//!     r#"<div><a class="abc" href="https://example.com">Home</a></div>"#
//! );
//! ```

mod document;
mod query;
mod selection;

pub use document::Document;
pub use query::Query;
pub use selection::Selection;
pub use tagflow_dom::{DomTree, NodeId, NodeRecord};
pub use tagflow_html::ParseError;
