//! Markup parser for the Tagflow toolkit.
//!
//! # Scope
//!
//! This crate implements a single left-to-right, recursive parser that turns
//! HTML- or XML-like text into [`NodeRecord`]s:
//! - Elements with quoted, unquoted and boolean attributes
//! - Void elements (`br`, `img`, ...) and explicit `<x/>` self-closing tags
//! - Verbatim bodies for `style` and `script`
//! - Comments, doctypes, `<?xml ...?>` headers and `{{key}}` placeholders
//!
//! # Not Implemented
//!
//! - Entity decoding
//! - Implicit tag closing and end-tag name matching
//! - Encoding detection

/// Parse errors.
pub mod error;
/// The recursive parser and its state machine.
pub mod parser;

pub use error::ParseError;
pub use parser::{
    Fragment, MarkupParser, ParseStatus, QuoteState, VERBATIM_TAGS, VOID_TAGS, is_verbatim_tag,
    is_void_tag, parse, parse_tree,
};
pub use tagflow_dom::NodeRecord;
