//! Recursive markup parser.

/// Main scan loop and per-character handlers.
mod core;
/// Attribute and header scanners, lookahead helpers.
mod helpers;
/// Parse status and the per-level parse state.
mod state;
/// Void and verbatim tag sets.
mod tags;

pub use self::core::{Fragment, MarkupParser, parse, parse_tree};
pub use self::state::{ParseStatus, QuoteState};
pub use self::tags::{VERBATIM_TAGS, VOID_TAGS, is_verbatim_tag, is_void_tag};
