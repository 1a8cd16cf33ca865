use thiserror::Error;

use crate::parser::ParseStatus;

/// Failures the parser does not recover from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `<` appeared while an opening or closing tag was still being read.
    #[error("malformed markup: unexpected '<' at character {position} while in {status} status")]
    MalformedMarkup {
        /// Character offset of the offending `<` in the top-level input.
        position: usize,
        /// What the parser was reading at that point.
        status: ParseStatus,
    },
}
