use strum_macros::{Display, EnumIter};
use tagflow_dom::{AttributesMap, NodeRecord};

/// What the parser is currently reading. One status is active per recursion
/// level; a quote sub-mode may sit on top of [`ParseStatus::TagNameAndAttrs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ParseStatus {
    /// Plain text between constructs. The initial status.
    ScanningText,
    /// Inside `<name attr="..."`, before `>` or `/`.
    TagNameAndAttrs,
    /// Saw the `<` of an element's closing tag.
    TagClosing,
    /// Saw `/` of a closing tag or of a self-closing tag; waiting for `>`.
    TagJustClosed,
    /// An element's children were parsed; waiting for its closing tag.
    InsideElementBody,
    /// Inside `<!-- ... -->`.
    InsideComment,
    /// Inside `<!DOCTYPE ...>`.
    InsideDoctype,
    /// Inside `<? ... ?>`.
    InsideHeader,
    /// Inside `{{ ... }}`.
    InsidePlaceholder,
}

/// Quote sub-mode inside a tag's attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum QuoteState {
    /// Inside `'...'`.
    Single,
    /// Inside `"..."`.
    Double,
}

impl QuoteState {
    /// The quote character for a delimiter, if it is one.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }

    /// The character that opens and closes this quote.
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }
}

/// An element whose opening tag was read and whose closing `>` is pending.
#[derive(Debug)]
pub(super) struct PendingElement {
    pub(super) name: String,
    pub(super) attributes: AttributesMap,
    pub(super) children: Vec<NodeRecord>,
    pub(super) is_void: bool,
}

impl PendingElement {
    pub(super) fn into_record(self) -> NodeRecord {
        NodeRecord::Element {
            name: self.name,
            attributes: self.attributes,
            children: self.children,
            is_void: self.is_void,
        }
    }
}

/// Mutable state of one recursion level.
#[derive(Debug)]
pub(super) struct ParseState {
    /// Characters accumulated since the last construct boundary.
    pub(super) buffer: String,
    pub(super) status: ParseStatus,
    /// Only ever set while `status` is `TagNameAndAttrs`.
    pub(super) quote: Option<QuoteState>,
    pub(super) pending: Option<PendingElement>,
    /// Nodes produced so far at this level.
    pub(super) nodes: Vec<NodeRecord>,
}

impl ParseState {
    pub(super) const fn new() -> Self {
        Self {
            buffer: String::new(),
            status: ParseStatus::ScanningText,
            quote: None,
            pending: None,
            nodes: Vec::new(),
        }
    }

    /// Switch status and drop whatever was buffered.
    pub(super) fn enter(&mut self, status: ParseStatus) {
        self.status = status;
        self.buffer.clear();
    }

    /// Take the buffer, leaving it empty.
    pub(super) fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}
