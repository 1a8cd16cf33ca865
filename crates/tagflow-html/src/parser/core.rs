//! The scan loop.
//!
//! The input is read once, left to right. Each recursion level owns a
//! [`ParseState`]; when an opening tag's `>` is reached the parser recurses on
//! the rest of the input to collect the element's children, and the inner call
//! stops at the first `</` it sees in text status. The outer level then skips
//! the characters the inner call consumed and reads the closing tag itself.
//! Closing tag names are never compared with opening ones: nesting follows
//! recursion depth alone.

use tagflow_common::{DiagnosticEvent, DiagnosticSink, NoopSink};
use tagflow_dom::{DomTree, NodeRecord};

use super::helpers::{
    next_few_characters_are, next_few_characters_are_case_insensitive, parse_header,
    parse_name_and_attributes,
};
use super::state::{ParseState, ParseStatus, PendingElement, QuoteState};
use super::tags::{is_verbatim_tag, is_void_tag};
use crate::error::ParseError;

const COMPONENT: &str = "Parser";

/// Nodes produced by one recursion level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Top-level nodes of the parsed slice, in document order.
    pub nodes: Vec<NodeRecord>,
    /// Character index at which parsing stopped: the `<` of the first closing
    /// tag met in text status, or the slice length when none was met.
    pub end: usize,
}

/// What the scan loop does after a character was handled.
enum Step {
    /// Resume at the given index.
    Continue(usize),
    /// A closing tag for the enclosing level starts here.
    Stop,
}

/// Recursive markup parser reporting to a diagnostic sink.
pub struct MarkupParser<'s> {
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> MarkupParser<'s> {
    /// Create a parser that records trace and warning events into `sink`.
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    /// Parse a whole document or fragment into its top-level nodes.
    ///
    /// A stray closing tag at the top level ends parsing; the rest of the
    /// input is ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMarkup`] when a `<` appears inside an
    /// opening or closing tag.
    pub fn parse(&mut self, input: &str) -> Result<Vec<NodeRecord>, ParseError> {
        let fragment = self.parse_fragment(input, None)?;
        let length = input.chars().count();
        if fragment.end < length {
            self.warning(format!(
                "stray closing tag at character {}; ignoring the remaining {} characters",
                fragment.end,
                length - fragment.end
            ));
        }
        Ok(fragment.nodes)
    }

    /// Parse and import the result into an addressed tree.
    ///
    /// # Errors
    ///
    /// See [`MarkupParser::parse`].
    pub fn parse_tree(&mut self, input: &str) -> Result<DomTree, ParseError> {
        Ok(DomTree::from_records(&self.parse(input)?))
    }

    /// Parse one level of `input`.
    ///
    /// `verbatim` names the element whose body this is when that body must be
    /// kept as text: every `<` is then literal unless it opens `</verbatim>`.
    ///
    /// # Errors
    ///
    /// See [`MarkupParser::parse`].
    pub fn parse_fragment(
        &mut self,
        input: &str,
        verbatim: Option<&str>,
    ) -> Result<Fragment, ParseError> {
        let chars: Vec<char> = input.chars().collect();
        self.trace(format!("parsing {} characters", chars.len()));
        self.parse_level(&chars, 0, verbatim)
    }

    /// `offset` is the position of `input[0]` in the top-level input.
    fn parse_level(
        &mut self,
        input: &[char],
        offset: usize,
        verbatim: Option<&str>,
    ) -> Result<Fragment, ParseError> {
        let mut state = ParseState::new();
        let mut i = 0;
        let mut end = input.len();

        while let Some(&c) = input.get(i) {
            if let Some(quote) = state.quote {
                state.buffer.push(c);
                if c == quote.delimiter() {
                    state.quote = None;
                }
                i += 1;
                continue;
            }

            let step = match c {
                '<' => self.handle_open_angle(&mut state, input, i, offset, verbatim)?,
                '>' => self.handle_close_angle(&mut state, input, i, offset)?,
                '/' => Self::handle_slash(&mut state, i),
                '"' | '\'' => Self::handle_quote(&mut state, c, i),
                '{' => self.handle_placeholder_open(&mut state, input, i),
                '}' => self.handle_placeholder_close(&mut state, input, i),
                _ => {
                    state.buffer.push(c);
                    Step::Continue(i + 1)
                }
            };

            match step {
                Step::Continue(next) => i = next,
                Step::Stop => {
                    end = i;
                    break;
                }
            }
        }

        self.finish(&mut state);
        Ok(Fragment {
            nodes: state.nodes,
            end,
        })
    }

    fn handle_open_angle(
        &mut self,
        state: &mut ParseState,
        input: &[char],
        i: usize,
        offset: usize,
        verbatim: Option<&str>,
    ) -> Result<Step, ParseError> {
        if let Some(tag) = verbatim {
            if !opens_closing_tag(input, i, tag) {
                state.buffer.push('<');
                return Ok(Step::Continue(i + 1));
            }
        }

        match state.status {
            ParseStatus::ScanningText => {
                self.flush_text(state);
                if input.get(i + 1) == Some(&'/') {
                    return Ok(Step::Stop);
                }
                if next_few_characters_are(input, i, "<!--") {
                    state.enter(ParseStatus::InsideComment);
                    return Ok(Step::Continue(i + 4));
                }
                if next_few_characters_are_case_insensitive(input, i, "<!doctype") {
                    state.enter(ParseStatus::InsideDoctype);
                    return Ok(Step::Continue(i + 9));
                }
                if input.get(i + 1) == Some(&'?') {
                    state.enter(ParseStatus::InsideHeader);
                    return Ok(Step::Continue(i + 2));
                }
                state.enter(ParseStatus::TagNameAndAttrs);
            }
            ParseStatus::TagNameAndAttrs | ParseStatus::TagClosing => {
                let position = offset + i;
                self.sink.record(DiagnosticEvent::error(
                    COMPONENT,
                    format!(
                        "unexpected '<' at character {position} while in {} status",
                        state.status
                    ),
                ));
                return Err(ParseError::MalformedMarkup {
                    position,
                    status: state.status,
                });
            }
            ParseStatus::InsideElementBody => state.enter(ParseStatus::TagClosing),
            ParseStatus::TagJustClosed
            | ParseStatus::InsideComment
            | ParseStatus::InsideDoctype
            | ParseStatus::InsideHeader
            | ParseStatus::InsidePlaceholder => state.buffer.push('<'),
        }
        Ok(Step::Continue(i + 1))
    }

    fn handle_close_angle(
        &mut self,
        state: &mut ParseState,
        input: &[char],
        i: usize,
        offset: usize,
    ) -> Result<Step, ParseError> {
        match state.status {
            ParseStatus::TagNameAndAttrs => return self.open_element(state, input, i, offset),
            ParseStatus::TagJustClosed => {
                state.enter(ParseStatus::ScanningText);
                if let Some(element) = state.pending.take() {
                    self.trace(format!("closed <{}>", element.name));
                    state.nodes.push(element.into_record());
                }
            }
            ParseStatus::InsideDoctype => {
                let body = state.take_buffer();
                state.status = ParseStatus::ScanningText;
                let body = body.trim();
                if !body.is_empty() {
                    self.trace(format!("doctype \"{body}\""));
                    state.nodes.push(NodeRecord::doctype(body));
                }
            }
            ParseStatus::InsideComment if i >= 2 && next_few_characters_are(input, i - 2, "--") => {
                let body = state.take_buffer();
                state.status = ParseStatus::ScanningText;
                let body = body.strip_suffix("--").unwrap_or(&body).trim();
                if !body.is_empty() {
                    self.trace(format!("comment \"{body}\""));
                    state.nodes.push(NodeRecord::comment(body));
                }
            }
            ParseStatus::InsideHeader if i >= 1 && input.get(i - 1) == Some(&'?') => {
                let body = state.take_buffer();
                state.status = ParseStatus::ScanningText;
                if let Some(header) = parse_header(body.strip_suffix('?').unwrap_or(&body)) {
                    self.trace(format!("header <?{}?>", header.name));
                    state.nodes.push(NodeRecord::Header {
                        name: header.name,
                        version: header.version,
                        encoding: header.encoding,
                    });
                }
            }
            ParseStatus::ScanningText
            | ParseStatus::TagClosing
            | ParseStatus::InsideElementBody
            | ParseStatus::InsideComment
            | ParseStatus::InsideHeader
            | ParseStatus::InsidePlaceholder => state.buffer.push('>'),
        }
        Ok(Step::Continue(i + 1))
    }

    /// The `>` of an opening tag: emit a void element, or recurse for children.
    fn open_element(
        &mut self,
        state: &mut ParseState,
        input: &[char],
        i: usize,
        offset: usize,
    ) -> Result<Step, ParseError> {
        let (name, attributes) = parse_name_and_attributes(&state.take_buffer());

        if is_void_tag(&name) {
            self.trace(format!("void element <{name}>"));
            state.status = ParseStatus::ScanningText;
            state.nodes.push(NodeRecord::Element {
                name,
                attributes,
                children: Vec::new(),
                is_void: true,
            });
            return Ok(Step::Continue(i + 1));
        }

        let body_start = i + 1;
        let verbatim = is_verbatim_tag(&name).then_some(name.as_str());
        let inner = self.parse_level(&input[body_start..], offset + body_start, verbatim)?;
        self.trace(format!("<{name}> has {} children", inner.nodes.len()));

        state.status = ParseStatus::InsideElementBody;
        state.pending = Some(PendingElement {
            name,
            attributes,
            children: inner.nodes,
            is_void: false,
        });
        Ok(Step::Continue(body_start + inner.end))
    }

    fn handle_slash(state: &mut ParseState, i: usize) -> Step {
        match state.status {
            ParseStatus::TagNameAndAttrs => {
                let (name, attributes) = parse_name_and_attributes(&state.take_buffer());
                state.status = ParseStatus::TagJustClosed;
                state.pending = Some(PendingElement {
                    name,
                    attributes,
                    children: Vec::new(),
                    is_void: true,
                });
            }
            ParseStatus::TagClosing => state.enter(ParseStatus::TagJustClosed),
            _ => state.buffer.push('/'),
        }
        Step::Continue(i + 1)
    }

    fn handle_quote(state: &mut ParseState, c: char, i: usize) -> Step {
        if state.status == ParseStatus::TagNameAndAttrs {
            state.quote = QuoteState::from_char(c);
        }
        state.buffer.push(c);
        Step::Continue(i + 1)
    }

    fn handle_placeholder_open(&mut self, state: &mut ParseState, input: &[char], i: usize) -> Step {
        if state.status == ParseStatus::ScanningText && input.get(i + 1) == Some(&'{') {
            self.flush_text(state);
            state.enter(ParseStatus::InsidePlaceholder);
            return Step::Continue(i + 2);
        }
        state.buffer.push('{');
        Step::Continue(i + 1)
    }

    fn handle_placeholder_close(
        &mut self,
        state: &mut ParseState,
        input: &[char],
        i: usize,
    ) -> Step {
        if state.status == ParseStatus::InsidePlaceholder && input.get(i + 1) == Some(&'}') {
            let key = state.take_buffer();
            state.status = ParseStatus::ScanningText;
            let key = key.trim();
            if !key.is_empty() {
                self.trace(format!("placeholder {{{{{key}}}}}"));
                state.nodes.push(NodeRecord::placeholder(key));
            }
            return Step::Continue(i + 2);
        }
        state.buffer.push('}');
        Step::Continue(i + 1)
    }

    /// Emit buffered text as a Text node unless it is only whitespace.
    fn flush_text(&mut self, state: &mut ParseState) {
        let text = state.take_buffer();
        if !text.trim().is_empty() {
            self.trace(format!("text \"{}\"", text.escape_debug()));
            state.nodes.push(NodeRecord::text(text));
        }
    }

    /// End of this level's input without a closing tag.
    fn finish(&mut self, state: &mut ParseState) {
        if let Some(element) = state.pending.take() {
            self.warning(format!(
                "<{}> is not closed before the end of input",
                element.name
            ));
            state.buffer.clear();
            state.nodes.push(element.into_record());
            return;
        }
        if state.buffer.trim().is_empty() {
            return;
        }
        if state.status != ParseStatus::ScanningText {
            self.warning(format!(
                "input ended in {} status; keeping \"{}\" as text",
                state.status,
                state.buffer.escape_debug()
            ));
        }
        let text = state.take_buffer();
        state.nodes.push(NodeRecord::text(text));
    }

    fn trace(&mut self, message: String) {
        self.sink.record(DiagnosticEvent::trace(COMPONENT, message));
    }

    fn warning(&mut self, message: String) {
        self.sink.record(DiagnosticEvent::warning(COMPONENT, message));
    }
}

/// Whether `</tag>` starts at `at`.
fn opens_closing_tag(input: &[char], at: usize, tag: &str) -> bool {
    next_few_characters_are(input, at, "</")
        && next_few_characters_are(input, at + 2, tag)
        && next_few_characters_are(input, at + 2 + tag.chars().count(), ">")
}

/// Parse with no diagnostics.
///
/// # Errors
///
/// See [`MarkupParser::parse`].
pub fn parse(input: &str) -> Result<Vec<NodeRecord>, ParseError> {
    let mut sink = NoopSink;
    MarkupParser::new(&mut sink).parse(input)
}

/// Parse with no diagnostics into an addressed tree.
///
/// # Errors
///
/// See [`MarkupParser::parse`].
pub fn parse_tree(input: &str) -> Result<DomTree, ParseError> {
    let mut sink = NoopSink;
    MarkupParser::new(&mut sink).parse_tree(input)
}
