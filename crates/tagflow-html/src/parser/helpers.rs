//! Helper functions for the parser.
//!
//! - Lookahead ("the next few characters are")
//! - Splitting a tag buffer into name and attributes
//! - Reading `<?name version=".." encoding=".."?>` headers

use tagflow_dom::{AttributesMap, HeaderData};

/// Whether the characters starting at `at` are exactly `target`.
pub(super) fn next_few_characters_are(input: &[char], at: usize, target: &str) -> bool {
    let mut pos = at;
    for expected in target.chars() {
        match input.get(pos) {
            Some(&c) if c == expected => pos += 1,
            _ => return false,
        }
    }
    true
}

/// ASCII case-insensitive version of [`next_few_characters_are`].
pub(super) fn next_few_characters_are_case_insensitive(
    input: &[char],
    at: usize,
    target: &str,
) -> bool {
    let mut pos = at;
    for expected in target.chars() {
        match input.get(pos) {
            Some(c) if c.eq_ignore_ascii_case(&expected) => pos += 1,
            _ => return false,
        }
    }
    true
}

/// Split a trimmed tag buffer like `a href="/x" hidden` into name and attributes.
pub(super) fn parse_name_and_attributes(buffer: &str) -> (String, AttributesMap) {
    let buffer = buffer.trim();
    match buffer.find(char::is_whitespace) {
        Some(split) => (buffer[..split].to_string(), parse_attributes(&buffer[split..])),
        None => (buffer.to_string(), AttributesMap::new()),
    }
}

/// Scan `name="value" name='value' name=value name` pairs.
///
/// A repeated name keeps its first position and takes the last value.
pub(super) fn parse_attributes(source: &str) -> AttributesMap {
    let mut attributes = AttributesMap::new();
    let mut chars = source.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == '/').is_some() {}
        let mut name = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
            name.push(c);
        }
        if name.is_empty() {
            // Stray '=' without a name.
            if chars.next().is_none() {
                break;
            }
            continue;
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let mut value = String::new();
        if chars.next_if_eq(&'=').is_some() {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    let _ = chars.next();
                    for c in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        value.push(c);
                    }
                }
                _ => {
                    while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                        value.push(c);
                    }
                }
            }
        }
        let _ = attributes.insert(name, value);
    }
    attributes
}

/// Read a header body (between `<?` and `?>`, trimmed).
///
/// When the body is a name followed by `version` and optionally `encoding`,
/// those fields are split out; any other shape keeps the whole body as the
/// name so that it serializes back unchanged. Returns `None` for an empty body.
pub(super) fn parse_header(body: &str) -> Option<HeaderData> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let (name, mut attributes) = parse_name_and_attributes(body);
    let structured = attributes.contains_key("version")
        && attributes
            .keys()
            .all(|key| key == "version" || key == "encoding");
    if structured {
        Some(HeaderData {
            name,
            version: attributes.shift_remove("version"),
            encoding: attributes.shift_remove("encoding"),
        })
    } else {
        Some(HeaderData {
            name: body.to_string(),
            version: None,
            encoding: None,
        })
    }
}
