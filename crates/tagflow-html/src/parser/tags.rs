/// Elements that never have children, matched ASCII case-insensitively.
pub const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "meta", "link", "param",
    "source", "track", "wbr",
];

/// Elements whose body is kept as literal text instead of being parsed.
pub const VERBATIM_TAGS: [&str; 2] = ["style", "script"];

/// Whether `name` is a void element.
#[must_use]
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Whether `name` is a verbatim element.
#[must_use]
pub fn is_verbatim_tag(name: &str) -> bool {
    VERBATIM_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}
