//! Tagflow command-line front end.
//!
//! Reads markup from a file or from `--html`, optionally selects nodes with a
//! query, applies the requested edits to the selection, and prints the result
//! as markup, as a node tree, or as JSON records.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tagflow_common::{ConsoleSink, DiagnosticSink};
use tagflow_dom::{DomTree, NodeId, NodeKind};
use tagflow_query::{Document, NodeRecord};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tagflow",
    version,
    about = "Parse, query, edit and re-serialize HTML/XML-like markup"
)]
pub struct Cli {
    /// Markup file to read.
    #[arg(value_name = "FILE", conflicts_with = "html")]
    pub file: Option<PathBuf>,

    /// Markup to read instead of a file.
    #[arg(long, value_name = "MARKUP")]
    pub html: Option<String>,

    /// Select nodes: `#id`, `.class`, `*text` or an element name.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Set an attribute on the selected elements.
    #[arg(long = "set-attr", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub set_attr: Vec<(String, String)>,

    /// Remove an attribute from the selected elements.
    #[arg(long = "remove-attr", value_name = "NAME")]
    pub remove_attr: Vec<String>,

    /// Rename the selected elements.
    #[arg(long, value_name = "NAME")]
    pub rename: Option<String>,

    /// Replace the content of the selected nodes with this markup.
    #[arg(long, value_name = "MARKUP")]
    pub inner: Option<String>,

    /// Insert this markup into the selected elements.
    #[arg(long, value_name = "MARKUP")]
    pub insert: Option<String>,

    /// Child index for `--insert`; appends when omitted or past the end.
    #[arg(long, value_name = "INDEX", requires = "insert")]
    pub at: Option<usize>,

    /// Remove every child of the selected elements.
    #[arg(long)]
    pub clear: bool,

    /// Remove the selected nodes from the document.
    #[arg(long)]
    pub remove: bool,

    /// Bind a value to the `{{KEY}}` placeholders within the selection.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fill: Vec<(String, String)>,

    /// Print the node tree with paths instead of markup.
    #[arg(long, conflicts_with = "json")]
    pub tree: bool,

    /// Print node records as JSON instead of markup.
    #[arg(long)]
    pub json: bool,

    /// Print parser and query trace events to stderr.
    #[arg(long)]
    pub trace: bool,

    /// Write the output to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Whether any edit was requested.
    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.set_attr.is_empty()
            || !self.remove_attr.is_empty()
            || self.rename.is_some()
            || self.inner.is_some()
            || self.insert.is_some()
            || self.clear
            || self.remove
            || !self.fill.is_empty()
    }
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{arg}`")),
    }
}

/// Run the command and write its output.
///
/// # Errors
///
/// Fails when the input cannot be read or parsed, or the output cannot be
/// written.
#[allow(clippy::print_stdout)]
pub fn run(cli: &Cli) -> Result<()> {
    let output = render(cli)?;
    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{output}");
            Ok(())
        }
    }
}

/// Run the command and return what it would print.
///
/// With edits, the whole document is rendered after applying them to the
/// selection (or to the root collection without `--query`). Without edits,
/// a query renders only the matched nodes.
///
/// # Errors
///
/// Fails when the input cannot be read or when any markup does not parse.
pub fn render(cli: &Cli) -> Result<String> {
    let input = read_input(cli)?;
    let mut sink = ConsoleSink::new().deduplicate_warnings();
    if cli.trace {
        sink = sink.with_trace();
    }
    let mut document =
        Document::parse_with_sink(&input, sink).context("failed to parse the input markup")?;

    if cli.has_edits() {
        apply_edits(&mut document, cli)?;
    } else if let Some(query) = &cli.query {
        let matched = document.query(query);
        return render_nodes(document.tree(), &matched, cli);
    }
    render_document(&document, cli)
}

fn read_input(cli: &Cli) -> Result<String> {
    match (&cli.html, &cli.file) {
        (Some(html), _) => Ok(html.clone()),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        (None, None) => bail!("no input: pass a FILE or --html MARKUP"),
    }
}

fn apply_edits<S: DiagnosticSink>(document: &mut Document<S>, cli: &Cli) -> Result<()> {
    let inserted = cli
        .insert
        .as_deref()
        .map(tagflow_html::parse)
        .transpose()
        .context("failed to parse the --insert markup")?;

    let mut selection = match &cli.query {
        Some(query) => document.select(query),
        None => document.root_view(),
    };

    for (name, value) in &cli.set_attr {
        let _ = selection.set_attribute(name, value);
    }
    for name in &cli.remove_attr {
        let _ = selection.remove_attribute(name);
    }
    if let Some(name) = &cli.rename {
        let _ = selection.set_name(name);
    }
    if let Some(markup) = &cli.inner {
        let _ = selection
            .set_inner_markup(markup)
            .context("failed to parse the --inner markup")?;
    }
    if let Some(records) = &inserted {
        for (offset, record) in records.iter().enumerate() {
            let _ = selection.insert(record, cli.at.map(|at| at + offset));
        }
    }
    if cli.clear {
        let _ = selection.remove_all_children();
    }
    for (key, value) in &cli.fill {
        let _ = selection.populate_placeholder(key, value);
    }
    if cli.remove {
        let _ = selection.remove_selected();
    }
    Ok(())
}

fn render_document<S: DiagnosticSink>(document: &Document<S>, cli: &Cli) -> Result<String> {
    if cli.json {
        return serde_json::to_string_pretty(&document.to_records())
            .context("failed to encode the document as JSON");
    }
    if cli.tree {
        let mut out = String::new();
        render_tree(document.tree(), NodeId::ROOT, 0, &mut out);
        return Ok(out);
    }
    Ok(document.to_markup())
}

fn render_nodes(tree: &DomTree, ids: &[NodeId], cli: &Cli) -> Result<String> {
    if cli.json {
        let records: Vec<NodeRecord> = ids.iter().filter_map(|&id| tree.to_record(id)).collect();
        return serde_json::to_string_pretty(&records)
            .context("failed to encode the selection as JSON");
    }
    if cli.tree {
        let mut out = String::new();
        for &id in ids {
            render_tree(tree, id, 0, &mut out);
        }
        return Ok(out);
    }
    Ok(ids
        .iter()
        .map(|&id| tree.node_markup(id))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Append an indented outline of `id` and its subtree to `out`, one node per
/// line, each followed by its path.
pub fn render_tree(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(kind) = tree.kind(id) else {
        return;
    };
    let prefix = "  ".repeat(depth);
    let label = match kind {
        NodeKind::Document => "Document".to_string(),
        NodeKind::Element(data) => {
            let close = if data.is_void { "/>" } else { ">" };
            if data.attrs.is_empty() {
                format!("<{}{close}", data.name)
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                format!("<{} {}{close}", data.name, attrs.join(" "))
            }
        }
        NodeKind::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"")
        }
        NodeKind::Comment(_) | NodeKind::Doctype(_) | NodeKind::Header(_) => tree.node_markup(id),
        NodeKind::Placeholder(placeholder) => match &placeholder.value {
            Some(value) => format!("{{{{{}}}}} = \"{value}\"", placeholder.key),
            None => format!("{{{{{}}}}}", placeholder.key),
        },
    };

    let path = tree.path(id);
    if path.is_empty() {
        let _ = writeln!(out, "{prefix}{label}");
    } else {
        let _ = writeln!(out, "{prefix}{label} {path:?}");
    }
    for &child in tree.children(id) {
        render_tree(tree, child, depth + 1, out);
    }
}
