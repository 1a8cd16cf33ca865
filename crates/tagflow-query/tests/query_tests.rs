//! Integration tests for selection and the document accessors.

use tagflow_common::DiagnosticSink;
use tagflow_query::{Document, NodeId, NodeRecord, Query};

const GREETING: &str = "<!DOCTYPE html><h1 id=\"greeting\">Good Day!</h1><div><h2 class=\"lead\">Hello</h2> World</div><!-- my comment -->";

fn name_of<S: DiagnosticSink>(doc: &Document<S>, id: NodeId) -> &str {
    doc.tree()
        .as_element(id)
        .map_or("", |element| element.name.as_str())
}

fn names<S: DiagnosticSink>(doc: &Document<S>, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| name_of(doc, id).to_string()).collect()
}

#[test]
fn test_query_parsing() {
    assert_eq!(Query::parse("#main"), Query::Id("main".to_string()));
    assert_eq!(Query::parse(".lead"), Query::Class("lead".to_string()));
    assert_eq!(Query::parse("*Hello"), Query::Text("Hello".to_string()));
    assert_eq!(Query::parse("div"), Query::Name("div".to_string()));
    assert_eq!(Query::from("h1"), Query::Name("h1".to_string()));
    assert_eq!(Query::parse(".lead").to_string(), ".lead");
}

#[test]
fn test_top_level_accessors() {
    let doc = Document::parse(GREETING).unwrap();
    assert_eq!(names(&doc, &doc.elements()), ["h1", "div"]);
    assert_eq!(doc.comments(), ["my comment"]);
    assert_eq!(doc.doctype(), Some("html"));
    assert_eq!(doc.to_markup(), GREETING);
    assert_eq!(doc.to_string(), GREETING);
}

#[test]
fn test_plain_text_document() {
    let doc = Document::parse("Hello World").unwrap();
    assert!(doc.elements().is_empty());
    assert!(doc.comments().is_empty());
    assert_eq!(doc.doctype(), None);
    assert_eq!(doc.to_markup(), "Hello World");
}

#[test]
fn test_text_around_tags() {
    let before = Document::parse("Hello <h3>World</h3>").unwrap();
    assert_eq!(before.elements().len(), 1);
    assert_eq!(before.to_markup(), "Hello <h3>World</h3>");

    let after = Document::parse("<h3>Hello</h3> World").unwrap();
    assert_eq!(after.elements().len(), 1);
    assert_eq!(after.to_markup(), "<h3>Hello</h3> World");
}

#[test]
fn test_query_by_name() {
    let doc = Document::parse(GREETING).unwrap();
    let found = doc.query("h1");
    assert_eq!(names(&doc, &found), ["h1"]);
    assert_eq!(doc.tree().children(found[0]).len(), 1);
}

#[test]
fn test_query_by_name_is_deep() {
    let doc = Document::parse(GREETING).unwrap();
    assert_eq!(names(&doc, &doc.query("h2")), ["h2"]);
}

#[test]
fn test_nested_select() {
    let mut doc = Document::parse(GREETING).unwrap();
    let selection = doc.select("div").select("h2");
    assert_eq!(selection.len(), 1);
    let h2 = selection.nodes()[0];
    assert_eq!(name_of(selection.document(), h2), "h2");
}

#[test]
fn test_query_by_class_and_id() {
    let doc = Document::parse(GREETING).unwrap();
    assert_eq!(names(&doc, &doc.query(".lead")), ["h2"]);
    assert_eq!(names(&doc, &doc.query("#greeting")), ["h1"]);
}

#[test]
fn test_class_list_is_split_on_whitespace() {
    let doc = Document::parse("<p class=\"a  big\tcard\">x</p><p class=\"bigger\">y</p>").unwrap();
    assert_eq!(doc.query(".big").len(), 1);
    assert_eq!(doc.query(".card").len(), 1);
}

#[test]
fn test_query_by_text_bubbles_to_element() {
    let doc = Document::parse(GREETING).unwrap();
    assert_eq!(names(&doc, &doc.query("*Hello")), ["h2"]);
    assert_eq!(names(&doc, &doc.query("*good day")), ["h1"]);
}

#[test]
fn test_text_query_keeps_nested_element_matches() {
    let doc = Document::parse("<p>Hi <b>hi</b></p>").unwrap();
    assert_eq!(names(&doc, &doc.query("*HI")), ["p", "b"]);
}

#[test]
fn test_text_query_over_a_page() {
    let page = concat!(
        "<html><body>",
        "<h1>The Year of 2025</h1>",
        "<p>Nothing to see</p>",
        "<footer class=\"center-text\">&copy; 2025 Jacob K Lewis</footer>",
        "</body></html>",
    );
    let mut doc = Document::parse(page).unwrap();
    let selection = doc.select("*2025");
    assert_eq!(names(selection.document(), &selection.elements()), ["h1", "footer"]);
    assert_eq!(
        selection.to_markup(),
        "<h1>The Year of 2025</h1><footer class=\"center-text\">&copy; 2025 Jacob K Lewis</footer>"
    );
}

#[test]
fn test_top_level_text_matches_itself() {
    let doc = Document::parse("Hello World").unwrap();
    let found = doc.query("*world");
    assert_eq!(found.len(), 1);
    assert_eq!(doc.tree().as_text(found[0]), Some("Hello World"));
}

#[test]
fn test_dedup_and_bubble() {
    let doc = Document::parse(
        "<div><div class=\"abc\">Hello</div><div class=\"abc\"><b>World</b></div></div>",
    )
    .unwrap();
    let found = doc.query(".abc");
    assert_eq!(found.len(), 2);
    assert_eq!(doc.tree().children_markup(found[0]), "Hello");
    assert_eq!(doc.tree().children_markup(found[1]), "<b>World</b>");
}

#[test]
fn test_nested_select_removes_duplicates() {
    let mut doc = Document::parse("<div><div></div></div>").unwrap();
    let selection = doc.select("div");
    let first = selection.nodes().to_vec();
    assert_eq!(first.len(), 2);
    let again = selection.select("div");
    assert_eq!(again.nodes(), first);
}

#[test]
fn test_query_miss_is_empty() {
    let mut doc = Document::parse(GREETING).unwrap();
    assert!(doc.query("table").is_empty());
    assert!(doc.select("#missing").is_empty());
}

#[test]
fn test_name_match_is_case_sensitive() {
    let doc = Document::parse("<DIV></DIV>").unwrap();
    assert!(doc.query("div").is_empty());
    assert_eq!(doc.query("DIV").len(), 1);
}

#[test]
fn test_address_correctness() {
    let doc = Document::parse("<div><span>Hello</span> World</div>").unwrap();
    let tree = doc.tree();
    let div = doc.root_nodes()[0];
    let span = tree.children(div)[0];
    let world = tree.children(div)[1];
    assert_eq!(tree.path(div), [0]);
    assert_eq!(tree.path(span), [0, 0]);
    assert_eq!(tree.path(world), [0, 1]);
    assert_eq!(tree.as_text(world), Some(" World"));
    assert_eq!(tree.path(tree.children(span)[0]), [0, 0, 0]);
}

#[test]
fn test_void_tag_has_no_children() {
    let doc = Document::parse("<br class=\"x\">").unwrap();
    let br = doc.root_nodes()[0];
    let element = doc.tree().as_element(br).unwrap();
    assert_eq!(element.name, "br");
    assert!(element.is_void);
    assert_eq!(element.attrs.len(), 1);
    assert!(doc.tree().children(br).is_empty());
}

#[test]
fn test_records_round_trip_through_document() {
    let doc = Document::parse(GREETING).unwrap();
    let records = doc.to_records();
    assert_eq!(records[0], NodeRecord::doctype("html"));
    let rebuilt = Document::from_records(&records);
    assert_eq!(rebuilt.to_markup(), GREETING);
    assert_eq!(rebuilt.tree().path(rebuilt.root_nodes()[2]), [2]);
}

#[test]
fn test_root_view_holds_root_collection() {
    let mut doc = Document::parse(GREETING).unwrap();
    let roots = doc.root_nodes().to_vec();
    let view = doc.root_view();
    assert_eq!(view.nodes(), roots);
    assert_eq!(view.elements().len(), 2);
    assert_eq!(view.to_markup(), GREETING);
}
