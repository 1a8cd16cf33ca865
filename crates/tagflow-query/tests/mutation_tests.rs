//! Integration tests for edits made through selections.

use tagflow_common::{MemorySink, Severity};
use tagflow_query::{Document, NodeRecord, ParseError};

const TWO_ABC: &str =
    "<div><div class=\"abc\">Hello</div><div class=\"abc\"><b>World</b></div></div>";

fn warning_count(doc: &Document<MemorySink>) -> usize {
    doc.sink().with_severity(Severity::Warning).count()
}

#[test]
fn test_insert_text_into_every_selected_element() {
    let mut doc = Document::parse("<div></div><div></div>").unwrap();
    let mut selection = doc.select("div");
    assert_eq!(selection.len(), 2);
    let _ = selection.insert(&NodeRecord::text("Hello World"), None);

    let tree = selection.document().tree();
    let divs = selection.elements();
    for &div in &divs {
        assert_eq!(tree.children(div).len(), 1);
        assert_eq!(tree.as_text(tree.children(div)[0]), Some("Hello World"));
    }
    assert_eq!(tree.path(tree.children(divs[0])[0]), [0, 0]);
    assert_eq!(tree.path(tree.children(divs[1])[0]), [1, 0]);
    // Each element got its own copy.
    assert_ne!(tree.children(divs[0])[0], tree.children(divs[1])[0]);
}

#[test]
fn test_insert_at_index() {
    let mut doc = Document::parse("<ul><li>b</li></ul>").unwrap();
    let _ = doc
        .select("ul")
        .insert(&NodeRecord::text("a"), Some(0))
        .insert(&NodeRecord::text("c"), Some(99));
    assert_eq!(doc.to_markup(), "<ul>a<li>b</li>c</ul>");
    let ul = doc.root_nodes()[0];
    let li = doc.tree().children(ul)[1];
    assert_eq!(doc.tree().path(li), [0, 1]);
}

#[test]
fn test_insert_element_with_children() {
    let mut doc = Document::parse("<div></div>").unwrap();
    let record = NodeRecord::Element {
        name: "p".to_string(),
        attributes: [("class".to_string(), "note".to_string())]
            .into_iter()
            .collect(),
        children: vec![NodeRecord::text("hi")],
        is_void: false,
    };
    let _ = doc.select("div").insert(&record, None);
    assert_eq!(doc.to_markup(), "<div><p class=\"note\">hi</p></div>");
    let found = doc.query(".note");
    assert_eq!(doc.tree().path(found[0]), [0, 0]);
    assert_eq!(doc.tree().path(doc.tree().children(found[0])[0]), [0, 0, 0]);
}

#[test]
fn test_insert_skips_void_elements() {
    let mut doc = Document::parse_with_sink("<div></div><br>", MemorySink::new()).unwrap();
    let _ = doc.root_view().insert(&NodeRecord::text("x"), None);
    assert_eq!(doc.to_markup(), "<div>x</div><br/>");
    assert_eq!(warning_count(&doc), 1);
}

#[test]
fn test_remove_at_index() {
    let mut doc = Document::parse("<div>Hello</div><div>World</div>").unwrap();
    let mut selection = doc.select("div");
    let _ = selection.remove_at(0);
    assert_eq!(selection.len(), 2);
    for &div in &selection.elements() {
        assert!(selection.document().tree().children(div).is_empty());
    }
    assert_eq!(doc.to_markup(), "<div></div><div></div>");
}

#[test]
fn test_remove_at_out_of_range_is_a_no_op() {
    let mut doc = Document::parse("<div>a</div><div>b<i></i></div>").unwrap();
    let _ = doc.select("div").remove_at(1);
    assert_eq!(doc.to_markup(), "<div>a</div><div>b</div>");
}

#[test]
fn test_remove_selected() {
    let mut doc = Document::parse(
        "<div><div class=\"abc\">Hello</div><div class=\"abc\">World</div></div>",
    )
    .unwrap();
    let selection = doc.select(".abc");
    assert_eq!(selection.len(), 2);
    let root = selection.remove_selected();
    assert_eq!(root.elements().len(), 1);
    assert!(root.query(".abc").is_empty());
    assert_eq!(root.to_markup(), "<div></div>");
    let div = root.root_nodes()[0];
    assert!(root.tree().children(div).is_empty());
    assert_eq!(root.tree().path(div), [0]);
}

#[test]
fn test_remove_selected_readdresses_without_gaps() {
    let mut doc = Document::parse("<p>1</p><p class=\"x\">2</p><p>3</p><p class=\"x\">4</p><p>5</p>")
        .unwrap();
    let _ = doc.select(".x").remove_selected();
    assert_eq!(doc.to_markup(), "<p>1</p><p>3</p><p>5</p>");
    let paths: Vec<Vec<usize>> = doc
        .root_nodes()
        .iter()
        .map(|&id| doc.tree().path(id).to_vec())
        .collect();
    assert_eq!(paths, [vec![0], vec![1], vec![2]]);
}

#[test]
fn test_remove_selected_skips_nodes_removed_with_an_ancestor() {
    let mut doc =
        Document::parse_with_sink("<div><div>x</div></div><p>y</p>", MemorySink::new()).unwrap();
    let selection = doc.select("div");
    assert_eq!(selection.len(), 2);
    let root = selection.remove_selected();
    assert_eq!(root.to_markup(), "<p>y</p>");
    let p = root.root_nodes()[0];
    assert_eq!(root.tree().path(p), [0]);
    assert_eq!(warning_count(&doc), 1);
}

#[test]
fn test_removed_nodes_are_detached() {
    let mut doc = Document::parse("<a>1</a><b>2</b>").unwrap();
    let a = doc.query("a")[0];
    let _ = doc.select("a").remove_selected();
    assert!(!doc.tree().is_attached(a));
    assert!(doc.tree().path(a).is_empty());
}

#[test]
fn test_remove_all_children() {
    let mut doc = Document::parse(
        "<div><div class=\"abc\">Hello</div><div class=\"abc\"><b>World</b> again</div></div>",
    )
    .unwrap();
    let mut selection = doc.select(".abc");
    assert_eq!(selection.len(), 2);
    let _ = selection.remove_all_children();
    assert_eq!(selection.len(), 2);
    assert_eq!(
        doc.to_markup(),
        "<div><div class=\"abc\"></div><div class=\"abc\"></div></div>"
    );
}

#[test]
fn test_set_attribute() {
    let mut doc = Document::parse(
        "<div><a class=\"abc\">Hello</a><a class=\"abc\"><b>World</b></a></div>",
    )
    .unwrap();
    let _ = doc
        .select(".abc")
        .set_attribute("href", "https://jacoblewis.me");
    assert_eq!(
        doc.to_markup(),
        "<div><a class=\"abc\" href=\"https://jacoblewis.me\">Hello</a><a class=\"abc\" href=\"https://jacoblewis.me\"><b>World</b></a></div>"
    );
}

#[test]
fn test_set_existing_attribute_keeps_its_position() {
    let mut doc = Document::parse("<a href=\"/old\" class=\"c\">x</a>").unwrap();
    let _ = doc.select("a").set_attribute("href", "/new");
    assert_eq!(doc.to_markup(), "<a href=\"/new\" class=\"c\">x</a>");
}

#[test]
fn test_remove_attribute() {
    let mut doc = Document::parse(
        "<div><a class=\"abc\" href=\"https://jacoblewis.me\">Hello</a><a class=\"abc\"><b>World</b></a></div>",
    )
    .unwrap();
    let mut selection = doc.select(".abc");
    let _ = selection.remove_attribute("href");
    assert_eq!(selection.attribute("href"), None);
    assert_eq!(selection.attribute("class"), Some("abc"));
    assert_eq!(
        doc.to_markup(),
        "<div><a class=\"abc\">Hello</a><a class=\"abc\"><b>World</b></a></div>"
    );
}

#[test]
fn test_inner_markup() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let selection = doc.select(".abc");
    assert_eq!(selection.inner_markup(), ["Hello", "<b>World</b>"]);
}

#[test]
fn test_inner_markup_of_text_and_comment() {
    let mut doc = Document::parse("Hello<!-- c -->").unwrap();
    assert_eq!(doc.root_view().inner_markup(), ["Hello", ""]);
}

#[test]
fn test_set_inner_markup_with_text() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let _ = doc.select(".abc").set_inner_markup("space").unwrap();
    assert_eq!(
        doc.to_markup(),
        "<div><div class=\"abc\">space</div><div class=\"abc\">space</div></div>"
    );
}

#[test]
fn test_set_inner_markup_with_tags() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let mut selection = doc.select(".abc");
    let _ = selection.set_inner_markup("<h1>space</h1>").unwrap();

    let tree = selection.document().tree();
    let targets = selection.elements();
    let first_h1 = tree.children(targets[0])[0];
    let second_h1 = tree.children(targets[1])[0];
    assert_ne!(first_h1, second_h1);
    assert_eq!(tree.as_text(tree.children(first_h1)[0]), Some("space"));
    assert_eq!(tree.path(second_h1), [0, 1, 0]);
    assert_eq!(
        doc.to_markup(),
        "<div><div class=\"abc\"><h1>space</h1></div><div class=\"abc\"><h1>space</h1></div></div>"
    );
}

#[test]
fn test_set_inner_markup_on_text_node_is_literal() {
    let mut doc = Document::parse("Hello World").unwrap();
    let _ = doc.root_view().set_inner_markup("<b>not parsed</b>").unwrap();
    assert_eq!(doc.root_nodes().len(), 1);
    assert_eq!(doc.to_markup(), "<b>not parsed</b>");
    assert!(doc.query("b").is_empty());
}

#[test]
fn test_set_inner_markup_error_leaves_document_unchanged() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let result = doc.select(".abc").set_inner_markup("<a <b>").map(|_| ());
    assert!(matches!(result, Err(ParseError::MalformedMarkup { position: 3, .. })));
    assert_eq!(doc.to_markup(), TWO_ABC);
}

#[test]
fn test_set_name() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let _ = doc.select(".abc").set_name("h1");
    assert_eq!(
        doc.to_markup(),
        "<div><h1 class=\"abc\">Hello</h1><h1 class=\"abc\"><b>World</b></h1></div>"
    );
    assert_eq!(doc.query("h1").len(), 2);
}

#[test]
fn test_populate_placeholder_everywhere() {
    let mut doc =
        Document::parse("<p>Hi {{name}}</p><p id=\"second\">{{ name }} and {{other}}</p>").unwrap();
    let _ = doc.populate_placeholder("name", "Ann");
    assert_eq!(doc.to_markup(), "<p>Hi Ann</p><p id=\"second\">Ann and {{other}}</p>");
}

#[test]
fn test_populate_placeholder_within_selection() {
    let mut doc =
        Document::parse("<p>Hi {{name}}</p><p id=\"second\">{{name}}</p>{{name}}").unwrap();
    let _ = doc.select("#second").populate_placeholder("name", "Bo");
    assert_eq!(doc.to_markup(), "<p>Hi {{name}}</p><p id=\"second\">Bo</p>{{name}}");
}

#[test]
fn test_edits_on_empty_selection_are_no_ops() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let mut selection = doc.select("table");
    assert!(selection.is_empty());
    let _ = selection
        .set_attribute("x", "y")
        .remove_attribute("class")
        .insert(&NodeRecord::text("t"), None)
        .remove_at(0)
        .remove_all_children()
        .set_name("h1");
    let _ = selection.set_inner_markup("<p>").unwrap();
    assert_eq!(selection.inner_markup(), Vec::<String>::new());
    let root = selection.remove_selected();
    assert_eq!(root.to_markup(), TWO_ABC);
}

#[test]
fn test_edits_are_visible_to_later_selections() {
    let mut doc = Document::parse(TWO_ABC).unwrap();
    let _ = doc.select("b").set_attribute("class", "abc");
    assert_eq!(doc.query(".abc").len(), 3);
    let _ = doc.select(".abc").select("b").set_name("i");
    assert_eq!(
        doc.to_markup(),
        "<div><div class=\"abc\">Hello</div><div class=\"abc\"><i class=\"abc\">World</i></div></div>"
    );
}

#[test]
fn test_mutations_are_traced() {
    let mut doc = Document::parse_with_sink("<div></div>", MemorySink::new()).unwrap();
    doc.sink_mut().clear();
    let _ = doc.select("div").set_name("p");
    let traces: Vec<_> = doc.sink().with_severity(Severity::Trace).collect();
    assert!(traces.iter().all(|e| e.component == "Query"));
    assert!(traces.iter().any(|e| e.message == "`div` matched 1 nodes"));
    assert!(traces.iter().any(|e| e.message == "renamed 1 nodes to <p>"));
}
