//! Comprehensive tests for fos-html
//!
//! Markup shapes the widget layer relies on: attributes, ids, nesting and
//! malformed input.

use fos_html::HtmlParser;

#[test]
fn test_parse_minimal_html() {
    let doc = HtmlParser::new().parse("").unwrap();
    assert!(doc.body().is_valid(), "Even empty HTML gets a body");
}

#[test]
fn test_whitespace_text_is_dropped() {
    let doc = HtmlParser::new()
        .parse("<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>")
        .unwrap();
    let ul = doc.query_selector(doc.body(), "ul").unwrap().unwrap();

    let children: Vec<_> = doc.tree().children(ul).collect();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|&c| doc.tree().tag_name(c) == Some("li")));
}

#[test]
fn test_attributes_and_id_index() {
    let html = r#"
        <div class="js-accordion" data-accordion-multiselectable="none" dir="rtl">
            <div class="js-accordion__panel" id="first" data-accordion-opened="true">
                <h2 class="js-accordion__header">First</h2>
            </div>
        </div>
    "#;
    let doc = HtmlParser::new().parse(html).unwrap();

    let panel = doc.get_element_by_id("first").unwrap();
    assert_eq!(doc.get_attribute(panel, "data-accordion-opened"), Some("true"));

    let container = doc.closest(panel, ".js-accordion").unwrap().unwrap();
    assert_eq!(
        doc.get_attribute(container, "data-accordion-multiselectable"),
        Some("none")
    );
    assert_eq!(doc.closest(panel, "[dir=\"rtl\"]").unwrap(), Some(container));
}

#[test]
fn test_nested_markup_keeps_order() {
    let html = r#"
        <section>
            <h3>A</h3><p>1</p>
            <h3>B</h3><p>2</p>
            <h3>C</h3><p>3</p>
        </section>
    "#;
    let doc = HtmlParser::new().parse(html).unwrap();
    let headings = doc.query_selector_all(doc.body(), "section h3").unwrap();

    let text: Vec<String> = headings.iter().map(|&h| doc.tree().text_content(h)).collect();
    assert_eq!(text, ["A", "B", "C"]);
}

#[test]
fn test_parse_malformed_html() {
    let html = "<div><p>Unclosed paragraph<span>Unclosed span</div>";
    let doc = HtmlParser::new().parse(html).unwrap();

    let span = doc.query_selector(doc.body(), "div span").unwrap();
    assert!(span.is_some());
}

#[test]
fn test_inline_markup_round_trips() {
    let doc = HtmlParser::new()
        .parse("<h2 id=\"t\">Rich <em>title</em></h2>")
        .unwrap();
    let h2 = doc.get_element_by_id("t").unwrap();

    assert_eq!(doc.tree().inner_html(h2), "Rich <em>title</em>");
}
