//! Property-based tests for the cleaner
//!
//! Random, frequently malformed source trees must always come out as a
//! balanced event stream that the grammar accepts, and cleaning the
//! canonical tree again must not change it.

use notepaste_cleaner::clean;
use notepaste_common::{Attribute, Node};
use notepaste_grammar::{ElementKind, Event, Grammar};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

const INLINE_OUTPUT: &[&str] = &[
    "a",
    "strong",
    "em",
    "sub",
    "sup",
    "u",
    "strike",
    "code",
    "cite",
    "highlight",
    "font",
];

/// Element names seen in pasted markup, known and unknown
fn element_name_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "p", "div", "pre", "span", "b", "strong", "i", "em", "u", "s", "sub", "code", "a", "font",
        "highlight", "h1", "h2", "h5", "blockquote", "ul", "ol", "li", "dl", "dt", "dd", "table",
        "tr", "td", "th", "text", "o:p", "section", "SPAN", "Table",
    ])
}

fn attribute_strategy() -> impl Strategy<Value = Attribute> {
    prop::sample::select(vec![
        Attribute::new("style", "font-weight: bold"),
        Attribute::new("style", "font-style: italic; text-decoration: underline"),
        Attribute::new("style", "color: red; background-color: yellow"),
        Attribute::new("style", "color: black"),
        Attribute::new("href", "https://example.com/?a=1&b=2"),
        Attribute::new("href", "javascript:void(0)"),
        Attribute::new("color", "#00f"),
        Attribute::new("data-type", "paragraph"),
        Attribute::new("data-list", "bullet"),
        Attribute::new("list", "number"),
        Attribute::new("class", "MsoNormal"),
    ])
}

fn leaf_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        4 => "[a-z]{1,6}( [a-z]{1,6})?".prop_map(|text| Node::text(text)),
        1 => Just(Node::text("\n  ")),
        1 => Just(Node::text("a]]>b")),
        1 => Just(Node::element("br")),
        1 => Just(Node::element("hr")),
    ]
}

fn node_strategy() -> impl Strategy<Value = Node> {
    leaf_strategy().prop_recursive(5, 64, 4, |inner| {
        (
            element_name_strategy(),
            prop::collection::vec(attribute_strategy(), 0..3),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attributes, children)| {
                Node::element(name)
                    .with_attributes(attributes)
                    .with_children(children)
            })
    })
}

fn fragment_strategy() -> impl Strategy<Value = Node> {
    prop::collection::vec(node_strategy(), 0..5).prop_map(Node::fragment)
}

/// Every element sits where the grammar allows it and tags pair up.
fn check_conforms(events: &[Event]) -> Result<(), TestCaseError> {
    let grammar = Grammar::standard();
    let mut open: Vec<ElementKind> = Vec::new();

    for event in events {
        match event {
            Event::StartTag { name, .. } | Event::StandaloneTag { name, .. } => {
                let entry = grammar.entry(*name).unwrap();
                match open.last() {
                    Some(parent) => {
                        let parent_entry = grammar.entry(*parent).unwrap();
                        prop_assert!(
                            parent_entry.allows(*name),
                            "{} is not allowed inside {}",
                            name,
                            parent
                        );
                        let required = entry.required_parents();
                        prop_assert!(required.is_empty() || required.contains(parent));
                    }
                    None => {
                        prop_assert!(entry.required_parents().is_empty(), "{} at top level", name);
                        prop_assert!(!entry.is_inline(), "inline {} at top level", name);
                    }
                }
                if matches!(event, Event::StartTag { .. }) {
                    open.push(*name);
                }
            }
            Event::EndTag { name } => {
                prop_assert_eq!(open.pop(), Some(*name));
            }
            Event::Text { content } => {
                prop_assert!(!content.trim().is_empty());
                let parent = open.last().and_then(|kind| grammar.entry(*kind));
                prop_assert!(parent.is_some_and(|entry| entry.allows_text()));
            }
        }
    }

    prop_assert!(open.is_empty(), "unclosed: {:?}", open);
    Ok(())
}

proptest! {
    #[test]
    fn test_output_conforms_to_grammar(root in fragment_strategy()) {
        let output = clean(&root).unwrap();
        check_conforms(output.events())?;
    }

    #[test]
    fn test_no_orphan_inline_or_text(root in fragment_strategy()) {
        let tree = clean(&root).unwrap().to_tree();

        prop_assert!(tree.is_fragment());
        for child in tree.children() {
            prop_assert!(child.is_element(), "text at top level: {:?}", child);
            let name = child.name().unwrap_or_default();
            prop_assert!(!INLINE_OUTPUT.contains(&name), "inline <{}> at top level", name);
        }
    }

    #[test]
    fn test_cleaning_is_idempotent(root in fragment_strategy()) {
        let first = clean(&root).unwrap();
        let second = clean(&first.to_tree()).unwrap();

        prop_assert_eq!(first.to_markup(), second.to_markup());
        prop_assert_eq!(first.to_tree(), second.to_tree());
    }

    #[test]
    fn test_text_content_survives_outside_dropped_regions(words in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let children = words
            .iter()
            .map(|word| Node::element("span").with_child(Node::text(word.clone())))
            .collect();
        let root = Node::fragment(vec![Node::element("div").with_children(children)]);

        let tree = clean(&root).unwrap().to_tree();
        prop_assert_eq!(tree.text_content(), words.concat());
    }
}

#[cfg(test)]
mod specific_tests {
    use super::*;

    fn markup(root: &Node) -> String {
        clean(root).unwrap().to_markup()
    }

    #[test]
    fn test_mixed_paste() {
        let root = Node::fragment(vec![
            Node::element("h1").with_child(Node::text("Title")),
            Node::element("div").with_child(
                Node::element("span")
                    .with_attr("style", "font-weight:700;color:rgb(255, 0, 0)")
                    .with_child(Node::text("Loud")),
            ),
            Node::element("ul").with_child(
                Node::element("li").with_child(
                    Node::element("a")
                        .with_attr("href", "https://example.com/?a=1&b=2")
                        .with_child(Node::text("link")),
                ),
            ),
        ]);

        assert_eq!(
            markup(&root),
            concat!(
                "<h1><![CDATA[Title]]></h1>",
                r##"<text><strong><font color="#ff0000"><![CDATA[Loud]]></font></strong></text>"##,
                r#"<text list="disc"><a href="https://example.com/?a=1&amp;b=2"><![CDATA[link]]></a></text>"#,
            )
        );
    }

    #[test]
    fn test_canonical_tree_shape() {
        let root = Node::fragment(vec![Node::element("b").with_child(Node::text("x"))]);
        let tree = clean(&root).unwrap().to_tree();

        assert_eq!(
            tree,
            Node::fragment(vec![Node::element("text")
                .with_child(Node::element("strong").with_child(Node::text("x")))])
        );
    }

    #[test]
    fn test_empty_fragment() {
        let output = clean(&Node::fragment(Vec::new())).unwrap();
        assert!(output.events().is_empty());
        assert_eq!(output.to_markup(), "");
        assert_eq!(output.to_tree(), Node::fragment(Vec::new()));
    }
}
