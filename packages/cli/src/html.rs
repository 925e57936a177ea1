//! HTML front-end: html5ever DOM to source tree.

use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use notepaste_common::{Attribute, Node};
use std::vec::IntoIter;

/// Parse an HTML document or fragment. The result is a fragment holding
/// the children of `<body>`.
pub fn parse_html(input: &str) -> Node {
    let dom = html5ever::parse_document(RcDom::default(), Default::default()).one(input);
    let root = find_body(&dom.document).unwrap_or_else(|| dom.document.clone());
    Node::fragment(convert_children(&root))
}

fn find_body(document: &Handle) -> Option<Handle> {
    let mut pending = vec![document.clone()];
    while let Some(handle) = pending.pop() {
        if let NodeData::Element { name, .. } = &handle.data {
            if &*name.local == "body" {
                return Some(handle);
            }
        }
        pending.extend(handle.children.borrow().iter().rev().cloned());
    }
    None
}

struct Pending {
    children: IntoIter<Handle>,
    node: Node,
}

impl Pending {
    fn new(handle: &Handle, node: Node) -> Self {
        Self {
            children: handle.children.borrow().clone().into_iter(),
            node,
        }
    }
}

// Comments, doctypes and processing instructions are dropped.
fn convert_children(parent: &Handle) -> Vec<Node> {
    let mut stack = vec![Pending::new(parent, Node::fragment(Vec::new()))];

    loop {
        let next = match stack.last_mut() {
            Some(pending) => pending.children.next(),
            None => return Vec::new(),
        };

        match next {
            Some(handle) => match &handle.data {
                NodeData::Text { contents } => {
                    if let Some(pending) = stack.last_mut() {
                        pending.node.push_child(Node::text(contents.borrow().to_string()));
                    }
                }
                NodeData::Element { name, attrs, .. } => {
                    let attributes = attrs
                        .borrow()
                        .iter()
                        .map(|attr| Attribute::new(attr.name.local.to_string(), attr.value.to_string()))
                        .collect();
                    let node = Node::element(name.local.to_string()).with_attributes(attributes);
                    stack.push(Pending::new(&handle, node));
                }
                _ => {}
            },
            None => {
                let Some(done) = stack.pop() else {
                    return Vec::new();
                };
                match stack.last_mut() {
                    Some(parent) => parent.node.push_child(done.node),
                    None => return done.node.into_children(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_children_become_the_fragment() {
        let tree = parse_html(
            r#"<html><head><title>t</title></head><body><p class="x">Hi <b>there</b></p><!-- c --></body></html>"#,
        );

        assert_eq!(
            tree,
            Node::fragment(vec![Node::element("p")
                .with_attr("class", "x")
                .with_child(Node::text("Hi "))
                .with_child(Node::element("b").with_child(Node::text("there")))])
        );
    }

    #[test]
    fn test_bare_fragment_and_entities() {
        let tree = parse_html("a &amp; b<br>c");
        assert_eq!(
            tree,
            Node::fragment(vec![
                Node::text("a & b"),
                Node::element("br"),
                Node::text("c"),
            ])
        );
    }
}
