//! Depth-first traversal of a source tree as start/characters/end callbacks.

use crate::error::CleanResult;
use notepaste_common::{Attribute, Node};
use std::slice::Iter;

/// Receives the source tree in document order
pub trait TreeListener {
    fn start_element(&mut self, name: &str, attributes: &[Attribute]);
    fn end_element(&mut self, name: &str);
    fn characters(&mut self, text: &str);
}

/// Walks the children of a root element. The root itself is not reported.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    children: &'a [Node],
}

impl<'a> Walker<'a> {
    /// Fails when `root` is a text node.
    pub fn new(root: &'a Node) -> CleanResult<Self> {
        let root = root.as_element()?;
        Ok(Self {
            children: root.children,
        })
    }

    /// Report every descendant. Uses an explicit stack so deep trees
    /// cannot exhaust the call stack.
    pub fn walk<L: TreeListener + ?Sized>(self, listener: &mut L) {
        let mut stack: Vec<(Option<&'a str>, Iter<'a, Node>)> = vec![(None, self.children.iter())];

        loop {
            let next = match stack.last_mut() {
                Some((_, siblings)) => siblings.next(),
                None => break,
            };

            match next {
                Some(Node::Text { content }) => listener.characters(content),
                Some(Node::Element {
                    name,
                    attributes,
                    children,
                }) => {
                    listener.start_element(name, attributes);
                    stack.push((Some(name.as_str()), children.iter()));
                }
                None => {
                    if let Some((Some(name), _)) = stack.pop() {
                        listener.end_element(name);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanError;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl TreeListener for Recorder {
        fn start_element(&mut self, name: &str, attributes: &[Attribute]) {
            self.0.push(format!("<{} {}>", name, attributes.len()));
        }

        fn end_element(&mut self, name: &str) {
            self.0.push(format!("</{}>", name));
        }

        fn characters(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }

    #[test]
    fn test_document_order_without_root() {
        let root = Node::fragment(vec![
            Node::element("p")
                .with_attr("class", "x")
                .with_child(Node::text("a"))
                .with_child(Node::element("b").with_child(Node::text("c"))),
            Node::text("d"),
        ]);

        let mut recorder = Recorder::default();
        Walker::new(&root).unwrap().walk(&mut recorder);

        assert_eq!(
            recorder.0,
            vec!["<p 1>", "a", "<b 0>", "c", "</b>", "</p>", "d"]
        );
    }

    #[test]
    fn test_deep_nesting() {
        let mut node = Node::text("leaf");
        for _ in 0..100_000 {
            node = Node::element("span").with_child(node);
        }
        let root = Node::fragment(vec![node]);

        let mut recorder = Recorder::default();
        Walker::new(&root).unwrap().walk(&mut recorder);
        assert_eq!(recorder.0.len(), 200_001);
    }

    #[test]
    fn test_text_root_is_rejected() {
        let err = Walker::new(&Node::text("loose")).unwrap_err();
        assert!(matches!(err, CleanError::InvalidArgument(_)));
    }
}
