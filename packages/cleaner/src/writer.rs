//! Writers turning the cleaner's event stream into its output forms.
//!
//! Only kinds with an output name are written. Events for every other
//! kind are skipped, their content lands in the nearest written ancestor.

use notepaste_common::{escape_attribute, escape_cdata, Attribute, Node};
use notepaste_grammar::{Event, Grammar};

/// Builds the canonical tree under a `#document-fragment` root
pub struct TreeWriter<'g> {
    grammar: &'g Grammar,
    stack: Vec<Node>,
}

impl<'g> TreeWriter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            stack: vec![Node::fragment(Vec::new())],
        }
    }

    pub fn write(mut self, events: &[Event]) -> Node {
        for event in events {
            self.handle(event);
        }
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .unwrap_or_else(|| Node::fragment(Vec::new()))
    }

    fn handle(&mut self, event: &Event) {
        match event {
            Event::StartTag { name, attributes } => {
                if let Some(output) = self.grammar.output_name(*name) {
                    self.stack
                        .push(Node::element(output).with_attributes(attributes.clone()));
                }
            }
            Event::EndTag { name } => {
                if self.grammar.output_name(*name).is_some() {
                    self.close();
                }
            }
            Event::StandaloneTag { name, attributes } => {
                if let Some(output) = self.grammar.output_name(*name) {
                    let node = Node::element(output).with_attributes(attributes.clone());
                    self.current().push_child(node);
                }
            }
            Event::Text { content } => self.current().push_text(content),
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(node) = self.stack.pop() {
            self.current().push_child(node);
        }
    }

    fn current(&mut self) -> &mut Node {
        // The fragment root is never popped by `close`.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

/// Serialises events to markup with text in CDATA sections
pub struct MarkupWriter<'g> {
    grammar: &'g Grammar,
    out: String,
    in_cdata: bool,
}

impl<'g> MarkupWriter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            out: String::new(),
            in_cdata: false,
        }
    }

    pub fn write(mut self, events: &[Event]) -> String {
        for event in events {
            match event {
                Event::StartTag { name, attributes } => {
                    if let Some(output) = self.grammar.output_name(*name) {
                        self.tag(output, attributes, ">");
                    }
                }
                Event::EndTag { name } => {
                    if let Some(output) = self.grammar.output_name(*name) {
                        self.close_cdata();
                        self.out.push_str("</");
                        self.out.push_str(output);
                        self.out.push('>');
                    }
                }
                Event::StandaloneTag { name, attributes } => {
                    if let Some(output) = self.grammar.output_name(*name) {
                        self.tag(output, attributes, "/>");
                    }
                }
                Event::Text { content } => {
                    if !self.in_cdata {
                        self.out.push_str("<![CDATA[");
                        self.in_cdata = true;
                    }
                    self.out.push_str(&escape_cdata(content));
                }
            }
        }
        self.close_cdata();
        self.out
    }

    fn tag(&mut self, name: &str, attributes: &[Attribute], end: &str) {
        self.close_cdata();
        self.out.push('<');
        self.out.push_str(name);
        for attr in attributes {
            self.out.push(' ');
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute_value(&attr.value));
            self.out.push('"');
        }
        self.out.push_str(end);
    }

    fn close_cdata(&mut self) {
        if self.in_cdata {
            self.out.push_str("]]>");
            self.in_cdata = false;
        }
    }
}

/// Escape `<`, `"` and any `&` that does not already start an entity.
pub fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(index) = rest.find('&') {
        out.push_str(&escape_attribute(&rest[..index]));
        let tail = &rest[index..];
        match entity_len(tail) {
            Some(len) => out.push_str(&tail[..len]),
            None => out.push_str("&amp;"),
        }
        rest = &tail[entity_len(tail).unwrap_or(1)..];
    }
    out.push_str(&escape_attribute(rest));
    out
}

// Length of a `&name;`, `&#123;` or `&#x1f;` reference at the start of `text`.
fn entity_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];

    let valid = if let Some(hex) = name
        .strip_prefix("#x")
        .or_else(|| name.strip_prefix("#X"))
    {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(digits) = name.strip_prefix('#') {
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
    } else {
        name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && name.chars().all(|c| c.is_ascii_alphanumeric())
    };

    valid.then_some(end + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepaste_grammar::ElementKind;

    fn events() -> Vec<Event> {
        vec![
            Event::start(ElementKind::P, vec![]),
            Event::text("Hello "),
            Event::start(ElementKind::Span, vec![]),
            Event::text("World"),
            Event::end(ElementKind::Span),
            Event::start(ElementKind::B, vec![]),
            Event::text("!"),
            Event::end(ElementKind::B),
            Event::end(ElementKind::P),
            Event::standalone(ElementKind::Hr, vec![]),
        ]
    }

    #[test]
    fn test_tree_writer_renames_and_skips() {
        let tree = TreeWriter::new(Grammar::standard()).write(&events());

        let expected = Node::fragment(vec![
            Node::element("text")
                .with_child(Node::text("Hello World"))
                .with_child(Node::element("strong").with_child(Node::text("!"))),
            Node::element("hr"),
        ]);
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_markup_writer_cdata_runs() {
        let markup = MarkupWriter::new(Grammar::standard()).write(&events());
        assert_eq!(
            markup,
            "<text><![CDATA[Hello World]]><strong><![CDATA[!]]></strong></text><hr/>"
        );
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let markup = MarkupWriter::new(Grammar::standard()).write(&[
            Event::start(ElementKind::P, vec![]),
            Event::text("a]]>b"),
            Event::end(ElementKind::P),
        ]);
        assert_eq!(
            markup,
            "<text><![CDATA[a]]]]><![CDATA[>b]]></text>"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(escape_attribute_value("?a=1&b=2"), "?a=1&amp;b=2");
        assert_eq!(escape_attribute_value("&amp;&#38;&#x26;"), "&amp;&#38;&#x26;");
        assert_eq!(escape_attribute_value("\"<x>\""), "&quot;&lt;x&gt;&quot;");
        assert_eq!(escape_attribute_value("trailing&"), "trailing&amp;");
        assert_eq!(escape_attribute_value("&;"), "&amp;;");
    }
}
