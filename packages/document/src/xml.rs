//! XML export of a canonical document.

use crate::visitor::{Block, DocumentVisitor, Flow, Inline};
use crate::walker::DocumentWalker;
use notepaste_common::{escape_attribute, escape_cdata, Attribute, Node, TreeResult};
use tracing::{debug, instrument};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Export `root` as a `<root>` document of blocks, inline tags and CDATA text.
///
/// With `pretty`, every block starts on its own line, indented two spaces
/// per level.
#[instrument(skip(root))]
pub fn export_xml(root: &Node, pretty: bool) -> TreeResult<String> {
    let walker = DocumentWalker::new(root)?;
    let mut exporter = XmlExporter::new(pretty);
    walker.walk(&mut exporter);
    let xml = exporter.finish();
    debug!(bytes = xml.len(), "Exported document");
    Ok(xml)
}

struct XmlExporter {
    out: String,
    pretty: bool,
    /// One entry per open block (and the root): whether it holds child blocks
    nested: Vec<bool>,
}

impl XmlExporter {
    fn new(pretty: bool) -> Self {
        let mut out = String::from(DECLARATION);
        if pretty {
            out.push('\n');
        }
        out.push_str("<root>");
        Self {
            out,
            pretty,
            nested: vec![false],
        }
    }

    fn finish(mut self) -> String {
        if self.nested.last().copied().unwrap_or(false) {
            self.newline(0);
        }
        self.out.push_str("</root>");
        if self.pretty {
            self.out.push('\n');
        }
        self.out
    }

    fn newline(&mut self, depth: usize) {
        if self.pretty {
            self.out.push('\n');
            self.out.push_str(&"  ".repeat(depth));
        }
    }

    fn open(&mut self, name: &str, attributes: &[Attribute]) {
        self.out.push('<');
        self.out.push_str(name);
        for attr in attributes {
            self.out.push(' ');
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(&attr.value));
            self.out.push('"');
        }
        self.out.push('>');
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }
}

impl DocumentVisitor for XmlExporter {
    fn on_block_start(&mut self, block: &Block<'_>) -> Flow {
        if let Some(parent) = self.nested.last_mut() {
            *parent = true;
        }
        let depth = self.nested.len();
        self.newline(depth);

        let list: Vec<Attribute> = block
            .list()
            .map(|style| Attribute::new("list", style))
            .into_iter()
            .collect();
        self.open(block.kind.xml_name(), &list);
        self.nested.push(false);
        Flow::Continue
    }

    fn on_block_end(&mut self, block: &Block<'_>) {
        if self.nested.pop().unwrap_or(false) {
            let depth = self.nested.len();
            self.newline(depth);
        }
        self.close(block.kind.xml_name());
    }

    fn on_inline_start(&mut self, inline: &Inline<'_>) -> Flow {
        self.open(inline.kind.name(), inline.attributes);
        Flow::Continue
    }

    fn on_inline_end(&mut self, inline: &Inline<'_>) {
        self.close(inline.kind.name());
    }

    fn on_text(&mut self, text: &str) {
        self.out.push_str("<![CDATA[");
        self.out.push_str(&escape_cdata(text));
        self.out.push_str("]]>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::fragment(vec![
            Node::element("h1").with_child(Node::text("Notes")),
            Node::element("text")
                .with_attr("list", "disc")
                .with_child(Node::text("a & b"))
                .with_child(
                    Node::element("a")
                        .with_attr("href", "/?x=1&y=2")
                        .with_child(Node::text("link")),
                )
                .with_child(Node::element("text").with_child(Node::text("nested"))),
            Node::element("hr"),
        ])
    }

    #[test]
    fn test_compact_export() {
        let xml = export_xml(&sample(), false).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?><root>"#,
                "<h1><![CDATA[Notes]]></h1>",
                r#"<paragraph list="disc"><![CDATA[a & b]]>"#,
                r#"<a href="/?x=1&amp;y=2"><![CDATA[link]]></a>"#,
                "<paragraph><![CDATA[nested]]></paragraph></paragraph>",
                "<hr></hr></root>",
            )
        );
    }

    #[test]
    fn test_pretty_export() {
        let xml = export_xml(&sample(), true).unwrap();
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <h1><![CDATA[Notes]]></h1>
  <paragraph list="disc"><![CDATA[a & b]]><a href="/?x=1&amp;y=2"><![CDATA[link]]></a>
    <paragraph><![CDATA[nested]]></paragraph>
  </paragraph>
  <hr></hr>
</root>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            export_xml(&Node::fragment(Vec::new()), false).unwrap(),
            r#"<?xml version="1.0" encoding="utf-8"?><root></root>"#
        );
    }

    #[test]
    fn test_text_root_is_rejected() {
        assert!(export_xml(&Node::text("x"), false).is_err());
    }
}
