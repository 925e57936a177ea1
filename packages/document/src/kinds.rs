use serde::Serialize;

/// Block-level element of the canonical tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    H1,
    H2,
    H3,
    Quote,
    Table,
    Row,
    Cell,
    HeaderCell,
    Rule,
}

impl BlockKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "text" => BlockKind::Paragraph,
            "h1" => BlockKind::H1,
            "h2" => BlockKind::H2,
            "h3" => BlockKind::H3,
            "quote" => BlockKind::Quote,
            "table" => BlockKind::Table,
            "tr" => BlockKind::Row,
            "td" => BlockKind::Cell,
            "th" => BlockKind::HeaderCell,
            "hr" => BlockKind::Rule,
            _ => return None,
        };
        Some(kind)
    }

    /// Element name used in the XML export.
    pub fn xml_name(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::H1 => "h1",
            BlockKind::H2 => "h2",
            BlockKind::H3 => "h3",
            BlockKind::Quote => "quote",
            BlockKind::Table => "table",
            BlockKind::Row => "tr",
            BlockKind::Cell => "td",
            BlockKind::HeaderCell => "th",
            BlockKind::Rule => "hr",
        }
    }
}

/// Inline element of the canonical tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineKind {
    Link,
    Strong,
    Emphasis,
    Subscript,
    Superscript,
    Underline,
    Strike,
    Code,
    Cite,
    Highlight,
    Font,
}

impl InlineKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "a" => InlineKind::Link,
            "strong" => InlineKind::Strong,
            "em" => InlineKind::Emphasis,
            "sub" => InlineKind::Subscript,
            "sup" => InlineKind::Superscript,
            "u" => InlineKind::Underline,
            "strike" => InlineKind::Strike,
            "code" => InlineKind::Code,
            "cite" => InlineKind::Cite,
            "highlight" => InlineKind::Highlight,
            "font" => InlineKind::Font,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            InlineKind::Link => "a",
            InlineKind::Strong => "strong",
            InlineKind::Emphasis => "em",
            InlineKind::Subscript => "sub",
            InlineKind::Superscript => "sup",
            InlineKind::Underline => "u",
            InlineKind::Strike => "strike",
            InlineKind::Code => "code",
            InlineKind::Cite => "cite",
            InlineKind::Highlight => "highlight",
            InlineKind::Font => "font",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names() {
        assert_eq!(BlockKind::from_name("text"), Some(BlockKind::Paragraph));
        assert_eq!(BlockKind::Paragraph.xml_name(), "paragraph");
        assert_eq!(BlockKind::from_name("strong"), None);
        assert_eq!(
            serde_json::to_value(BlockKind::HeaderCell).unwrap(),
            "headercell"
        );
    }

    #[test]
    fn test_inline_names_round_trip() {
        for name in ["a", "strong", "em", "sub", "sup", "u", "strike", "code", "cite", "highlight", "font"] {
            let kind = InlineKind::from_name(name).unwrap();
            assert_eq!(kind.name(), name);
        }
        assert_eq!(InlineKind::from_name("text"), None);
    }
}
