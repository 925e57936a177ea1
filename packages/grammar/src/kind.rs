use serde::{Serialize, Serializer};
use std::fmt;

/// Every element name the grammar knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    // Blocks
    P,
    Text,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
    Quote,
    Hr,

    // Lists
    Ul,
    Ol,
    Li,
    Dl,
    Dt,
    Dd,

    // Tables
    Table,
    Tr,
    Td,
    Th,

    // Inline
    A,
    B,
    Strong,
    I,
    Em,
    Sub,
    Sup,
    U,
    S,
    Strike,
    Code,
    Cite,

    /// `_highlight`, only produced by style synthesis
    SyntheticHighlight,
    /// `_font`, only produced by style synthesis
    SyntheticFont,
    Highlight,
    Font,

    // Content kept, element dropped
    Acronym,
    Ins,
    Small,
    Span,
    St1,
    Var,
    Wbr,

    // Aliases and markers
    Div,
    Pre,
    Br,
}

impl ElementKind {
    pub const ALL: &'static [ElementKind] = &[
        ElementKind::P,
        ElementKind::Text,
        ElementKind::H1,
        ElementKind::H2,
        ElementKind::H3,
        ElementKind::H4,
        ElementKind::H5,
        ElementKind::H6,
        ElementKind::Blockquote,
        ElementKind::Quote,
        ElementKind::Hr,
        ElementKind::Ul,
        ElementKind::Ol,
        ElementKind::Li,
        ElementKind::Dl,
        ElementKind::Dt,
        ElementKind::Dd,
        ElementKind::Table,
        ElementKind::Tr,
        ElementKind::Td,
        ElementKind::Th,
        ElementKind::A,
        ElementKind::B,
        ElementKind::Strong,
        ElementKind::I,
        ElementKind::Em,
        ElementKind::Sub,
        ElementKind::Sup,
        ElementKind::U,
        ElementKind::S,
        ElementKind::Strike,
        ElementKind::Code,
        ElementKind::Cite,
        ElementKind::SyntheticHighlight,
        ElementKind::SyntheticFont,
        ElementKind::Highlight,
        ElementKind::Font,
        ElementKind::Acronym,
        ElementKind::Ins,
        ElementKind::Small,
        ElementKind::Span,
        ElementKind::St1,
        ElementKind::Var,
        ElementKind::Wbr,
        ElementKind::Div,
        ElementKind::Pre,
        ElementKind::Br,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::P => "p",
            ElementKind::Text => "text",
            ElementKind::H1 => "h1",
            ElementKind::H2 => "h2",
            ElementKind::H3 => "h3",
            ElementKind::H4 => "h4",
            ElementKind::H5 => "h5",
            ElementKind::H6 => "h6",
            ElementKind::Blockquote => "blockquote",
            ElementKind::Quote => "quote",
            ElementKind::Hr => "hr",
            ElementKind::Ul => "ul",
            ElementKind::Ol => "ol",
            ElementKind::Li => "li",
            ElementKind::Dl => "dl",
            ElementKind::Dt => "dt",
            ElementKind::Dd => "dd",
            ElementKind::Table => "table",
            ElementKind::Tr => "tr",
            ElementKind::Td => "td",
            ElementKind::Th => "th",
            ElementKind::A => "a",
            ElementKind::B => "b",
            ElementKind::Strong => "strong",
            ElementKind::I => "i",
            ElementKind::Em => "em",
            ElementKind::Sub => "sub",
            ElementKind::Sup => "sup",
            ElementKind::U => "u",
            ElementKind::S => "s",
            ElementKind::Strike => "strike",
            ElementKind::Code => "code",
            ElementKind::Cite => "cite",
            ElementKind::SyntheticHighlight => "_highlight",
            ElementKind::SyntheticFont => "_font",
            ElementKind::Highlight => "highlight",
            ElementKind::Font => "font",
            ElementKind::Acronym => "acronym",
            ElementKind::Ins => "ins",
            ElementKind::Small => "small",
            ElementKind::Span => "span",
            ElementKind::St1 => "st1",
            ElementKind::Var => "var",
            ElementKind::Wbr => "wbr",
            ElementKind::Div => "div",
            ElementKind::Pre => "pre",
            ElementKind::Br => "br",
        }
    }

    /// Exact (already lowercased) name lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "p" => ElementKind::P,
            "text" => ElementKind::Text,
            "h1" => ElementKind::H1,
            "h2" => ElementKind::H2,
            "h3" => ElementKind::H3,
            "h4" => ElementKind::H4,
            "h5" => ElementKind::H5,
            "h6" => ElementKind::H6,
            "blockquote" => ElementKind::Blockquote,
            "quote" => ElementKind::Quote,
            "hr" => ElementKind::Hr,
            "ul" => ElementKind::Ul,
            "ol" => ElementKind::Ol,
            "li" => ElementKind::Li,
            "dl" => ElementKind::Dl,
            "dt" => ElementKind::Dt,
            "dd" => ElementKind::Dd,
            "table" => ElementKind::Table,
            "tr" => ElementKind::Tr,
            "td" => ElementKind::Td,
            "th" => ElementKind::Th,
            "a" => ElementKind::A,
            "b" => ElementKind::B,
            "strong" => ElementKind::Strong,
            "i" => ElementKind::I,
            "em" => ElementKind::Em,
            "sub" => ElementKind::Sub,
            "sup" => ElementKind::Sup,
            "u" => ElementKind::U,
            "s" => ElementKind::S,
            "strike" => ElementKind::Strike,
            "code" => ElementKind::Code,
            "cite" => ElementKind::Cite,
            "_highlight" => ElementKind::SyntheticHighlight,
            "_font" => ElementKind::SyntheticFont,
            "highlight" => ElementKind::Highlight,
            "font" => ElementKind::Font,
            "acronym" => ElementKind::Acronym,
            "ins" => ElementKind::Ins,
            "small" => ElementKind::Small,
            "span" => ElementKind::Span,
            "st1" => ElementKind::St1,
            "var" => ElementKind::Var,
            "wbr" => ElementKind::Wbr,
            "div" => ElementKind::Div,
            "pre" => ElementKind::Pre,
            "br" => ElementKind::Br,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Element name as seen in the source tree: known to the grammar or opaque
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagName {
    Known(ElementKind),
    Unknown(String),
}

impl TagName {
    /// Case-insensitive parse of a source element name.
    pub fn parse(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        match ElementKind::from_name(&lower) {
            Some(kind) => TagName::Known(kind),
            None => TagName::Unknown(lower),
        }
    }

    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            TagName::Known(kind) => Some(*kind),
            TagName::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TagName::Known(kind) => kind.name(),
            TagName::Unknown(name) => name,
        }
    }
}

impl From<ElementKind> for TagName {
    fn from(kind: ElementKind) -> Self {
        TagName::Known(kind)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_for_every_kind() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(TagName::parse("DIV"), TagName::Known(ElementKind::Div));
        assert_eq!(
            TagName::parse("O:P"),
            TagName::Unknown("o:p".to_string())
        );
    }
}
