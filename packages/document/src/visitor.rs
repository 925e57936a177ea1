use crate::kinds::{BlockKind, InlineKind};
use notepaste_common::{find_attribute, Attribute};

/// Whether the walker descends into the element just reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Skip the children and the matching end hook
    Skip,
}

/// Block reported to a visitor
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub kind: BlockKind,
    pub attributes: &'a [Attribute],
}

impl<'a> Block<'a> {
    /// `disc` or `number` for list paragraphs.
    pub fn list(&self) -> Option<&'a str> {
        find_attribute(self.attributes, "list")
    }
}

/// Inline element reported to a visitor
#[derive(Debug, Clone, Copy)]
pub struct Inline<'a> {
    pub kind: InlineKind,
    pub attributes: &'a [Attribute],
}

impl<'a> Inline<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        find_attribute(self.attributes, name)
    }
}

/// Callbacks for walking a canonical document
///
/// Every hook has a default that does nothing. Override the ones you need.
pub trait DocumentVisitor {
    fn on_block_start(&mut self, _block: &Block<'_>) -> Flow {
        Flow::Continue
    }

    fn on_block_end(&mut self, _block: &Block<'_>) {}

    fn on_inline_start(&mut self, _inline: &Inline<'_>) -> Flow {
        Flow::Continue
    }

    fn on_inline_end(&mut self, _inline: &Inline<'_>) {}

    /// Never called with an empty string.
    fn on_text(&mut self, _text: &str) {}
}
