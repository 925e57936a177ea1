//! Reading the canonical tree the cleaner writes.
//!
//! [`DocumentWalker`] reports blocks, inline elements and text to a
//! [`DocumentVisitor`]. [`export_xml`] is built on top of it.

pub mod kinds;
pub mod visitor;
pub mod walker;
pub mod xml;

pub use kinds::{BlockKind, InlineKind};
pub use visitor::{Block, DocumentVisitor, Flow, Inline};
pub use walker::DocumentWalker;
pub use xml::export_xml;
