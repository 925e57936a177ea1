//! # Notepaste Grammar
//!
//! The fixed content grammar the cleaner enforces:
//!
//! - [`Grammar`]: one [`Entry`] per recognised element, with categories,
//!   allowed children, required parents, aliases and attribute rules
//! - [`styles`]: CSS declarations that turn into semantic elements
//! - [`Event`]: the canonical event vocabulary shared by cleaner and writers
//!
//! The standard grammar is built once per process and is read-only.

pub mod color;
pub mod error;
pub mod event;
pub mod grammar;
pub mod kind;
pub mod styles;

pub use error::GrammarError;
pub use event::Event;
pub use grammar::{
    usable_href, Allow, AttributeRule, Category, DerivedAttribute, Entry, EntrySpec, Grammar,
    IgnoreChild, Precondition, DEFAULT_BLOCK,
};
pub use kind::{ElementKind, TagName};
pub use styles::{StyleMatch, StyleProperty};
