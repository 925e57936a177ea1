//! Shared tree model for the notepaste workspace.
//!
//! The same [`Node`] type describes the untrusted source tree handed to the
//! cleaner and the canonical tree the writer produces.

pub mod error;
pub mod markup;
pub mod result;
pub mod tree;

pub use error::*;
pub use markup::{escape_attribute, escape_cdata};
pub use result::*;
pub use tree::{find_attribute, Attribute, ElementRef, Node, FRAGMENT_NAME};
