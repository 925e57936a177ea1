//! Grammar-constrained cleaning of pasted markup.
//!
//! ```text
//! source Node ──▶ Walker ──▶ Cleaner (open/close/text) ──▶ events
//!                                                          │
//!                                   TreeWriter ◀───────────┼──────────▶ MarkupWriter
//!                                   (canonical Node)                   (CDATA markup)
//! ```
//!
//! The cleaner never fails on malformed input. Whatever the source tree
//! holds, the event stream is balanced and every element in it is allowed
//! by the grammar where it appears.

pub mod cleaner;
pub mod error;
pub mod options;
pub mod walker;
pub mod writer;

pub use cleaner::{CleanOutput, Cleaner};
pub use error::{CleanError, CleanResult};
pub use options::CleanOptions;
pub use walker::{TreeListener, Walker};
pub use writer::{MarkupWriter, TreeWriter};

use notepaste_common::Node;

/// Clean `root` with the built-in grammar and default options.
pub fn clean(root: &Node) -> CleanResult<CleanOutput<'static>> {
    Cleaner::default().clean(root)
}
