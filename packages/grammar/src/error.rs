use crate::kind::ElementKind;
use thiserror::Error;

/// Invalid grammar configuration. The built-in table never produces one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Element {0} is declared more than once")]
    Duplicate(ElementKind),

    #[error("Alias chain starting at {0} never terminates")]
    AliasCycle(ElementKind),

    #[error("Style synthesis starting at {0} leads back to itself")]
    StyleCycle(ElementKind),

    #[error("Element {kind} requires parent {parent}, which is not declared")]
    MissingParent {
        kind: ElementKind,
        parent: ElementKind,
    },

    #[error("Default block {0} is not declared as a block")]
    MissingDefaultBlock(ElementKind),
}
