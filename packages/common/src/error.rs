use thiserror::Error;

/// Errors raised when a tree does not have the shape an operation needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Expected an element node, found text {0:?}")]
    NotAnElement(String),
}

impl TreeError {
    pub fn not_an_element(content: &str) -> Self {
        const PREVIEW: usize = 32;
        let preview: String = content.chars().take(PREVIEW).collect();
        Self::NotAnElement(preview)
    }
}
