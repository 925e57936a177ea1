use crate::error::TreeError;

/// Result type for tree accessors
pub type TreeResult<T> = Result<T, TreeError>;
