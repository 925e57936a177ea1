use notepaste_common::TreeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<TreeError> for CleanError {
    fn from(err: TreeError) -> Self {
        CleanError::InvalidArgument(err.to_string())
    }
}

pub type CleanResult<T> = Result<T, CleanError>;
