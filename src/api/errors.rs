use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid source or destination root; reported before any planning.
    #[error("{0}")]
    InvalidInput(String),
    /// The plan was aborted by unresolved conflicts and will not execute.
    #[error("plan aborted with {0} unresolved conflict(s)")]
    Conflicts(usize),
    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ApiError {
    /// Stable process exit status for a front-end to pass to the shell.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            ApiError::InvalidInput(_) => 1,
            ApiError::Conflicts(_) => 2,
            ApiError::Filesystem(_) => 3,
        }
    }
}

impl From<crate::types::Error> for ApiError {
    fn from(e: crate::types::Error) -> Self {
        match e {
            crate::types::Error::Io(msg) => ApiError::Filesystem(msg),
        }
    }
}
