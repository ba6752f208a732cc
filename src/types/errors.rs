//! Error types used across Linkfarm.
use thiserror::Error;

/// Failure reading or resolving paths while a walk is in progress. These are
/// environmental errors, not conflicts; the facade maps them to the
/// filesystem exit status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
