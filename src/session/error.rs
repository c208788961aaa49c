use thiserror::Error;

/// Construction-time failures. Nothing inside a running session produces one of these.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
