/// Errors returned by the scoring functions and the ranker.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Term frequency ratio divides by the document length.
    #[error("term frequency is undefined for an empty document")]
    EmptyDocument,

    #[error("invalid rank config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
