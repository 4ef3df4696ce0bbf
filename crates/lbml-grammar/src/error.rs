use thiserror::Error;

pub type Result<T, E = GrammarError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("empty command")]
    Empty,
    #[error("invalid segment at offset {0}")]
    InvalidSegment(usize),
    #[error("number out of range at offset {0}")]
    NumberRange(usize),
    #[error("pattern compile failed: {0}")]
    Pattern(#[from] regex::Error),
}
