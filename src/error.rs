use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefragError {
    #[error("empty input: expected one non-empty line of run-length digits")]
    EmptyInput,

    #[error("malformed input: non-digit character {found:?} at offset {offset}")]
    MalformedInput { offset: usize, found: char },

    #[error("layout invariant violated: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DefragError>;
