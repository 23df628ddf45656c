use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid change event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("Edit at {line}:{character} is outside the document ({line_count} lines)")]
    EditOutOfRange {
        line: usize,
        character: usize,
        line_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
