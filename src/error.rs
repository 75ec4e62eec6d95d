use thiserror::Error;

use crate::kanban_board::Column;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("No task at position {index} in {column}")]
    TaskNotFound { column: Column, index: usize },

    #[error("Task {0} must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid due date: {0:?} (expected MM/DD/YYYY or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize board: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
