//! Board persistence - a single JSON entry on disk

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::kanban_board::{Board, Column};
use crate::task::Task;

pub struct TaskStore {
    path: PathBuf,
    board: Board,
}

impl TaskStore {
    /// Opens the entry at `path`, loading whatever board it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            board: Board::new(),
        };
        store.board = store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reads the persisted board. Absent or corrupt entries read as an empty board.
    pub fn load(&self) -> Board {
        if !self.path.exists() {
            debug!("No board at {}, starting empty", self.path.display());
            return Board::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return Board::new();
            }
        };

        match decode(&content) {
            Some(board) => {
                info!("Loaded {} tasks from {}", board.len(), self.path.display());
                board
            }
            None => {
                warn!("Ignoring malformed board at {}", self.path.display());
                let corrupt_path = with_suffix(&self.path, ".corrupt");
                if let Err(e) = fs::copy(&self.path, &corrupt_path) {
                    warn!("Failed to keep a copy of the malformed board: {}", e);
                }
                Board::new()
            }
        }
    }

    /// Persists the in-memory board. The entry is replaced atomically.
    pub fn save(&self) -> Result<()> {
        write_entry(&self.path, &self.board)
    }

    /// Persists `board` and makes it the in-memory board. On failure the
    /// in-memory board is left untouched.
    pub fn commit(&mut self, board: Board) -> Result<()> {
        write_entry(&self.path, &board)?;
        self.board = board;
        Ok(())
    }

    pub fn replace_column(&mut self, column: Column, tasks: Vec<Task>) -> Result<()> {
        self.replace_columns(vec![(column, tasks)])
    }

    /// Rewrites several columns in a single save.
    pub fn replace_columns(&mut self, columns: Vec<(Column, Vec<Task>)>) -> Result<()> {
        let mut board = self.board.clone();
        for (column, tasks) in columns {
            *board.column_mut(column) = tasks;
        }
        self.commit(board)
    }
}

/// `path` with `suffix` appended to its file name.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn write_entry(path: &Path, board: &Board) -> Result<()> {
    let content = encode(board)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = with_suffix(path, ".tmp");
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    debug!("Saved {} tasks to {}", board.len(), path.display());
    Ok(())
}

pub fn encode(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(board)?)
}

/// Parses a persisted board; `None` when the content is not a valid board.
pub fn decode(content: &str) -> Option<Board> {
    if content.trim().is_empty() {
        return None;
    }
    serde_json::from_str(content).ok()
}
