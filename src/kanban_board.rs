use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    ToDo,
    InProgress,
    InReview,
    Done,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::ToDo,
        Column::InProgress,
        Column::InReview,
        Column::Done,
    ];

    pub fn index(self) -> usize {
        match self {
            Column::ToDo => 0,
            Column::InProgress => 1,
            Column::InReview => 2,
            Column::Done => 3,
        }
    }

    /// Storage key, as used in the persisted JSON object.
    pub fn key(self) -> &'static str {
        match self {
            Column::ToDo => "toDo",
            Column::InProgress => "inProgress",
            Column::InReview => "inReview",
            Column::Done => "done",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::ToDo => "To Do",
            Column::InProgress => "In Progress",
            Column::InReview => "In Review",
            Column::Done => "Done",
        }
    }

    pub fn next(self) -> Option<Column> {
        Column::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Column> {
        self.index().checked_sub(1).map(|i| Column::ALL[i])
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// All tasks, grouped by column in display order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    pub to_do: Vec<Task>,
    #[serde(default)]
    pub in_progress: Vec<Task>,
    #[serde(default)]
    pub in_review: Vec<Task>,
    #[serde(default)]
    pub done: Vec<Task>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, column: Column) -> &[Task] {
        match column {
            Column::ToDo => &self.to_do,
            Column::InProgress => &self.in_progress,
            Column::InReview => &self.in_review,
            Column::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, column: Column) -> &mut Vec<Task> {
        match column {
            Column::ToDo => &mut self.to_do,
            Column::InProgress => &mut self.in_progress,
            Column::InReview => &mut self.in_review,
            Column::Done => &mut self.done,
        }
    }

    pub fn task(&self, column: Column, index: usize) -> Option<&Task> {
        self.column(column).get(index)
    }

    /// Every task with its position, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (Column, usize, &Task)> {
        Column::ALL.into_iter().flat_map(move |column| {
            self.column(column)
                .iter()
                .enumerate()
                .map(move |(index, task)| (column, index, task))
        })
    }

    pub fn len(&self) -> usize {
        Column::ALL.iter().map(|c| self.column(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(text: &str) -> Task {
        Task::new(text, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap())
    }

    #[test]
    fn test_column_keys_match_serde() {
        for column in Column::ALL {
            let json = serde_json::to_string(&column).unwrap();
            assert_eq!(json, format!("\"{}\"", column.key()));
        }
    }

    #[test]
    fn test_column_neighbours() {
        assert_eq!(Column::ToDo.prev(), None);
        assert_eq!(Column::ToDo.next(), Some(Column::InProgress));
        assert_eq!(Column::InReview.prev(), Some(Column::InProgress));
        assert_eq!(Column::Done.next(), None);
    }

    #[test]
    fn test_empty_board_serializes_four_keys() {
        let json = serde_json::to_value(Board::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "toDo": [], "inProgress": [], "inReview": [], "done": [] })
        );
    }

    #[test]
    fn test_missing_column_key_reads_as_empty() {
        let board: Board =
            serde_json::from_str(r#"{"toDo":[{"text":"a","date":"01/02/2026"}]}"#).unwrap();
        assert_eq!(board.to_do, vec![task("a")]);
        assert!(board.done.is_empty());
    }

    #[test]
    fn test_iter_walks_columns_in_order() {
        let mut board = Board::new();
        board.done.push(task("d"));
        board.to_do.push(task("a"));
        board.to_do.push(task("b"));
        board.in_review.push(task("c"));

        let seen: Vec<_> = board
            .iter()
            .map(|(c, i, t)| (c, i, t.text.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Column::ToDo, 0, "a"),
                (Column::ToDo, 1, "b"),
                (Column::InReview, 0, "c"),
                (Column::Done, 0, "d"),
            ]
        );
        assert_eq!(board.len(), 4);
    }
}
