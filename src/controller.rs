//! Board operations: every mutation persists before returning and keeps
//! audit results in step with the board.

use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{debug, info};

use crate::audit::{AuditPolicy, Urgency};
use crate::error::{BoardError, Result};
use crate::kanban_board::{Board, Column};
use crate::store::TaskStore;
use crate::task::{parse_due_date, Task};

pub type Clock = fn() -> DateTime<Local>;

pub const DEFAULT_AUDIT_INTERVAL: Duration = Duration::from_secs(30 * 60);

pub struct BoardController {
    store: TaskStore,
    policy: AuditPolicy,
    clock: Clock,
    audit_interval: Duration,
    last_audit: Option<DateTime<Local>>,
    /// One entry per task, mirroring the board's column order.
    urgency: [Vec<Urgency>; 4],
}

impl BoardController {
    pub fn new(store: TaskStore) -> Self {
        let mut controller = Self {
            store,
            policy: AuditPolicy::default(),
            clock: Local::now,
            audit_interval: DEFAULT_AUDIT_INTERVAL,
            last_audit: None,
            urgency: Default::default(),
        };
        let now = (controller.clock)();
        controller.audit_all(now);
        controller
    }

    pub fn with_policy(mut self, policy: AuditPolicy) -> Self {
        self.policy = policy;
        let now = self.now();
        self.audit_all(now);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        let now = self.now();
        self.audit_all(now);
        self
    }

    pub fn with_audit_interval(mut self, interval: Duration) -> Self {
        self.audit_interval = interval;
        self
    }

    pub fn board(&self) -> &Board {
        self.store.board()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    /// Last audit result for the task at `(column, index)`.
    pub fn urgency(&self, column: Column, index: usize) -> Option<Urgency> {
        self.urgency[column.index()].get(index).copied()
    }

    /// Adds a task to `toDo`. Returns its index, or `None` if a field was empty.
    pub fn create(&mut self, text: &str, due_date: &str) -> Result<Option<usize>> {
        let text = text.trim();
        let due_date = due_date.trim();
        if text.is_empty() || due_date.is_empty() {
            debug!("Rejected task with an empty field");
            return Ok(None);
        }
        let due_date = parse_due_date(due_date)?;

        let mut tasks = self.board().column(Column::ToDo).to_vec();
        tasks.push(Task::new(text, due_date));
        let index = tasks.len() - 1;
        self.store.replace_column(Column::ToDo, tasks)?;

        let now = self.now();
        self.urgency[Column::ToDo.index()].push(self.policy.classify(due_date, &now));
        debug!("Created task {} in {}", index, Column::ToDo);
        Ok(Some(index))
    }

    pub fn edit_text(&mut self, column: Column, index: usize, new_text: &str) -> Result<()> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(BoardError::EmptyField("text"));
        }
        let mut tasks = self.column_with(column, index)?;
        tasks[index].text = new_text.to_string();
        self.store.replace_column(column, tasks)?;
        debug!("Edited text of {}[{}]", column, index);
        Ok(())
    }

    /// Replaces the due date and re-audits the task right away.
    pub fn edit_date(&mut self, column: Column, index: usize, new_date: &str) -> Result<Urgency> {
        let due_date = parse_due_date(new_date)?;
        let mut tasks = self.column_with(column, index)?;
        tasks[index].due_date = due_date;
        self.store.replace_column(column, tasks)?;

        let now = self.now();
        let urgency = self.policy.classify(due_date, &now);
        if let Some(slot) = self.urgency[column.index()].get_mut(index) {
            *slot = urgency;
        }
        debug!("Edited due date of {}[{}]: {:?}", column, index, urgency);
        Ok(urgency)
    }

    /// Replaces a column's contents with `tasks`, in order.
    pub fn move_or_reorder(&mut self, column: Column, tasks: Vec<Task>) -> Result<()> {
        self.store.replace_column(column, tasks)?;
        let now = self.now();
        self.audit_column(column, now);
        Ok(())
    }

    /// Moves a task to the end of another column. Both columns are
    /// rewritten in one save, so a failed save leaves the task where it was.
    pub fn move_task(&mut self, from: Column, index: usize, to: Column) -> Result<usize> {
        let mut source = self.board().column(from).to_vec();
        if index >= source.len() {
            return Err(BoardError::TaskNotFound { column: from, index });
        }
        if from == to {
            return Ok(index);
        }
        let task = source.remove(index);
        let mut destination = self.board().column(to).to_vec();
        destination.push(task);
        let new_index = destination.len() - 1;

        self.store.replace_columns(vec![(from, source), (to, destination)])?;
        let now = self.now();
        self.audit_column(from, now);
        self.audit_column(to, now);
        debug!("Moved {}[{}] to {}[{}]", from, index, to, new_index);
        Ok(new_index)
    }

    /// Moves a task to `new_index` within its column.
    pub fn reorder(&mut self, column: Column, index: usize, new_index: usize) -> Result<()> {
        let mut tasks = self.board().column(column).to_vec();
        if index >= tasks.len() || new_index >= tasks.len() {
            return Err(BoardError::TaskNotFound { column, index });
        }
        let task = tasks.remove(index);
        tasks.insert(new_index, task);
        self.move_or_reorder(column, tasks)
    }

    /// Removes a task. The column is rewritten like any other reorder.
    pub fn delete(&mut self, column: Column, index: usize) -> Result<Task> {
        let mut tasks = self.board().column(column).to_vec();
        if index >= tasks.len() {
            return Err(BoardError::TaskNotFound { column, index });
        }
        let removed = tasks.remove(index);
        self.move_or_reorder(column, tasks)?;
        debug!("Deleted {}[{}]", column, index);
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.store.commit(Board::new())?;
        for urgency in &mut self.urgency {
            urgency.clear();
        }
        info!("Cleared all tasks");
        Ok(())
    }

    /// Re-classifies every task against `now`.
    pub fn audit_all(&mut self, now: DateTime<Local>) {
        for column in Column::ALL {
            self.audit_column(column, now);
        }
        self.last_audit = Some(now);
    }

    /// Periodic re-audit. Runs `audit_all` once the audit interval has
    /// passed since the last one; returns whether it ran.
    pub fn audit_due(&mut self, now: DateTime<Local>) -> bool {
        let due = match self.last_audit {
            None => true,
            // a clock that went backwards counts as due
            Some(last) => (now - last)
                .to_std()
                .map(|elapsed| elapsed >= self.audit_interval)
                .unwrap_or(true),
        };
        if due {
            self.audit_all(now);
        }
        due
    }

    fn audit_column(&mut self, column: Column, now: DateTime<Local>) {
        let policy = self.policy;
        self.urgency[column.index()] = self
            .store
            .board()
            .column(column)
            .iter()
            .map(|task| policy.classify(task.due_date, &now))
            .collect();
    }

    /// A copy of `column`, checked to hold a task at `index`.
    fn column_with(&self, column: Column, index: usize) -> Result<Vec<Task>> {
        let tasks = self.board().column(column);
        if index >= tasks.len() {
            return Err(BoardError::TaskNotFound { column, index });
        }
        Ok(tasks.to_vec())
    }
}
