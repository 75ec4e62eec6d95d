use crate::audit::Urgency;
use crate::controller::BoardController;
use crate::kanban_board::Column;
use crate::task::parse_due_date;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TaskForm {
    text: String,
    date: String,
    focus: FormField,
}

impl TaskForm {
    fn new() -> Self {
        Self {
            text: String::new(),
            date: String::new(),
            focus: FormField::Text,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Text => &mut self.text,
            FormField::Date => &mut self.date,
        }
    }
}

/// What the selected task is showing. Edits only reach the board on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Displayed,
    EditingText { column: Column, index: usize, buffer: String },
    EditingDate { column: Column, index: usize, buffer: String },
    NewTask(TaskForm),
    ConfirmClear,
}

pub struct App {
    controller: BoardController,
    selected_column: Column,
    selected_task: usize,
    mode: Mode,
    status: String,
    should_quit: bool,
}

/// Accepts only days after `today`, like a picker with no past dates.
fn pick_future_date(input: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = parse_due_date(input).map_err(|e| e.to_string())?;
    if date <= today {
        return Err("Due date must be after today".to_string());
    }
    Ok(date)
}

impl App {
    pub fn new(controller: BoardController) -> Self {
        Self {
            controller,
            selected_column: Column::ToDo,
            selected_task: 0,
            mode: Mode::Displayed,
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &BoardController {
        &self.controller
    }

    fn column_len(&self) -> usize {
        self.controller.board().column(self.selected_column).len()
    }

    fn has_selection(&self) -> bool {
        self.selected_task < self.column_len()
    }

    fn clamp_selection(&mut self) {
        self.selected_task = self.selected_task.min(self.column_len().saturating_sub(1));
    }

    fn select_column(&mut self, column: Column) {
        self.selected_column = column;
        self.clamp_selection();
    }

    fn today(&self) -> NaiveDate {
        self.controller.now().date_naive()
    }

    fn report<T>(&mut self, result: crate::error::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Board operation failed: {}", e);
                self.status = e.to_string();
                None
            }
        }
    }

    /// Runs the periodic re-audit when it is due.
    pub fn tick(&mut self) {
        let now = self.controller.now();
        self.controller.audit_due(now);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode.clone() {
            Mode::Displayed => self.handle_board_key(key),
            Mode::EditingText { column, index, buffer } => {
                self.handle_edit_text_key(key, column, index, buffer)
            }
            Mode::EditingDate { column, index, buffer } => {
                self.handle_edit_date_key(key, column, index, buffer)
            }
            Mode::NewTask(form) => self.handle_form_key(key, form),
            Mode::ConfirmClear => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    let result = self.controller.clear_all();
                    if self.report(result).is_some() {
                        self.status = "Cleared all tasks".to_string();
                    }
                    self.selected_task = 0;
                }
                self.mode = Mode::Displayed;
            }
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        self.status.clear();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left if shift => self.move_selected(self.selected_column.prev()),
            KeyCode::Right if shift => self.move_selected(self.selected_column.next()),
            KeyCode::Up if shift => self.reorder_selected(-1),
            KeyCode::Down if shift => self.reorder_selected(1),
            KeyCode::Char('H') => self.move_selected(self.selected_column.prev()),
            KeyCode::Char('L') => self.move_selected(self.selected_column.next()),
            KeyCode::Char('K') => self.reorder_selected(-1),
            KeyCode::Char('J') => self.reorder_selected(1),
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(column) = self.selected_column.prev() {
                    self.select_column(column);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(column) = self.selected_column.next() {
                    self.select_column(column);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_task + 1 < self.column_len() {
                    self.selected_task += 1;
                }
            }
            KeyCode::Char('a') => self.mode = Mode::NewTask(TaskForm::new()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self
                    .controller
                    .board()
                    .task(self.selected_column, self.selected_task)
                {
                    self.mode = Mode::EditingText {
                        column: self.selected_column,
                        index: self.selected_task,
                        buffer: task.text.clone(),
                    };
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self
                    .controller
                    .board()
                    .task(self.selected_column, self.selected_task)
                {
                    self.mode = Mode::EditingDate {
                        column: self.selected_column,
                        index: self.selected_task,
                        buffer: task.due_label(),
                    };
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if self.has_selection() {
                    let result = self.controller.delete(self.selected_column, self.selected_task);
                    if let Some(task) = self.report(result) {
                        self.status = format!("Deleted \"{}\"", task.text);
                    }
                    self.clamp_selection();
                }
            }
            KeyCode::Char('C') => {
                if !self.controller.board().is_empty() {
                    self.mode = Mode::ConfirmClear;
                }
            }
            _ => {}
        }
    }

    fn move_selected(&mut self, target: Option<Column>) {
        let Some(target) = target else { return };
        if !self.has_selection() {
            return;
        }
        let result = self
            .controller
            .move_task(self.selected_column, self.selected_task, target);
        if let Some(index) = self.report(result) {
            self.selected_column = target;
            self.selected_task = index;
        }
    }

    fn reorder_selected(&mut self, offset: isize) {
        if !self.has_selection() {
            return;
        }
        let new_index = self.selected_task as isize + offset;
        if new_index < 0 || new_index as usize >= self.column_len() {
            return;
        }
        let result = self.controller.reorder(
            self.selected_column,
            self.selected_task,
            new_index as usize,
        );
        if self.report(result).is_some() {
            self.selected_task = new_index as usize;
        }
    }

    fn handle_edit_text_key(&mut self, key: KeyEvent, column: Column, index: usize, mut buffer: String) {
        match key.code {
            KeyCode::Enter => {
                let result = self.controller.edit_text(column, index, &buffer);
                self.report(result);
                self.mode = Mode::Displayed;
            }
            KeyCode::Esc => self.mode = Mode::Displayed,
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::EditingText { column, index, buffer };
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = Mode::EditingText { column, index, buffer };
            }
            _ => {}
        }
    }

    fn handle_edit_date_key(&mut self, key: KeyEvent, column: Column, index: usize, mut buffer: String) {
        match key.code {
            KeyCode::Enter => match pick_future_date(&buffer, self.today()) {
                Ok(_) => {
                    let result = self.controller.edit_date(column, index, &buffer);
                    self.report(result);
                    self.mode = Mode::Displayed;
                }
                Err(message) => self.status = message,
            },
            KeyCode::Esc => self.mode = Mode::Displayed,
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::EditingDate { column, index, buffer };
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = Mode::EditingDate { column, index, buffer };
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, mut form: TaskForm) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Displayed;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                form.focus = match form.focus {
                    FormField::Text => FormField::Date,
                    FormField::Date => FormField::Text,
                };
            }
            KeyCode::Backspace => {
                form.focused_mut().pop();
            }
            KeyCode::Char(c) => form.focused_mut().push(c),
            KeyCode::Enter => {
                if !form.date.trim().is_empty() {
                    if let Err(message) = pick_future_date(&form.date, self.today()) {
                        self.status = message;
                        self.mode = Mode::NewTask(form);
                        return;
                    }
                }
                let result = self.controller.create(&form.text, &form.date);
                match self.report(result) {
                    Some(Some(index)) => {
                        self.select_column(Column::ToDo);
                        self.selected_task = index;
                        self.status.clear();
                        self.mode = Mode::Displayed;
                        return;
                    }
                    Some(None) => self.status = "Description and due date are required".to_string(),
                    None => {}
                }
            }
            _ => {}
        }
        self.mode = Mode::NewTask(form);
    }

    fn render(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(f.area());

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(25); Column::ALL.len()])
            .split(rows[0]);

        for (i, column) in Column::ALL.into_iter().enumerate() {
            let selected = column == self.selected_column;
            let items: Vec<ListItem> = self
                .controller
                .board()
                .column(column)
                .iter()
                .enumerate()
                .map(|(index, t)| {
                    let (text, date) = match &self.mode {
                        Mode::EditingText { column: c, index: idx, buffer } if *c == column && *idx == index => {
                            (format!("{}_", buffer), t.due_label())
                        }
                        Mode::EditingDate { column: c, index: idx, buffer } if *c == column && *idx == index => {
                            (t.text.clone(), format!("{}_", buffer))
                        }
                        _ => (t.text.clone(), t.due_label()),
                    };
                    let style = match self.controller.urgency(column, index) {
                        Some(Urgency::Overdue) => Style::default().fg(Color::Red),
                        Some(Urgency::NearDue) => Style::default().fg(Color::Yellow),
                        _ => Style::default().fg(Color::White),
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(text, style),
                        Span::raw(format!(" (Due: {})", date)),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(column.title())
                        .borders(Borders::ALL)
                        .border_style(if selected {
                            Style::default().fg(Color::Cyan)
                        } else {
                            Style::default()
                        }),
                )
                .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

            let mut state = ListState::default();
            if selected && self.has_selection() {
                state.select(Some(self.selected_task));
            }
            f.render_stateful_widget(list, chunks[i], &mut state);
        }

        let help = match self.mode {
            Mode::Displayed => {
                "a add  e edit  d date  H/L move  K/J reorder  x delete  C clear all  q quit"
            }
            Mode::EditingText { .. } | Mode::EditingDate { .. } => "Enter save  Esc cancel",
            Mode::NewTask(_) => "Tab switch field  Enter save  Esc cancel",
            Mode::ConfirmClear => "Remove every task? y to confirm, any other key to cancel",
        };
        let footer = Paragraph::new(vec![
            Line::from(Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow))),
            Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
        ]);
        f.render_widget(footer, rows[1]);

        if let Mode::NewTask(form) = &self.mode {
            render_form(f, form);
        }
    }
}

fn render_form(f: &mut Frame, form: &TaskForm) {
    let area = centered_rect(60, 8, f.area());
    f.render_widget(Clear, area);

    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<12}", label), style),
            Span::raw(format!("{}{}", value, cursor)),
        ])
    };

    let body = Paragraph::new(vec![
        Line::from(""),
        field("Description", &form.text, form.focus == FormField::Text),
        Line::from(""),
        field("Due date", &form.date, form.focus == FormField::Date),
    ])
    .block(Block::default().title("New Task").borders(Borders::ALL));
    f.render_widget(body, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
        app.tick();
    }
}
