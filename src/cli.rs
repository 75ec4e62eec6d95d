//! Command-line interface

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::audit::Urgency;
use crate::controller::BoardController;
use crate::kanban_board::Column;

#[derive(Parser)]
#[command(name = "taskboard", version, about = "Kanban task board for the terminal")]
pub struct Cli {
    /// Board file to use instead of the configured one
    #[arg(long, global = true, env = "TASKBOARD_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every column and its tasks
    List {
        /// Output the stored board as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a task to the To Do column
    Add {
        /// Task description
        text: String,
        /// Due date (MM/DD/YYYY or YYYY-MM-DD)
        date: String,
    },

    /// Remove every task from every column
    Clear,
}

pub fn run(command: Commands, controller: &mut BoardController) -> Result<()> {
    match command {
        Commands::List { json } => list(controller, json),
        Commands::Add { text, date } => match controller.create(&text, &date)? {
            Some(index) => {
                println!("Added task #{} to {}", index + 1, Column::ToDo.title());
                Ok(())
            }
            None => bail!("Task text and due date are both required"),
        },
        Commands::Clear => {
            controller.clear_all()?;
            println!("Cleared all tasks");
            Ok(())
        }
    }
}

fn list(controller: &BoardController, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(controller.board())?);
        return Ok(());
    }

    for column in Column::ALL {
        let tasks = controller.board().column(column);
        println!("{} ({}):", column.title(), tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            let marker = match controller.urgency(column, index) {
                Some(Urgency::Overdue) => " [overdue]",
                Some(Urgency::NearDue) => " [due soon]",
                _ => "",
            };
            println!("  {}. {} (Due: {}){}", index + 1, task.text, task.due_label(), marker);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["taskboard", "add", "Walk the dog", "10/20/2026"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Add { ref text, ref date }) if text == "Walk the dog" && date == "10/20/2026"
        ));
    }

    #[test]
    fn test_parse_no_subcommand_opens_board() {
        let cli = Cli::try_parse_from(["taskboard", "--data-file", "/tmp/x.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn test_add_then_clear() -> Result<()> {
        let temp = tempdir()?;
        let mut controller = BoardController::new(TaskStore::open(temp.path().join("tasks.json")));

        run(
            Commands::Add {
                text: "Walk the dog".into(),
                date: "2099-01-01".into(),
            },
            &mut controller,
        )?;
        assert_eq!(controller.store().load().to_do.len(), 1);

        run(Commands::Clear, &mut controller)?;
        assert!(controller.store().load().is_empty());
        Ok(())
    }

    #[test]
    fn test_add_with_empty_text_fails() -> Result<()> {
        let temp = tempdir()?;
        let mut controller = BoardController::new(TaskStore::open(temp.path().join("tasks.json")));
        let result = run(
            Commands::Add {
                text: " ".into(),
                date: "2099-01-01".into(),
            },
            &mut controller,
        );
        assert!(result.is_err());
        Ok(())
    }
}
