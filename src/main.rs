use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::OpenOptions, io, path::Path, sync::Mutex};
use taskboard::{
    cli::{self, Cli},
    config::Config,
    controller::BoardController,
    store::TaskStore,
    ui::{self, App},
};

fn init_logging(data_file: &Path) -> Result<()> {
    if std::env::var("TASKBOARD_DEBUG").is_err() {
        return Ok(());
    }
    let log_path = data_file.with_file_name("taskboard.log");
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TASKBOARD_LOG")
                .unwrap_or_else(|_| "taskboard=debug".into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let data_file = match cli.data_file {
        Some(path) => path,
        None => config.data_file()?,
    };
    init_logging(&data_file)?;

    let store = TaskStore::open(&data_file);
    let mut controller = BoardController::new(store)
        .with_policy(config.audit_policy())
        .with_audit_interval(config.audit_interval());

    if let Some(command) = cli.command {
        return cli::run(command, &mut controller);
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("Board UI failed")
}
