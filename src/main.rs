use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal};

use simple_todo::{
    application::todo_service::{TodoService, TodoServiceImpl},
    config::Config,
    infrastructure::json_repo::JsonFileRepository,
    logging,
    ui::{view, App},
};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;
    logging::init(&config)?;

    let repo = JsonFileRepository::new(config.data_file());
    let service = match TodoServiceImpl::open(repo) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "startup load failed");
            return Err(e).context("could not load to-do data; the file was left untouched");
        }
    };
    tracing::info!(path = %service.repository().path().display(), lists = service.lists().len(), "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(service));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!("shutdown");
    res
}

fn run_app<S: TodoService>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, mut app: App<S>) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    while !app.should_quit() {
        terminal.draw(|f| view::draw(f, &app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
