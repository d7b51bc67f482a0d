//! TUI mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::ui::{self, dashboard::DashboardState, router::ViewRouter};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the dashboard in TUI mode
///
/// Sets up the terminal, runs the UI loop and restores the terminal before
/// waiting for the workers.
pub async fn run_tui_mode(
    data: SessionData,
    with_background: bool,
    candidate_limit: u32,
) -> Result<(), Box<dyn Error>> {
    print_session_starting(
        "TUI",
        data.session.region(),
        &data.environment.to_string(),
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Initialize the terminal with Crossterm backend
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let state = DashboardState::new(
        data.environment.clone(),
        data.session.region().to_string(),
        ViewRouter::new(candidate_limit),
        with_background,
    );
    let app = ui::App::new(
        state,
        data.session,
        data.message_receiver,
        data.shutdown_sender.clone(),
    );

    let result = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;

    // Wait for workers to finish
    print_session_shutdown();
    for handle in data.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}
