//! Main application state and UI loop
//!
//! Contains the App struct and key handling

use crate::api::types::ExportFormat;
use crate::events::DashboardMessage;
use crate::session::DashboardSession;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::router::View;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{Terminal, backend::Backend};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// What the loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Application state
pub struct App {
    /// Everything rendered on screen.
    state: DashboardState,

    /// Region, push subscriptions and fetch scope.
    session: DashboardSession,

    /// Receives messages from worker tasks.
    message_receiver: mpsc::Receiver<DashboardMessage>,

    /// Broadcasts shutdown signal to worker tasks.
    shutdown_sender: broadcast::Sender<()>,
}

impl App {
    pub fn new(
        state: DashboardState,
        session: DashboardSession,
        message_receiver: mpsc::Receiver<DashboardMessage>,
        shutdown_sender: broadcast::Sender<()>,
    ) -> Self {
        Self {
            state,
            session,
            message_receiver,
            shutdown_sender,
        }
    }

    fn shutdown(&self) {
        self.session.shutdown();
        let _ = self.shutdown_sender.send(());
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let state = &mut self.state;
        let session = &mut self.session;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Tab => {
                let view = state.router.active().next();
                state.enter_view(session, view);
            }
            KeyCode::BackTab => {
                let view = state.router.active().previous();
                state.enter_view(session, view);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                state.enter_view(session, View::ALL[index]);
            }
            KeyCode::Char('r') => state.refresh(session),
            KeyCode::Left => state.step_region(session, -1),
            KeyCode::Right => state.step_region(session, 1),
            KeyCode::Up if state.router.active() == View::Comparison => {
                state.move_comparison_cursor(-1)
            }
            KeyCode::Down if state.router.active() == View::Comparison => {
                state.move_comparison_cursor(1)
            }
            KeyCode::Char(' ') if state.router.active() == View::Comparison => {
                state.toggle_comparison(session)
            }
            KeyCode::Char('+') => state.cycle_range(session, true),
            KeyCode::Char('-') => state.cycle_range(session, false),
            KeyCode::Char('p') if state.router.active() == View::Candidates => {
                state.cycle_party_filter(session)
            }
            KeyCode::Char('e') => state.export(session, ExportFormat::Csv),
            KeyCode::Char('j') => state.export(session, ExportFormat::Json),
            _ => {}
        }
        Flow::Continue
    }
}

/// Runs the dashboard loop: drain worker messages, draw, then wait up to
/// 100 ms for a key press.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    app.state.start(&mut app.session);

    loop {
        while let Ok(message) = app.message_receiver.try_recv() {
            app.state.handle_message(&mut app.session, message);
        }

        app.state.update();
        terminal.draw(|f| render_dashboard(f, &app.state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                if app.handle_key(key) == Flow::Quit {
                    app.shutdown();
                    return Ok(());
                }
            }
        }
    }
}
