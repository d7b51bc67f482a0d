//! Dashboard main renderer

use super::components::{candidates, comparison, footer, header, logs, results, series};
use super::state::DashboardState;
use crate::ui::router::View;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);

    let view = state.router.active();
    match view {
        View::Current => results::render_current_view(f, main_chunks[1], state),
        View::Timeline | View::TotalVotes => {
            series::render_series_view(f, main_chunks[1], state, view)
        }
        View::Comparison => comparison::render_comparison_view(f, main_chunks[1], state),
        View::Candidates => candidates::render_candidates_view(f, main_chunks[1], state),
    }

    logs::render_logs_panel(f, main_chunks[2], state);
    footer::render_footer(f, main_chunks[3], view);
}
