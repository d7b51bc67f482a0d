//! Candidates view

use super::super::state::DashboardState;
use super::super::utils::format_number;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

pub fn render_candidates_view(f: &mut Frame, area: Rect, state: &DashboardState) {
    let filter = state
        .router
        .party_filter()
        .map(|code| state.party_name(code))
        .unwrap_or_else(|| "all parties".to_string());

    let rows: Vec<Row> = state
        .candidates
        .iter()
        .map(|candidate| {
            let style = if candidate.elected {
                Style::default().fg(Color::LightGreen)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(candidate.full_name()),
                Cell::from(candidate.party_name.clone()),
                Cell::from(candidate.region_name.clone()),
                Cell::from(candidate.position.to_string()),
                Cell::from(format_number(candidate.preferential_votes)),
                Cell::from(format!("{:.2}%", candidate.preferential_percentage)),
                Cell::from(if candidate.elected { "✓" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        "Name", "Party", "Region", "Pos.", "Pref. votes", "Pref. %", "Elected",
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!("CANDIDATES • {}", filter))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, area);
}
