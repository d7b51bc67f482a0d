//! Dashboard header component
//!
//! Renders the title, connection badge, view tabs and counting progress

use super::super::state::DashboardState;
use super::super::utils::format_number;
use crate::ui::router::View;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Tabs};

pub fn render_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);

    let title_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(18)])
        .split(header_chunks[0]);

    let version = env!("CARGO_PKG_VERSION");
    let mut title_spans = vec![Span::styled(
        format!("VOLBY 2025 v{} • {}", version, state.region_name()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(last_update) = &state.last_update {
        title_spans.push(Span::styled(
            format!("  updated {}", last_update),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let uptime = state.start_time.elapsed().as_secs();
    title_spans.push(Span::styled(
        format!("  up {}h {:02}m", uptime / 3600, (uptime % 3600) / 60),
        Style::default().fg(Color::DarkGray),
    ));
    let title = Paragraph::new(Line::from(title_spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, title_chunks[0]);

    let (badge_text, badge_color) = if state.connected {
        ("● Connected", Color::LightGreen)
    } else {
        ("● Disconnected", Color::LightRed)
    };
    let badge = Paragraph::new(badge_text)
        .alignment(Alignment::Right)
        .style(Style::default().fg(badge_color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(badge, title_chunks[1]);

    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.router.active().index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, header_chunks[1]);

    let (label, percent) = match &state.progress {
        Some(progress) => (
            format!(
                "Counted {}/{} districts ({:.2}%) • turnout {:.2}% • valid votes {}",
                progress.counted_districts,
                progress.total_districts,
                progress.percentage_counted,
                progress.turnout,
                format_number(progress.valid_votes)
            ),
            progress.percentage_counted.clamp(0.0, 100.0) as u16,
        ),
        None => ("Waiting for counting progress...".to_string(), 0),
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )
        .percent(percent)
        .label(label);
    f.render_widget(gauge, header_chunks[2]);
}
