//! Current view: results table, predictions and counting speed

use super::super::state::DashboardState;
use super::super::utils::{format_number, party_color, trend_color};
use crate::reconcile::progress::{estimated_completion, remaining_label};
use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, BorderType, Borders, Cell, Paragraph, Row, Table,
};

pub fn render_current_view(f: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(7)])
        .split(columns[1]);

    render_results_table(f, columns[0], state);
    render_predictions(f, side[0], state);
    render_counting_speed(f, side[1], state);
}

fn render_results_table(f: &mut Frame, area: Rect, state: &DashboardState) {
    let rows: Vec<Row> = state
        .results
        .rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.rank.to_string()),
                Cell::from(row.party_name.clone()),
                Cell::from(format_number(row.votes)),
                Cell::from(format!("{:.2}%", row.percentage)),
                Cell::from(row.mandates.to_string()),
                Cell::from(Span::styled(
                    row.trend.symbol(),
                    Style::default().fg(trend_color(row.trend)),
                )),
            ])
        })
        .collect();

    let header = Row::new(vec!["#", "Party", "Votes", "Share", "Seats", "Trend"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(
                "RESULTS • total {} votes",
                format_number(state.results.total_votes())
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, area);
}

fn render_predictions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(predictions) = &state.predictions else {
        f.render_widget(
            Paragraph::new("No predictions yet").block(block.title("PREDICTIONS")),
            area,
        );
        return;
    };

    let parties = predictions.parties.as_deref().unwrap_or_default();
    // Hundredths of a percent, so bars keep two decimals.
    let bars: Vec<Bar> = parties
        .iter()
        .enumerate()
        .map(|(i, party)| {
            Bar::default()
                .value((party.predicted_percentage.max(0.0) * 100.0).round() as u64)
                .text_value(format!("{:.1}%", party.predicted_percentage))
                .label(Line::from(party.party_name.clone()))
                .style(Style::default().fg(party_color(i)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block.title(format!(
            "PREDICTIONS • at {:.1}% counted",
            predictions.current_counted_percentage
        )))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_counting_speed(f: &mut Frame, area: Rect, state: &DashboardState) {
    let lines = match &state.counting_speed {
        Some(speed) => {
            let eta = estimated_completion(speed, Local::now())
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            vec![
                Line::from(format!("Speed: {:.1} districts/h", speed.districts_per_hour)),
                Line::from(format!("Remaining: {}", remaining_label(speed))),
                Line::from(format!("Estimated finish: {}", eta)),
            ]
        }
        None => vec![Line::from("Counting speed unavailable")],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("COUNTING SPEED")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(panel, area);
}
