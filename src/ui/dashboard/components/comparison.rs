//! Comparison view: region checkboxes and grouped share bars

use super::super::state::DashboardState;
use super::super::utils::party_color;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, BorderType, Borders, List, ListItem, ListState, Paragraph,
};

fn block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

pub fn render_comparison_view(f: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Fill(1)])
        .split(area);

    render_checkboxes(f, columns[0], state);
    render_chart(f, columns[1], state);
}

fn render_checkboxes(f: &mut Frame, area: Rect, state: &DashboardState) {
    let selection = state.router.comparison_selection();
    let items: Vec<ListItem> = state
        .comparison_choices()
        .into_iter()
        .map(|choice| {
            let mark = if selection.contains(&choice.code) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(format!("{} {}", mark, choice.name))
        })
        .collect();

    let list = List::new(items)
        .block(block("REGIONS"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.comparison_cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_chart(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chart_data = &state.comparison;
    if chart_data.is_empty() {
        f.render_widget(
            Paragraph::new("Select at least one region").block(block("COMPARISON")),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(3)])
        .split(area);

    // Hundredths of a percent, so bars keep two decimals.
    let groups: Vec<(String, Vec<Bar>)> = chart_data
        .regions
        .iter()
        .map(|region| {
            let bars = region
                .values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    Bar::default()
                        .value((value * 100.0).round() as u64)
                        .text_value(format!("{:.0}", value))
                        .style(Style::default().fg(party_color(i)))
                })
                .collect();
            (region.region_name.clone(), bars)
        })
        .collect();

    let mut chart = BarChart::default()
        .block(block("COMPARISON • share by region"))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(3)
        .max((chart_data.max_value() * 100.0).ceil() as u64);
    for (name, bars) in &groups {
        chart = chart.data(BarGroup::default().label(Line::from(name.clone())).bars(bars));
    }
    f.render_widget(chart, rows[0]);

    let legend: Vec<Span> = chart_data
        .parties
        .iter()
        .enumerate()
        .flat_map(|(i, party)| {
            [
                Span::styled("■ ", Style::default().fg(party_color(i))),
                Span::raw(format!("{}  ", party)),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(legend)), rows[1]);
}
