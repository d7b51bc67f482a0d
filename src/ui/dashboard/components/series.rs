//! Timeline and total-votes panels
//!
//! Both draw a [`ReconciledSeries`]: one line per party (broken at gaps), a
//! volume strip underneath and summary figures on the side.

use super::super::state::DashboardState;
use super::super::utils::{format_number, party_color};
use crate::reconcile::{ReconciledSeries, SeriesKind};
use crate::ui::router::View;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
    Paragraph,
};

/// A contiguous run of present values of one party.
struct Segment {
    rank: usize,
    name: Option<String>,
    points: Vec<(f64, f64)>,
}

fn segments(series: &ReconciledSeries) -> Vec<Segment> {
    let mut out = Vec::new();
    for (rank, party) in series.series.iter().enumerate() {
        let mut named = false;
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (slot, value) in party.values.iter().enumerate() {
            match value {
                Some(v) => current.push((slot as f64, *v)),
                None if !current.is_empty() => {
                    out.push(Segment {
                        rank,
                        name: (!named).then(|| party.label.clone()),
                        points: std::mem::take(&mut current),
                    });
                    named = true;
                }
                None => {}
            }
        }
        if !current.is_empty() {
            out.push(Segment {
                rank,
                name: (!named).then(|| party.label.clone()),
                points: current,
            });
        }
    }
    out
}

fn block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

pub fn render_series_view(f: &mut Frame, area: Rect, state: &DashboardState, view: View) {
    let (series, title) = match view {
        View::TotalVotes => (state.total_votes.as_ref(), "TOTAL VOTES"),
        _ => (state.timeline.as_ref(), "TIMELINE"),
    };
    let range = state
        .router
        .range()
        .map(|r| r.label())
        .unwrap_or_default();
    let title = format!("{} • range {}", title, range);

    let Some(series) = series.filter(|s| !s.is_empty()) else {
        f.render_widget(Paragraph::new("No time-series data yet").block(block(title)), area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(34)])
        .split(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(columns[0]);

    render_lines(f, rows[0], series, title);
    render_volume(f, rows[1], series);
    render_summary(f, columns[1], series);
}

fn render_lines(f: &mut Frame, area: Rect, series: &ReconciledSeries, title: String) {
    let segments = segments(series);
    let datasets: Vec<Dataset> = segments
        .iter()
        .map(|segment| {
            let graph_type = if segment.points.len() == 1 {
                GraphType::Scatter
            } else {
                GraphType::Line
            };
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(party_color(segment.rank)))
                .data(&segment.points);
            match &segment.name {
                Some(name) => dataset.name(name.clone()),
                None => dataset,
            }
        })
        .collect();

    let last_slot = series.len().saturating_sub(1) as f64;
    let x_labels: Vec<Line> = [
        series.labels.first(),
        series.labels.get(series.len() / 2),
        series.labels.last(),
    ]
    .into_iter()
    .flatten()
    .map(|l| Line::from(l.clone()))
    .collect();

    let y_max = segments
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold(0.0_f64, f64::max);
    let (y_top, y_labels) = match series.kind {
        SeriesKind::Percentage => {
            let top = (y_max * 1.1).clamp(1.0, 100.0);
            (
                top,
                vec![
                    Line::from("0%"),
                    Line::from(format!("{:.0}%", top / 2.0)),
                    Line::from(format!("{:.0}%", top)),
                ],
            )
        }
        SeriesKind::TotalVotes => {
            let top = (y_max * 1.1).max(1.0);
            (
                top,
                vec![
                    Line::from("0"),
                    Line::from(format_number((top / 2.0) as u64)),
                    Line::from(format_number(top as u64)),
                ],
            )
        }
    };

    let chart = Chart::new(datasets)
        .block(block(title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, last_slot.max(1.0)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_top])
                .labels(y_labels),
        );
    f.render_widget(chart, area);
}

fn render_volume(f: &mut Frame, area: Rect, series: &ReconciledSeries) {
    // Newest slots that fit one column each
    let visible = area.width.saturating_sub(2) as usize;
    let start = series.volume.len().saturating_sub(visible);
    let bars: Vec<Bar> = series.volume[start..]
        .iter()
        .map(|v| {
            Bar::default()
                .value(*v)
                .text_value(String::new())
                .style(Style::default().fg(Color::Rgb(102, 126, 234)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block("NEW VOTES PER INTERVAL".to_string()))
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_summary(f: &mut Frame, area: Rect, series: &ReconciledSeries) {
    let summary = &series.summary;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled(format!("Total: {}", format_number(summary.current_total)), bold),
        Line::from(format!(
            "Mean new votes: {}",
            format_number(summary.mean_new_votes.round() as u64)
        )),
        Line::from(format!("Peak new votes: {}", format_number(summary.peak_new_votes))),
        Line::from(format!("Points: {}", series.len())),
        Line::from(""),
    ];
    if let Some(leader) = &summary.leading {
        let value = match series.kind {
            SeriesKind::Percentage => format!("{:.2}%", leader.value),
            SeriesKind::TotalVotes => format_number(leader.value as u64),
        };
        lines.push(Line::styled(
            format!("Leading: {} ({})", leader.label, value),
            Style::default().fg(party_color(0)),
        ));
    }
    for (rank, party) in series.series.iter().enumerate().skip(1) {
        lines.push(Line::styled(
            party.label.clone(),
            Style::default().fg(party_color(rank)),
        ));
    }

    f.render_widget(Paragraph::new(lines).block(block("SUMMARY".to_string())), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::timeseries::{PartySeries, SeriesSummary};

    #[test]
    fn test_segments_break_at_gaps() {
        let series = ReconciledSeries {
            kind: SeriesKind::Percentage,
            labels: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            series: vec![PartySeries {
                code: "A".into(),
                label: "Party A".into(),
                values: vec![None, Some(1.0), None, Some(3.0)],
            }],
            volume: vec![0; 4],
            summary: SeriesSummary::default(),
        };
        let segments = segments(&series);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].points, vec![(1.0, 1.0)]);
        assert_eq!(segments[0].name.as_deref(), Some("Party A"));
        assert_eq!(segments[1].points, vec![(3.0, 3.0)]);
        assert!(segments[1].name.is_none());
    }
}
