//! Dashboard footer component
//!
//! Renders the key bindings of the active view

use crate::ui::router::View;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

fn view_keys(view: View) -> &'static str {
    match view {
        View::Current => "",
        View::Timeline | View::TotalVotes => " | [+/-] Range",
        View::Comparison => " | [↑/↓] Move [Space] Toggle",
        View::Candidates => " | [P] Party filter",
    }
}

pub fn render_footer(f: &mut Frame, area: Rect, view: View) {
    let footer_text = format!(
        "[Q] Quit | [Tab/1-5] View | [←/→] Region | [R] Refresh | [E/J] Export CSV/JSON{}",
        view_keys(view)
    );

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
