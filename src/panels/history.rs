//! src/panels/history.rs
//!
//! Recent readouts, newest last, newest highlighted.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::graph::MeterView;
use crate::meter::format::render_lines;

pub struct HistoryPanel;

impl crate::ui::Panel for HistoryPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView) {
        // borders take two rows
        let height = area.height.saturating_sub(2) as usize;
        let start = view.recent.len().saturating_sub(height);
        let last_index = view.recent.len().saturating_sub(1);

        let lines: Vec<Line> = view
            .recent
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, r)| {
                let style = if i == last_index {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                let secs = r.at.saturating_duration_since(view.started).as_secs_f64();
                let mut spans = vec![
                    Span::styled(format!("#{:<6}", r.cycle), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{secs:>8.1}s  "), Style::default().fg(Color::Green)),
                    Span::styled(render_lines(r, view.low_precision).join("  "), style),
                ];
                if let Some(err) = &r.info_error {
                    spans.push(Span::styled(
                        format!("  ({err})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        let block = Block::default().title("Readouts").borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
