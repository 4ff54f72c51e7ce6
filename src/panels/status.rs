//! src/panels/status.rs
//!
//! Status panel: reachability per address family, current rate, max value
//! and a utilisation gauge.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::graph::MeterView;
use crate::meter::RateReading;
use crate::meter::format::{human_rate, max_text, rate_text, reachability_label};
use crate::net::{Family, FamilyStatus, Reachability};

pub struct StatusPanel;

fn family_line(family: Family, status: &FamilyStatus) -> Line<'static> {
    let color = match status.reachability {
        Reachability::Unknown => Color::DarkGray,
        Reachability::Reachable => Color::Green,
        Reachability::Unreachable => Color::Red,
    };
    let age = status
        .checked_at
        .map(|t| format!("  checked {}s ago", t.elapsed().as_secs()))
        .unwrap_or_default();
    Line::from(vec![
        Span::styled(format!("IP{:<4}", family), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{:<5}", reachability_label(status.reachability)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(age),
    ])
}

impl crate::ui::Panel for StatusPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let block = Block::default().title("Status").borders(Borders::ALL);
        let Some(r) = view.latest.as_ref() else {
            f.render_widget(Paragraph::new("waiting for first cycle").block(block), area);
            return;
        };

        let lp = view.low_precision;
        let scaled = match r.rate {
            RateReading::Measured(rate) => format!("  ({})", human_rate(rate, lp)),
            _ => String::new(),
        };
        let mut lines = vec![
            family_line(Family::V4, &r.connectivity.v4),
            family_line(Family::V6, &r.connectivity.v6),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Rate  ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} B/s", rate_text(&r.rate, lp)),
                    Style::default().fg(view.color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(scaled),
            ]),
            Line::from(vec![
                Span::styled("Max   ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{} B/s", max_text(&r.max, lp))),
            ]),
        ];
        if let Some(err) = &r.info_error {
            lines.push(Line::styled(
                format!("info: {err}"),
                Style::default().fg(Color::Red),
            ));
        }
        f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

        let (ratio, label) = match r.utilisation() {
            Some(u) => (u, format!("{:.0}%", u * 100.0)),
            None => (0.0, "n/a".to_string()),
        };
        let gauge = Gauge::default()
            .block(Block::default().title("Utilisation").borders(Borders::ALL))
            .gauge_style(Style::default().fg(view.color))
            .ratio(ratio)
            .label(label);
        f.render_widget(gauge, chunks[1]);
    }
}
