//! src/panels/title.rs
//!
//! Header: program name, info host and uptime.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::graph::MeterView;

pub struct TitlePanel {
    pub title: String,
}

impl TitlePanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

impl crate::ui::Panel for TitlePanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView) {
        let uptime = view.started.elapsed().as_secs();
        let cycles = view.latest.as_ref().map_or(0, |r| r.cycle);
        let line = Line::from(vec![
            Span::styled(&self.title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "  info host {}  up {}:{:02}:{:02}  cycle {}",
                view.info_host,
                uptime / 3600,
                uptime / 60 % 60,
                uptime % 60,
                cycles
            )),
        ]);
        f.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}
