//! src/panels/paragraph.rs
//!
//! Static text block (controls footer).

use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::graph::MeterView;

pub struct ParagraphPanel {
    pub text: String,
    pub title: String,
}

impl ParagraphPanel {
    pub fn new(text: &str, title: &str) -> Self {
        Self {
            text: text.to_string(),
            title: title.to_string(),
        }
    }
}

impl crate::ui::Panel for ParagraphPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView) {
        let mode = if view.low_precision { "  [low precision]" } else { "" };
        let p = Paragraph::new(format!("{}{}", self.text, mode))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(p, area);
    }
}
