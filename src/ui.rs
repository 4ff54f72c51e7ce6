//! src/ui.rs
//!
//! Top-level UI module: layout nodes and the meter screen built from them.

pub mod node;

pub use node::{Node, Panel, group, leaf};

use ratatui::layout::{Constraint, Direction};

use crate::panels::{GraphPanel, HistoryPanel, ParagraphPanel, StatusPanel, TitlePanel};

pub const CONTROLS: &str = "P=Low precision  A=Autoscale chart  Q=Quit";

/// The meter screen: title, status beside the rate chart, recent readouts,
/// controls footer.
pub fn meter_layout() -> Node {
    group(
        Direction::Vertical,
        vec![
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(3),
        ],
        vec![
            leaf(TitlePanel::new("ThroughputMeter")),
            group(
                Direction::Horizontal,
                vec![Constraint::Percentage(35), Constraint::Percentage(65)],
                vec![leaf(StatusPanel), leaf(GraphPanel)],
            ),
            leaf(HistoryPanel),
            leaf(ParagraphPanel::new(CONTROLS, "Controls")),
        ],
    )
}
