//! src/panels.rs
//!
//! Top-level panels module and re-exports.

pub mod graph;
pub mod history;
pub mod paragraph;
pub mod status;
pub mod title;

pub use graph::GraphPanel;
pub use history::HistoryPanel;
pub use paragraph::ParagraphPanel;
pub use status::StatusPanel;
pub use title::TitlePanel;
