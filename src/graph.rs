//! src/graph.rs
//!
//! Display-side state: chart sizing, the rolling rate series and the view
//! shared with the meter thread.

pub mod config;
pub mod data;
pub mod shared;

/// Re-exports
pub use config::GraphConfig;
pub use shared::{MeterView, SharedView};
