//! src/graph/config.rs
//!
//! Sizing of the on-screen rate chart and readout list.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct GraphConfig {
    /// Number of rate points visible in the chart.
    pub data_window: usize,

    /// Number of recent readouts kept for the list panel.
    pub max_history: usize,

    /// Y ceiling (B/s) used before any max value or data is known.
    pub fallback_ceiling: f64,
}

impl GraphConfig {
    pub fn new(data_window: usize, max_history: usize, fallback_ceiling: f64) -> Self {
        Self {
            data_window,
            max_history,
            fallback_ceiling,
        }
    }

    /// Chart spanning `span` at one point per cycle.
    pub fn for_cycle(cycle_interval: Duration, span: Duration) -> Self {
        let per_cycle = cycle_interval.as_millis().max(1);
        let window = (span.as_millis() / per_cycle).clamp(2, 10_000) as usize;
        Self::new(window, 200, 1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_span_at_cycle_rate() {
        let cfg = GraphConfig::for_cycle(Duration::from_millis(500), Duration::from_secs(120));
        assert_eq!(cfg.data_window, 240);
        let tiny = GraphConfig::for_cycle(Duration::from_secs(60), Duration::from_secs(1));
        assert_eq!(tiny.data_window, 2);
    }
}
