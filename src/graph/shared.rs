//! src/graph/shared.rs
//!
//! State shared between the meter thread (writer) and the UI (reader).

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use ratatui::style::Color;

use super::config::GraphConfig;
use super::data::RateSeries;
use crate::meter::{RateReading, Readout};

pub struct MeterView {
    pub latest: Option<Readout>,
    pub series: RateSeries,
    /// Most recent readouts, newest at back.
    pub recent: VecDeque<Readout>,
    pub started: Instant,
    pub info_host: String,
    pub color: Color,
    /// Render numbers with only the leading digit.
    pub low_precision: bool,
    /// Scale the chart to the data instead of the max value.
    pub autoscale: bool,
}

impl MeterView {
    pub fn new(cfg: GraphConfig, info_host: &str, low_precision: bool) -> Self {
        Self {
            latest: None,
            recent: VecDeque::with_capacity(cfg.max_history),
            series: RateSeries::new(cfg),
            started: Instant::now(),
            info_host: info_host.to_string(),
            color: Color::Cyan,
            low_precision,
            autoscale: false,
        }
    }

    /// Take in one cycle's readout.
    pub fn record(&mut self, readout: &Readout) {
        if let RateReading::Measured(rate) = readout.rate {
            let x = readout
                .at
                .saturating_duration_since(self.started)
                .as_secs_f64();
            self.series.push_point(x, rate);
        }
        while self.recent.len() >= self.series.config.max_history.max(1) {
            self.recent.pop_front();
        }
        self.recent.push_back(readout.clone());
        self.latest = Some(readout.clone());
    }

    /// Y ceiling for the chart: the info host's max value unless autoscaling.
    pub fn ceiling(&self) -> f64 {
        let max = self
            .latest
            .as_ref()
            .and_then(|r| r.max.value())
            .filter(|&m| m > 0);
        match (self.autoscale, max) {
            (false, Some(max)) => max as f64,
            _ => self.series.autoscale_ceiling(),
        }
    }
}

/// Alias: Arc<RwLock<MeterView>>
pub type SharedView = Arc<RwLock<MeterView>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::MaxReading;
    use crate::net::ConnectivityStatus;
    use std::time::Duration;

    fn readout(view: &MeterView, cycle: u64, rate: RateReading, max: MaxReading) -> Readout {
        Readout {
            cycle,
            at: view.started + Duration::from_millis(cycle * 500),
            connectivity: ConnectivityStatus::default(),
            rate,
            max,
            info_error: None,
        }
    }

    #[test]
    fn only_measured_rates_reach_the_chart() {
        let mut view = MeterView::new(GraphConfig::new(10, 3, 100.0), "info", false);
        for (i, rate) in [
            RateReading::Warmup,
            RateReading::Measured(2000.0),
            RateReading::Unavailable,
            RateReading::Reset,
        ]
        .into_iter()
        .enumerate()
        {
            let r = readout(&view, i as u64 + 1, rate, MaxReading::Missing);
            view.record(&r);
        }
        assert_eq!(view.series.data_vec, vec![(1.0, 2000.0)]);
        assert_eq!(view.recent.len(), 3);
        assert_eq!(view.recent.back().map(|r| r.cycle), Some(4));
        assert_eq!(view.latest.as_ref().map(|r| r.rate), Some(RateReading::Reset));
    }

    #[test]
    fn ceiling_follows_max_value_unless_autoscaled() {
        let mut view = MeterView::new(GraphConfig::new(240, 200, 1_000.0), "info", false);
        let r = readout(&view, 1, RateReading::Measured(500.0), MaxReading::Stale(8000));
        view.record(&r);
        assert_eq!(view.ceiling(), 8000.0);
        view.autoscale = true;
        assert!((view.ceiling() - 550.0).abs() < 1e-9);
    }
}
