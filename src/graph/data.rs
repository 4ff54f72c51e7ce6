//! src/graph/data.rs
//!
//! Sliding window of measured rates, with an owned vector copy that chart
//! widgets can borrow for the duration of a frame.

use std::collections::VecDeque;

use super::config::GraphConfig;

#[derive(Debug)]
pub struct RateSeries {
    /// (seconds since start, Bytes/sec), oldest at front
    pub points: VecDeque<(f64, f64)>,

    /// contiguous copy of `points` for `Dataset::data`
    pub data_vec: Vec<(f64, f64)>,

    pub config: GraphConfig,
}

impl RateSeries {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            points: VecDeque::with_capacity(config.data_window),
            data_vec: Vec::with_capacity(config.data_window),
            config,
        }
    }

    /// Append a point, dropping the oldest once the window is full.
    ///
    /// Invariant: points.len() <= config.data_window.
    pub fn push_point(&mut self, x: f64, y: f64) {
        if self.config.data_window == 0 {
            return;
        }
        while self.points.len() >= self.config.data_window {
            self.points.pop_front();
        }
        self.points.push_back((x, y));

        self.data_vec.clear();
        self.data_vec.extend(self.points.iter().copied());
    }

    /// x bounds of the window; a one-second span when fewer than two points.
    pub fn x_bounds(&self) -> (f64, f64) {
        match (self.points.front(), self.points.back()) {
            (Some(first), Some(last)) if last.0 > first.0 => (first.0, last.0),
            (Some(first), _) => (first.0, first.0 + 1.0),
            _ => (0.0, 1.0),
        }
    }

    /// (min, max, last) over the window, `None` when empty.
    pub fn stats(&self) -> Option<(f64, f64, f64)> {
        let last = self.data_vec.last()?.1;
        let (mn, mx) = self
            .data_vec
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), &(_, y)| {
                (mn.min(y), mx.max(y))
            });
        Some((mn, mx, last))
    }

    /// Upper y bound for autoscaling: data max plus 10% headroom.
    pub fn autoscale_ceiling(&self) -> f64 {
        match self.stats() {
            Some((_, mx, _)) if mx > 0.0 => mx * 1.1,
            _ => self.config.fallback_ceiling,
        }
    }
}
