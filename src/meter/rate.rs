//! src/meter/rate.rs
//!
//! Throughput rate from successive byte-counter samples.

use std::time::Instant;

/// One reading of the remote byte counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThroughputSample {
    pub at: Instant,
    pub bytes: u64,
}

impl ThroughputSample {
    pub fn new(at: Instant, bytes: u64) -> Self {
        Self { at, bytes }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateOutcome {
    /// First sample; nothing to compare against yet.
    Warmup,
    /// Bytes/sec over the interval since the previous sample.
    Rate(f64),
    /// Counter went backwards (remote restart); the old sample was dropped.
    Reset,
    /// No time elapsed since the previous sample.
    Stalled,
}

/// Rate between two samples, or `None` when the pair cannot yield one
/// (counter regression or non-increasing time).
pub fn rate_between(previous: &ThroughputSample, current: &ThroughputSample) -> Option<f64> {
    if current.bytes < previous.bytes {
        return None;
    }
    let elapsed = current.at.checked_duration_since(previous.at)?;
    if elapsed.is_zero() {
        return None;
    }
    Some((current.bytes - previous.bytes) as f64 / elapsed.as_secs_f64())
}

/// Keeps only the sample needed for the next computation.
#[derive(Debug, Default)]
pub struct RateCalculator {
    previous: Option<ThroughputSample>,
}

impl RateCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, current: ThroughputSample) -> RateOutcome {
        let Some(previous) = self.previous else {
            self.previous = Some(current);
            return RateOutcome::Warmup;
        };
        if current.bytes < previous.bytes {
            self.previous = Some(current);
            return RateOutcome::Reset;
        }
        match rate_between(&previous, &current) {
            Some(rate) => {
                self.previous = Some(current);
                RateOutcome::Rate(rate)
            }
            None => RateOutcome::Stalled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::time::Duration;

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn first_sample_is_warmup() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        assert_eq!(
            calc.update(ThroughputSample::new(t0, 1000)),
            RateOutcome::Warmup
        );
        // kept as the baseline for the next sample
        assert_eq!(
            calc.update(ThroughputSample::new(at(t0, 500), 1500)),
            RateOutcome::Rate(1000.0)
        );
    }

    #[test]
    fn two_thousand_bytes_per_second() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.update(ThroughputSample::new(t0, 1000));
        assert_eq!(
            calc.update(ThroughputSample::new(at(t0, 1000), 3000)),
            RateOutcome::Rate(2000.0)
        );
    }

    #[test]
    fn counter_regression_is_a_reset() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.update(ThroughputSample::new(t0, 5000));
        assert_eq!(
            calc.update(ThroughputSample::new(at(t0, 1000), 100)),
            RateOutcome::Reset
        );
        // the post-reset sample is the new baseline
        assert_eq!(
            calc.update(ThroughputSample::new(at(t0, 1500), 600)),
            RateOutcome::Rate(1000.0)
        );
    }

    #[test]
    fn same_instant_does_not_divide_by_zero() {
        let mut calc = RateCalculator::new();
        let t0 = Instant::now();
        calc.update(ThroughputSample::new(t0, 10));
        assert_eq!(
            calc.update(ThroughputSample::new(t0, 20)),
            RateOutcome::Stalled
        );
        // predecessor kept
        assert_eq!(
            calc.update(ThroughputSample::new(at(t0, 100), 20)),
            RateOutcome::Rate(100.0)
        );
    }

    #[test]
    fn idle_link_reads_zero() {
        let t0 = Instant::now();
        let prev = ThroughputSample::new(t0, 42);
        let cur = ThroughputSample::new(at(t0, 500), 42);
        assert_eq!(rate_between(&prev, &cur), Some(0.0));
    }

    #[test]
    fn random_valid_pairs_never_go_negative() {
        let mut rng = rand::rng();
        let t0 = Instant::now();
        for _ in 0..1_000 {
            let b0: u64 = rng.random_range(0..u64::MAX / 2);
            let b1 = b0 + rng.random_range(0..10_000_000_000u64);
            let dt: u64 = rng.random_range(1..3_600_000);
            let prev = ThroughputSample::new(t0, b0);
            let cur = ThroughputSample::new(at(t0, dt), b1);
            let rate = rate_between(&prev, &cur).unwrap();
            assert!(rate >= 0.0);
            let expected = (b1 - b0) as f64 / (dt as f64 / 1000.0);
            assert!((rate - expected).abs() <= expected * 1e-9 + 1e-9);
        }
    }

    #[test]
    fn random_regressions_never_emit_a_rate() {
        let mut rng = rand::rng();
        let t0 = Instant::now();
        for _ in 0..1_000 {
            let b0: u64 = rng.random_range(1..u64::MAX);
            let b1 = rng.random_range(0..b0);
            let mut calc = RateCalculator::new();
            calc.update(ThroughputSample::new(t0, b0));
            let outcome = calc.update(ThroughputSample::new(at(t0, 1000), b1));
            assert_eq!(outcome, RateOutcome::Reset);
        }
    }
}
