//! src/meter/cycle.rs
//!
//! One display cycle: query the info host, update the rate, run the
//! connectivity test when its interval is up, and summarise the result as a
//! [`Readout`].
//!
//! The info host is queried first so samples are stamped at a constant
//! offset from the cycle start. Its two reads share one timeout budget, which
//! keeps the number of bounded waits per cycle at three (info host plus two
//! test hosts).

use std::time::Instant;

use tracing::{debug, info, warn};

use super::rate::{RateCalculator, RateOutcome, ThroughputSample};
use crate::config::MeterConfig;
use crate::net::{ConnectivityChecker, ConnectivityStatus, InfoClient, Transport};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateReading {
    Measured(f64),
    /// Waiting for a second sample.
    Warmup,
    /// The remote counter restarted; a fresh baseline was taken.
    Reset,
    /// The info host could not be read this cycle.
    Unavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaxReading {
    Fresh(u64),
    /// Last known value; the latest fetch did not succeed.
    Stale(u64),
    Missing,
}

impl MaxReading {
    pub fn value(&self) -> Option<u64> {
        match self {
            MaxReading::Fresh(v) | MaxReading::Stale(v) => Some(*v),
            MaxReading::Missing => None,
        }
    }

    fn stale(self) -> Self {
        match self {
            MaxReading::Fresh(v) => MaxReading::Stale(v),
            other => other,
        }
    }
}

/// Everything a display needs for one refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct Readout {
    pub cycle: u64,
    pub at: Instant,
    pub connectivity: ConnectivityStatus,
    pub rate: RateReading,
    pub max: MaxReading,
    pub info_error: Option<String>,
}

impl Readout {
    /// Rate as a fraction of the max value, when both are known.
    pub fn utilisation(&self) -> Option<f64> {
        let RateReading::Measured(rate) = self.rate else {
            return None;
        };
        match self.max.value() {
            Some(max) if max > 0 => Some((rate / max as f64).clamp(0.0, 1.0)),
            _ => None,
        }
    }
}

pub struct Meter {
    info: InfoClient,
    checker: ConnectivityChecker,
    rate: RateCalculator,
    max: MaxReading,
    cycles: u64,
    info_failing: bool,
}

impl Meter {
    pub fn new(info: InfoClient, checker: ConnectivityChecker) -> Self {
        Self {
            info,
            checker,
            rate: RateCalculator::new(),
            max: MaxReading::Missing,
            cycles: 0,
            info_failing: false,
        }
    }

    pub fn from_config(cfg: &MeterConfig) -> Self {
        Self::new(
            InfoClient::from_config(cfg),
            ConnectivityChecker::from_config(cfg),
        )
    }

    pub fn cycle(&mut self, now: Instant, transport: &dyn Transport) -> Readout {
        self.cycles += 1;
        let mut info_error = None;

        let readings = self.info.fetch_readings(transport);
        let rate = match readings.counter {
            Ok(bytes) => {
                if self.info_failing {
                    self.info_failing = false;
                    info!("info host {} answering again", self.info.curval_target());
                }
                match self.rate.update(ThroughputSample::new(now, bytes)) {
                    RateOutcome::Rate(r) => RateReading::Measured(r),
                    RateOutcome::Warmup | RateOutcome::Stalled => RateReading::Warmup,
                    RateOutcome::Reset => {
                        warn!("byte counter went backwards to {}, rebasing", bytes);
                        RateReading::Reset
                    }
                }
            }
            Err(e) => {
                if !self.info_failing {
                    self.info_failing = true;
                    warn!("info host unavailable: {}", e);
                } else {
                    debug!("info host still unavailable: {}", e);
                }
                info_error = Some(e.to_string());
                RateReading::Unavailable
            }
        };

        self.max = match readings.max {
            Some(Ok(max)) => MaxReading::Fresh(max),
            Some(Err(e)) => {
                debug!("max value unavailable: {}", e);
                info_error.get_or_insert_with(|| e.to_string());
                self.max.stale()
            }
            None => self.max.stale(),
        };

        self.checker.poll(now, transport);

        let readout = Readout {
            cycle: self.cycles,
            at: now,
            connectivity: self.checker.status().clone(),
            rate,
            max: self.max,
            info_error,
        };
        debug!(
            "cycle {}: rate={:?} max={:?} online={}",
            readout.cycle,
            readout.rate,
            readout.max,
            readout.connectivity.is_online()
        );
        readout
    }
}
