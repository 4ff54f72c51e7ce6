//! src/net/info.rs
//!
//! Client for the throughput info host.
//!
//! The host serves two ports. On connect each writes one ASCII decimal value
//! and closes (or ends the line): the max-value port the link ceiling in
//! Bytes/sec, the current-value port the absolute byte counter. Nothing is
//! sent to the host.
//!
//! Both reads of a cycle share one `connect_timeout` budget: the max-value
//! read only gets what the counter read left over.

use std::time::{Duration, Instant};

use tracing::trace;

use super::{Target, Transport};
use crate::config::MeterConfig;
use crate::error::NetError;

/// Parse the first line of a value payload as an unsigned decimal.
pub fn parse_value(payload: &[u8]) -> Result<u64, NetError> {
    let text = String::from_utf8_lossy(payload);
    let line = text.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Err(NetError::EmptyPayload);
    }
    line.parse::<u64>().map_err(|_| NetError::Malformed {
        payload: line.to_string(),
    })
}

/// What one cycle got from the info host.
#[derive(Debug)]
pub struct InfoReadings {
    pub counter: Result<u64, NetError>,
    /// `None` when the max value was not asked for.
    pub max: Option<Result<u64, NetError>>,
}

pub struct InfoClient {
    curval: Target,
    maxval: Target,
    timeout: Duration,
}

impl InfoClient {
    pub fn new(curval: Target, maxval: Target, timeout: Duration) -> Self {
        Self {
            curval,
            maxval,
            timeout,
        }
    }

    pub fn from_config(cfg: &MeterConfig) -> Self {
        Self::new(
            cfg.info_curval.clone(),
            cfg.info_maxval.clone(),
            cfg.connect_timeout,
        )
    }

    pub fn curval_target(&self) -> &Target {
        &self.curval
    }

    /// Current value of the byte counter.
    pub fn fetch_counter(&self, transport: &dyn Transport) -> Result<u64, NetError> {
        self.fetch(&self.curval, self.timeout, transport)
    }

    /// Counter, then max value within the same timeout budget.
    ///
    /// The max value is skipped when the host did not answer the counter read
    /// at all, or when that read used up the whole budget.
    pub fn fetch_readings(&self, transport: &dyn Transport) -> InfoReadings {
        let started = Instant::now();
        let counter = self.fetch_counter(transport);
        if counter.as_ref().is_err_and(NetError::is_connect_failure) {
            return InfoReadings { counter, max: None };
        }
        let remaining = self.timeout.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            trace!("no budget left for {}", self.maxval);
            return InfoReadings { counter, max: None };
        }
        let max = self.fetch(&self.maxval, remaining, transport);
        InfoReadings {
            counter,
            max: Some(max),
        }
    }

    fn fetch(
        &self,
        target: &Target,
        timeout: Duration,
        transport: &dyn Transport,
    ) -> Result<u64, NetError> {
        let payload = transport.read_value(target, timeout)?;
        let value = parse_value(&payload)?;
        trace!("{} -> {}", target, value);
        Ok(value)
    }
}
