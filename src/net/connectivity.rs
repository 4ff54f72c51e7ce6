//! src/net/connectivity.rs
//!
//! Internet reachability per address family, tested by a bare TCP connect to
//! one well-known host per family on its own (coarse) interval.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{Family, Target, Transport};
use crate::config::MeterConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reachability {
    Unknown,
    Reachable,
    Unreachable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyStatus {
    pub reachability: Reachability,
    pub checked_at: Option<Instant>,
    pub last_error: Option<String>,
}

impl FamilyStatus {
    pub fn unknown() -> Self {
        Self {
            reachability: Reachability::Unknown,
            checked_at: None,
            last_error: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.reachability == Reachability::Reachable
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityStatus {
    pub v4: FamilyStatus,
    pub v6: FamilyStatus,
}

impl ConnectivityStatus {
    pub fn get(&self, family: Family) -> &FamilyStatus {
        match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        }
    }

    fn get_mut(&mut self, family: Family) -> &mut FamilyStatus {
        match family {
            Family::V4 => &mut self.v4,
            Family::V6 => &mut self.v6,
        }
    }

    /// Online as soon as either family gets out.
    pub fn is_online(&self) -> bool {
        self.v4.is_reachable() || self.v6.is_reachable()
    }
}

impl Default for ConnectivityStatus {
    fn default() -> Self {
        Self {
            v4: FamilyStatus::unknown(),
            v6: FamilyStatus::unknown(),
        }
    }
}

pub struct ConnectivityChecker {
    v4: Target,
    v6: Target,
    interval: Duration,
    timeout: Duration,
    last_run: Option<Instant>,
    status: ConnectivityStatus,
}

impl ConnectivityChecker {
    pub fn new(v4: Target, v6: Target, interval: Duration, timeout: Duration) -> Self {
        Self {
            v4: v4.with_family(Family::V4),
            v6: v6.with_family(Family::V6),
            interval,
            timeout,
            last_run: None,
            status: ConnectivityStatus::default(),
        }
    }

    pub fn from_config(cfg: &MeterConfig) -> Self {
        Self::new(
            cfg.connection_test_v4.clone(),
            cfg.connection_test_v6.clone(),
            cfg.connection_test_interval,
            cfg.connect_timeout,
        )
    }

    pub fn status(&self) -> &ConnectivityStatus {
        &self.status
    }

    /// True before the first test and once a full interval has passed since
    /// the previous test started.
    pub fn due(&self, now: Instant) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Test both families if due. Returns whether a test ran.
    pub fn poll(&mut self, now: Instant, transport: &dyn Transport) -> bool {
        if !self.due(now) {
            return false;
        }
        self.last_run = Some(now);
        for family in [Family::V4, Family::V6] {
            self.check(family, now, transport);
        }
        true
    }

    fn check(&mut self, family: Family, now: Instant, transport: &dyn Transport) {
        let target = match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        };
        let result = transport.probe(target, self.timeout);
        let previous = self.status.get(family).reachability;
        let entry = self.status.get_mut(family);
        entry.checked_at = Some(now);

        match result {
            Ok(addr) => {
                entry.reachability = Reachability::Reachable;
                entry.last_error = None;
                if previous != Reachability::Reachable {
                    info!("internet {} reachable via {}", family, addr);
                } else {
                    debug!("internet {} still reachable via {}", family, addr);
                }
            }
            Err(e) => {
                entry.reachability = Reachability::Unreachable;
                entry.last_error = Some(e.to_string());
                if previous != Reachability::Unreachable {
                    warn!("internet {} unreachable: {}", family, e);
                } else {
                    debug!("internet {} still unreachable: {}", family, e);
                }
            }
        }
    }
}
