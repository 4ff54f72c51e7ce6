//! src/net.rs
//!
//! Network side of the meter: bounded TCP transport, the connectivity
//! checker and the info-host client.

pub mod connectivity;
#[cfg(test)]
pub mod fake;
pub mod info;
pub mod transport;

use std::fmt;
use std::net::SocketAddr;

pub use connectivity::{ConnectivityChecker, ConnectivityStatus, FamilyStatus, Reachability};
pub use info::InfoClient;
pub use transport::{TcpTransport, Transport};

/// IP address family a target must be reached over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn matches(self, addr: &SocketAddr) -> bool {
        match self {
            Family::V4 => addr.is_ipv4(),
            Family::V6 => addr.is_ipv6(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.pad("v4"),
            Family::V6 => f.pad("v6"),
        }
    }
}

/// A host/port pair, optionally pinned to one address family.
///
/// `host` may be a hostname or an IP literal (IPv6 literals without brackets).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub family: Option<Family>,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            family: None,
        }
    }

    pub fn with_family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display_brackets_v6_literals() {
        assert_eq!(Target::new("2001:db8::1", 17461).to_string(), "[2001:db8::1]:17461");
        assert_eq!(Target::new("1.0.0.1", 80).to_string(), "1.0.0.1:80");
    }

    #[test]
    fn family_filters_addresses() {
        let v4: SocketAddr = "1.0.0.1:80".parse().unwrap();
        let v6: SocketAddr = "[2606:4700:4700::1001]:80".parse().unwrap();
        assert!(Family::V4.matches(&v4));
        assert!(!Family::V4.matches(&v6));
        assert!(Family::V6.matches(&v6));
    }
}
