//! src/error.rs
//!
//! Error types for the network, configuration and display layers.
//!
//! None of the network errors are fatal: a cycle that hits one degrades its
//! readout and the next cycle tries again.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::net::Family;

/// Failure of a single bounded TCP operation.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("{addr}: timed out after {}ms", .timeout.as_millis())]
    Timeout { addr: String, timeout: Duration },

    #[error("{addr}: connection refused")]
    Refused { addr: SocketAddr },

    #[error("{addr}: unreachable ({reason})")]
    Unreachable { addr: String, reason: String },

    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("{host} has no {family} address")]
    NoAddress { host: String, family: Family },

    #[error("empty payload")]
    EmptyPayload,

    #[error("malformed value {payload:?}")]
    Malformed { payload: String },
}

impl NetError {
    /// Map an IO error from a connect or read on `addr` into the taxonomy.
    pub fn from_io(err: io::Error, addr: SocketAddr, timeout: Duration) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => NetError::Timeout {
                addr: addr.to_string(),
                timeout,
            },
            io::ErrorKind::ConnectionRefused => NetError::Refused { addr },
            _ => NetError::Unreachable {
                addr: addr.to_string(),
                reason: err.to_string(),
            },
        }
    }

    /// True when the remote end did not answer at all, as opposed to
    /// answering with something unusable.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            NetError::Timeout { .. }
                | NetError::Refused { .. }
                | NetError::Unreachable { .. }
                | NetError::Resolve { .. }
                | NetError::NoAddress { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display write failed: {0}")]
    Io(#[from] io::Error),

    #[error("serial display: {0}")]
    Serial(#[from] serialport::Error),

    #[error("shared view lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:80".parse().unwrap()
    }

    #[test]
    fn io_kinds_are_classified() {
        let t = Duration::from_millis(200);
        let e = NetError::from_io(io::ErrorKind::TimedOut.into(), addr(), t);
        assert!(matches!(e, NetError::Timeout { .. }));
        let e = NetError::from_io(io::ErrorKind::ConnectionRefused.into(), addr(), t);
        assert!(matches!(e, NetError::Refused { .. }));
        let e = NetError::from_io(io::ErrorKind::NetworkUnreachable.into(), addr(), t);
        assert!(matches!(e, NetError::Unreachable { .. }));
    }

    #[test]
    fn payload_errors_are_not_connect_failures() {
        assert!(!NetError::EmptyPayload.is_connect_failure());
        assert!(
            !NetError::Malformed {
                payload: "abc".into()
            }
            .is_connect_failure()
        );
        assert!(NetError::Refused { addr: addr() }.is_connect_failure());
    }

    #[test]
    fn timeout_message_names_the_bound() {
        let e = NetError::Timeout {
            addr: "[2001:db8::1]:17461".into(),
            timeout: Duration::from_millis(200),
        };
        assert_eq!(e.to_string(), "[2001:db8::1]:17461: timed out after 200ms");
    }
}
