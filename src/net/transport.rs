//! src/net/transport.rs
//!
//! Bounded TCP operations used by the checker and the info client.
//!
//! Every operation takes its own timeout. Connection attempts across the
//! resolved addresses share one deadline, so a target never blocks the caller
//! for longer than the timeout it was given. Name resolution goes through the
//! system resolver and is not bounded.

use std::io::{ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::trace;

use super::Target;
use crate::error::NetError;

/// Upper bound on a value payload; a decimal u64 plus whitespace fits easily.
pub const MAX_PAYLOAD: usize = 64;

/// Seam between the meter and the network.
pub trait Transport {
    /// Establish (and immediately drop) a TCP connection to `target`.
    fn probe(&self, target: &Target, timeout: Duration) -> Result<SocketAddr, NetError>;

    /// Connect to `target` and read what it sends until EOF, a newline or
    /// [`MAX_PAYLOAD`] bytes. Hitting the deadline before any of those is a
    /// timeout, even if some bytes already arrived.
    fn read_value(&self, target: &Target, timeout: Duration) -> Result<Vec<u8>, NetError>;
}

/// Real transport over `std::net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    fn resolve(target: &Target) -> Result<Vec<SocketAddr>, NetError> {
        let addrs: Vec<SocketAddr> = (target.host.as_str(), target.port)
            .to_socket_addrs()
            .map_err(|source| NetError::Resolve {
                host: target.host.clone(),
                source,
            })?
            .filter(|a| target.family.is_none_or(|f| f.matches(a)))
            .collect();
        match (addrs.is_empty(), target.family) {
            (true, Some(family)) => Err(NetError::NoAddress {
                host: target.host.clone(),
                family,
            }),
            (true, None) => Err(NetError::Resolve {
                host: target.host.clone(),
                source: ErrorKind::NotFound.into(),
            }),
            _ => Ok(addrs),
        }
    }

    fn connect(
        target: &Target,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(SocketAddr, TcpStream), NetError> {
        let mut last_err = None;
        for addr in Self::resolve(target)? {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match TcpStream::connect_timeout(&addr, remaining) {
                Ok(stream) => return Ok((addr, stream)),
                Err(e) => {
                    trace!("connect {} failed: {}", addr, e);
                    last_err = Some(NetError::from_io(e, addr, timeout));
                }
            }
        }
        Err(last_err.unwrap_or_else(|| NetError::Timeout {
            addr: target.to_string(),
            timeout,
        }))
    }
}

impl Transport for TcpTransport {
    fn probe(&self, target: &Target, timeout: Duration) -> Result<SocketAddr, NetError> {
        let deadline = Instant::now() + timeout;
        let (addr, stream) = Self::connect(target, deadline, timeout)?;
        let _ = stream.shutdown(Shutdown::Both);
        Ok(addr)
    }

    fn read_value(&self, target: &Target, timeout: Duration) -> Result<Vec<u8>, NetError> {
        let deadline = Instant::now() + timeout;
        let (addr, mut stream) = Self::connect(target, deadline, timeout)?;

        let mut payload = Vec::with_capacity(MAX_PAYLOAD);
        let mut chunk = [0u8; MAX_PAYLOAD];
        loop {
            // set_read_timeout rejects a zero duration
            let remaining = deadline
                .saturating_duration_since(Instant::now())
                .max(Duration::from_millis(1));
            stream
                .set_read_timeout(Some(remaining))
                .map_err(|e| NetError::from_io(e, addr, timeout))?;

            match stream.read(&mut chunk[..MAX_PAYLOAD - payload.len()]) {
                Ok(0) => break,
                Ok(n) => {
                    payload.extend_from_slice(&chunk[..n]);
                    if payload.contains(&b'\n') || payload.len() >= MAX_PAYLOAD {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // a value cut off by the deadline is not a value
                Err(e) => {
                    if !payload.is_empty() {
                        trace!("{}: dropping {} partial bytes", addr, payload.len());
                    }
                    return Err(NetError::from_io(e, addr, timeout));
                }
            }
        }
        let _ = stream.shutdown(Shutdown::Both);
        trace!("read {} bytes from {}", payload.len(), addr);
        Ok(payload)
    }
}
