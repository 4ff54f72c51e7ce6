//! src/net/fake.rs
//!
//! Scripted in-memory transport for tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::time::Duration;

use super::{Target, Transport};
use crate::error::NetError;

#[derive(Clone, Debug)]
pub enum Reply {
    Up,
    Refused,
    Timeout,
    Value(&'static str),
}

/// Replies are queued per host and port; the last queued reply repeats once
/// the queue is down to one entry. Unscripted targets refuse.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<HashMap<(String, u16), VecDeque<Reply>>>,
    calls: RefCell<Vec<Target>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(
        &self,
        host: &str,
        port: u16,
        replies: impl IntoIterator<Item = Reply>,
    ) -> &Self {
        self.replies
            .borrow_mut()
            .entry((host.to_string(), port))
            .or_default()
            .extend(replies);
        self
    }

    pub fn calls_to(&self, host: &str) -> usize {
        self.calls.borrow().iter().filter(|t| t.host == host).count()
    }

    pub fn calls_on(&self, port: u16) -> usize {
        self.calls.borrow().iter().filter(|t| t.port == port).count()
    }

    fn next(&self, target: &Target) -> Reply {
        self.calls.borrow_mut().push(target.clone());
        let mut replies = self.replies.borrow_mut();
        match replies.get_mut(&(target.host.clone(), target.port)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Refused),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Refused),
            None => Reply::Refused,
        }
    }

    fn addr(target: &Target) -> SocketAddr {
        match target.family {
            Some(super::Family::V6) => SocketAddr::from(([0u16, 0, 0, 0, 0, 0, 0, 1], target.port)),
            _ => SocketAddr::from(([127, 0, 0, 1], target.port)),
        }
    }

    fn fail(target: &Target, reply: &Reply, timeout: Duration) -> NetError {
        match reply {
            Reply::Timeout => NetError::Timeout {
                addr: target.to_string(),
                timeout,
            },
            _ => NetError::Refused {
                addr: Self::addr(target),
            },
        }
    }
}

impl Transport for FakeTransport {
    fn probe(&self, target: &Target, timeout: Duration) -> Result<SocketAddr, NetError> {
        match self.next(target) {
            Reply::Up | Reply::Value(_) => Ok(Self::addr(target)),
            other => Err(Self::fail(target, &other, timeout)),
        }
    }

    fn read_value(&self, target: &Target, timeout: Duration) -> Result<Vec<u8>, NetError> {
        match self.next(target) {
            Reply::Value(v) => Ok(v.as_bytes().to_vec()),
            Reply::Up => Ok(Vec::new()),
            other => Err(Self::fail(target, &other, timeout)),
        }
    }
}
