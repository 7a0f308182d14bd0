//! Monitored resource an alert refers to.

use std::net::{IpAddr, SocketAddr};

/// Address and port of the serviced resource an alert is about.
///
/// When supplied, it is written into the alert subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceContext {
    /// Resource address.
    pub addr: IpAddr,
    /// Resource port.
    pub port: u16,
}

impl ResourceContext {
    /// Creates a resource context.
    #[must_use]
    pub const fn new(addr: IpAddr, port: u16) -> Self {
        Self { addr, port }
    }
}

impl From<SocketAddr> for ResourceContext {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}
