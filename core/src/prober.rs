//! Liveness probes run against every host that answered the ARP sweep.
//!
//! The two transports are deliberately not equivalent. A TCP probe proves a
//! listener accepted the connection. A UDP probe only proves the datagrams
//! left this machine without an ICMP port-unreachable coming back: UDP
//! mandates no reply, so a UDP "success" says little about the remote host.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use sonar_common::config::Protocol;

mod tcp;
mod udp;

pub use tcp::TcpProber;
pub use udp::UdpProber;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection to {addr} timed out after {after:?}")]
    Timeout { addr: SocketAddr, after: Duration },
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: SocketAddr, source: io::Error },
    #[error("failed to send UDP probe to {addr}: {source}")]
    Send { addr: SocketAddr, source: io::Error },
}

/// Checks whether `port` on a discovered host is worth recording.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr, port: u16) -> Result<(), ProbeError>;
}

pub fn for_protocol(protocol: Protocol) -> Box<dyn Prober> {
    match protocol {
        Protocol::Tcp => Box::new(TcpProber::default()),
        Protocol::Udp => Box::new(UdpProber::default()),
    }
}
