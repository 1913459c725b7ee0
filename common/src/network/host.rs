use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// A host that answered an ARP request.
///
/// Nothing deduplicates these: a host replying twice is reported twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscoveredHost {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
}

impl DiscoveredHost {
    pub fn new(ip: Ipv4Addr, mac: MacAddr) -> Self {
        Self { ip, mac }
    }
}

impl fmt::Display for DiscoveredHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.mac)
    }
}

/// What an output sink receives for every host whose probe succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub mac: MacAddr,
}

impl HostRecord {
    pub fn alive(host: DiscoveredHost, port: u16) -> Self {
        Self {
            ip: host.ip,
            port,
            mac: host.mac,
        }
    }

    /// The `<ip>:<port>, <mac>` line written by the file sink.
    pub fn to_line(&self) -> String {
        format!("{}:{}, {}", self.ip, self.port, self.mac)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
