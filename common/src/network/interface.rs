//! # Interface Snapshot
//!
//! Looks up the scanning interface by name and validates that it can carry
//! an ARP sweep. The result is a [`LocalLink`], a read-only snapshot taken
//! once per run.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use pnet::util::MacAddr;
use thiserror::Error;

use crate::network::range::Subnet;

/// Smallest accepted prefix: the first two mask bytes must be `0xff`.
pub const MIN_PREFIX: u8 = 16;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InterfaceError {
    #[error("interface {0} not found")]
    NotFound(String),
    /// The interface exists but has not been assigned an address yet.
    #[error("no IPv4 network found on {0}")]
    NoIpv4Address(String),
    #[error("{0} is a loopback address, skipping localhost")]
    Loopback(Ipv4Addr),
    #[error("mask {mask} (/{prefix}) means the network is too large")]
    SubnetTooLarge { mask: Ipv4Addr, prefix: u8 },
    #[error("interface {0} has no hardware address")]
    NoMacAddress(String),
}

impl InterfaceError {
    /// Only a missing address may resolve itself (DHCP still running).
    pub fn is_retryable(&self) -> bool {
        matches!(self, InterfaceError::NoIpv4Address(_))
    }
}

/// Everything the scan needs to know about the local side of the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLink {
    pub interface: NetworkInterface,
    pub mac: MacAddr,
    pub addr: Ipv4Addr,
    pub subnet: Subnet,
}

impl LocalLink {
    pub fn from_interface(interface: &NetworkInterface) -> Result<Self, InterfaceError> {
        let net: Ipv4Network = first_ipv4_net(interface)
            .ok_or_else(|| InterfaceError::NoIpv4Address(interface.name.clone()))?;
        let addr: Ipv4Addr = net.ip();

        if addr.is_loopback() {
            return Err(InterfaceError::Loopback(addr));
        }

        let mask: Ipv4Addr = net.mask();
        let octets: [u8; 4] = mask.octets();
        if octets[0] != 0xff || octets[1] != 0xff {
            return Err(InterfaceError::SubnetTooLarge {
                mask,
                prefix: net.prefix(),
            });
        }

        let mac: MacAddr = interface
            .mac
            .ok_or_else(|| InterfaceError::NoMacAddress(interface.name.clone()))?;

        Ok(Self {
            interface: interface.clone(),
            mac,
            addr,
            subnet: Subnet::from(net),
        })
    }
}

/// Finds `name` among the system interfaces and validates it.
pub fn lookup(name: &str) -> Result<LocalLink, InterfaceError> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    let interface: NetworkInterface = find_by_name(name, &interfaces)?;
    LocalLink::from_interface(&interface)
}

pub fn find_by_name(
    name: &str,
    interfaces: &[NetworkInterface],
) -> Result<NetworkInterface, InterfaceError> {
    interfaces
        .iter()
        .find(|interface| interface.name == name)
        .cloned()
        .ok_or_else(|| InterfaceError::NotFound(name.to_string()))
}

fn first_ipv4_net(interface: &NetworkInterface) -> Option<Ipv4Network> {
    interface.ips.iter().find_map(|&ip| match ip {
        IpNetwork::V4(net) => Some(net),
        _ => None,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
