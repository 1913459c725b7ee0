//! # Subnet Enumeration
//!
//! Turns the address/mask pair of an interface into the lazy sequence of
//! candidate addresses that receive an ARP request.
//!
//! The walk advances the address and the mask together and stops the moment
//! the mask reaches all-ones. A /24 therefore yields the 255 addresses
//! `network` through `network + 254`: the network address is included, the
//! last address of the block is not.

use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// An IPv4 (network address, mask) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    pub network: Ipv4Addr,
    pub mask: Ipv4Addr,
}

impl Subnet {
    /// Builds the subnet an address belongs to; host bits are cleared.
    pub fn new(addr: Ipv4Addr, mask: Ipv4Addr) -> Self {
        let network: u32 = u32::from(addr) & u32::from(mask);
        Self {
            network: Ipv4Addr::from(network),
            mask,
        }
    }

    pub fn prefix(&self) -> u8 {
        u32::from(self.mask).leading_ones() as u8
    }

    /// Number of addresses [`Subnet::candidates`] yields.
    pub fn len(&self) -> usize {
        (u32::MAX - u32::from(self.mask)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restartable iterator over every candidate address of the subnet.
    pub fn candidates(&self) -> SubnetIter {
        SubnetIter {
            next_addr: u32::from(self.network),
            mask: u32::from(self.mask),
        }
    }
}

impl From<Ipv4Network> for Subnet {
    fn from(net: Ipv4Network) -> Self {
        Self::new(net.ip(), net.mask())
    }
}

impl IntoIterator for &Subnet {
    type Item = Ipv4Addr;
    type IntoIter = SubnetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates()
    }
}

#[derive(Debug, Clone)]
pub struct SubnetIter {
    next_addr: u32,
    mask: u32,
}

impl Iterator for SubnetIter {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.mask == u32::MAX {
            return None;
        }
        let addr = Ipv4Addr::from(self.next_addr);
        self.mask += 1;
        self.next_addr = self.next_addr.wrapping_add(1);
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (u32::MAX - self.mask) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SubnetIter {}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
