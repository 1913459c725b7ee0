//! Link-layer frames used by the ARP sweep.

pub mod arp;
pub mod ethernet;

use thiserror::Error;

pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
/// Shortest Ethernet frame on the wire, frame check sequence excluded.
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("buffer too small for an Ethernet header")]
    EthernetBuffer,
    #[error("buffer too small for an ARP payload")]
    ArpBuffer,
    #[error("truncated frame ({0} bytes)")]
    Truncated(usize),
}
