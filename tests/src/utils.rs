use std::collections::VecDeque;
use std::io;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pnet::datalink::{DataLinkReceiver, DataLinkSender, MacAddr, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
use sonar_core::network::channel::EthernetHandle;
use sonar_protocols::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS};

pub const LOCAL_MAC: MacAddr = MacAddr(0x02, 0x00, 0x00, 0x00, 0x00, 0x0a);

pub fn ni(name: &str, index: u32, mac: Option<MacAddr>, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: "".into(),
        index,
        mac,
        ips: ips.to_vec(),
        flags,
    }
}

pub fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
    IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
}

/// An ARP reply as a neighbour would put it on the wire.
pub fn arp_reply(sender_mac: MacAddr, sender_ip: Ipv4Addr) -> Vec<u8> {
    let mut buffer = vec![0u8; MIN_ETH_FRAME_NO_FCS];
    {
        let mut eth = MutableEthernetPacket::new(&mut buffer).unwrap();
        eth.set_source(sender_mac);
        eth.set_destination(LOCAL_MAC);
        eth.set_ethertype(EtherTypes::Arp);
    }
    let mut arp = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN]).unwrap();
    arp.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp.set_protocol_type(EtherTypes::Ipv4);
    arp.set_hw_addr_len(6);
    arp.set_proto_addr_len(4);
    arp.set_operation(ArpOperations::Reply);
    arp.set_sender_hw_addr(sender_mac);
    arp.set_sender_proto_addr(sender_ip);
    arp.set_target_hw_addr(LOCAL_MAC);
    arp.set_target_proto_addr(Ipv4Addr::new(192, 0, 2, 10));
    buffer
}

/// In-memory medium: frames pushed into `inbound` are read by the capture,
/// frames written by the scanner land in `outbound`.
#[derive(Clone, Default)]
pub struct FakeMedium {
    pub inbound: Arc<Mutex<VecDeque<Vec<u8>>>>,
    pub outbound: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FakeMedium {
    pub fn inject(&self, frame: Vec<u8>) {
        self.inbound.lock().unwrap().push_back(frame);
    }

    pub fn sent(&self) -> usize {
        self.outbound.lock().unwrap().len()
    }

    pub fn handle(&self) -> EthernetHandle {
        EthernetHandle {
            tx: Box::new(MediumSender(self.outbound.clone())),
            rx: Box::new(MediumReceiver {
                inbound: self.inbound.clone(),
                current: Vec::new(),
            }),
        }
    }
}

struct MediumSender(Arc<Mutex<Vec<Vec<u8>>>>);

impl DataLinkSender for MediumSender {
    fn build_and_send(
        &mut self,
        _num_packets: usize,
        _packet_size: usize,
        _func: &mut dyn for<'a> FnMut(&'a mut [u8]),
    ) -> Option<io::Result<()>> {
        Some(Ok(()))
    }

    fn send_to(&mut self, packet: &[u8], _dst: Option<NetworkInterface>) -> Option<io::Result<()>> {
        self.0.lock().unwrap().push(packet.to_vec());
        Some(Ok(()))
    }
}

struct MediumReceiver {
    inbound: Arc<Mutex<VecDeque<Vec<u8>>>>,
    current: Vec<u8>,
}

impl DataLinkReceiver for MediumReceiver {
    fn next(&mut self) -> io::Result<&[u8]> {
        let frame = self.inbound.lock().unwrap().pop_front();
        match frame {
            Some(frame) => {
                self.current = frame;
                Ok(&self.current)
            }
            None => {
                thread::sleep(Duration::from_millis(5));
                Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"))
            }
        }
    }
}
