//! A **local area network (LAN)** transceiver.
//!
//! Broadcasts one ARP request per candidate address of the interface's subnet
//! and hands the capture stream to the [`listener`](super::listener).
//!
//! This requires **root privileges** (or `CAP_NET_RAW`) to construct and
//! intercept raw Layer 2 frames.

use anyhow::{Context, bail};
use pnet::datalink::{DataLinkReceiver, DataLinkSender};
use tracing::debug;

use sonar_common::network::interface::LocalLink;
use sonar_protocols::arp;

use crate::network::channel::{self, EthernetHandle};

use super::Transceiver;
use super::listener::{self, ReplyStream};

pub struct LocalScanner {
    link: LocalLink,
    tx: Box<dyn DataLinkSender>,
    rx: Option<Box<dyn DataLinkReceiver>>,
}

impl LocalScanner {
    /// Opens the capture handle on the link's interface.
    pub fn new(link: LocalLink) -> anyhow::Result<Self> {
        let eth_handle: EthernetHandle = channel::start_capture(&link.interface)?;
        Ok(Self::with_handle(link, eth_handle))
    }

    pub fn with_handle(link: LocalLink, eth_handle: EthernetHandle) -> Self {
        Self {
            link,
            tx: eth_handle.tx,
            rx: Some(eth_handle.rx),
        }
    }
}

impl Transceiver for LocalScanner {
    fn start_listening(&mut self) -> anyhow::Result<ReplyStream> {
        let rx = self
            .rx
            .take()
            .context("reply listener has already been started")?;
        let capacity: usize = listener::reply_queue_capacity(self.link.subnet.len());
        Ok(listener::spawn(rx, self.link.mac, capacity))
    }

    fn send_discovery_packets(&mut self) -> anyhow::Result<usize> {
        let mut sent: usize = 0;
        for target in self.link.subnet.candidates() {
            let packet: Vec<u8> = arp::create_request(self.link.mac, self.link.addr, target)?;
            match self.tx.send_to(&packet, None) {
                Some(Ok(())) => sent += 1,
                Some(Err(e)) => {
                    return Err(e).with_context(|| format!("sending ARP request for {target}"));
                }
                None => bail!("capture handle rejected the ARP request for {target}"),
            }
        }
        debug!("sent {sent} ARP requests on {}", self.link.interface.name);
        Ok(sent)
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
