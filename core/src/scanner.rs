//! The ARP discovery cycle.
//!
//! A [`Transceiver`] owns the capture handle of one interface: it starts the
//! reply listener and broadcasts the requests. [`perform_discovery`] drives
//! the cycle on top of it:
//!
//! 1. start the listener, then broadcast one request per candidate address;
//! 2. keep listening for the collection window, then cancel the listener;
//! 3. drain the queued replies, probing each host and recording the live ones,
//!    until the queue has stayed empty for `max_idle_polls` consecutive polls.
//!
//! Replies arriving after the listener is cancelled are lost.

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use sonar_common::config::DiscoveryConfig;
use sonar_common::network::host::{DiscoveredHost, HostRecord};

use crate::prober::Prober;
use crate::sink::HostSink;

pub mod listener;
pub mod local;

pub use listener::{ListenerHandle, ReplyStream};
pub use local::LocalScanner;

pub trait Transceiver {
    /// Spawns the reply listener.
    ///
    /// Must be called before [`Transceiver::send_discovery_packets`] so that
    /// early replies are not missed.
    fn start_listening(&mut self) -> anyhow::Result<ReplyStream>;

    /// Broadcasts one ARP request per candidate address and returns how many
    /// went out.
    fn send_discovery_packets(&mut self) -> anyhow::Result<usize>;
}

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub requests_sent: usize,
    /// Replies taken off the queue, duplicates included.
    pub replies: usize,
    pub alive: usize,
    pub recorded: usize,
    /// Replies the listener dropped because the queue was full.
    pub overflowed: usize,
}

pub async fn perform_discovery<T>(
    transceiver: &mut T,
    cfg: &DiscoveryConfig,
    port: u16,
    prober: &dyn Prober,
    sink: &mut dyn HostSink,
) -> anyhow::Result<ScanSummary>
where
    T: Transceiver + ?Sized,
{
    let ReplyStream {
        hosts: mut queue,
        listener,
    } = transceiver.start_listening()?;

    let mut summary = ScanSummary {
        requests_sent: transceiver.send_discovery_packets()?,
        ..ScanSummary::default()
    };
    info!("sent {} ARP requests", summary.requests_sent);

    tokio::time::sleep(cfg.collection_window).await;
    summary.overflowed = listener.cancel();
    if summary.overflowed > 0 {
        warn!("reply queue was full, {} replies dropped", summary.overflowed);
    }

    drain_replies(&mut queue, cfg, port, prober, sink, &mut summary).await;
    Ok(summary)
}

async fn drain_replies(
    queue: &mut mpsc::Receiver<DiscoveredHost>,
    cfg: &DiscoveryConfig,
    port: u16,
    prober: &dyn Prober,
    sink: &mut dyn HostSink,
    summary: &mut ScanSummary,
) {
    let mut idle: u32 = 0;

    loop {
        let host: DiscoveredHost = match queue.try_recv() {
            Ok(host) => host,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                if idle >= cfg.max_idle_polls {
                    break;
                }
                idle += 1;
                tokio::time::sleep(cfg.idle_poll_interval).await;
                continue;
            }
        };

        idle = 0;
        summary.replies += 1;
        debug!("ARP reply from {host}");

        if let Err(e) = prober.probe(host.ip, port).await {
            debug!("{host} skipped: {e}");
            continue;
        }
        summary.alive += 1;

        let record = HostRecord::alive(host, port);
        match sink.record(&record) {
            Ok(()) => {
                summary.recorded += 1;
                info!("{}", record.to_line());
            }
            Err(e) => warn!("failed to record {host}: {e:#}"),
        }
    }

    debug!("no replies for {idle} polls, discovery complete");
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
