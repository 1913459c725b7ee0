//! The reply listener: a dedicated thread that reads the capture stream and
//! forwards every genuine ARP reply to the discovery loop.
//!
//! The handoff queue is bounded, sized from the number of candidates by
//! [`reply_queue_capacity`]. Nothing drains it before the collection window
//! closes, so it holds every reply of the window. The listener never waits for
//! room in it: a reply arriving while the queue is full is dropped and
//! counted, and the count is reported when the listener is cancelled.

use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pnet::datalink::DataLinkReceiver;
use pnet::util::MacAddr;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, trace};

use sonar_common::network::host::DiscoveredHost;
use sonar_protocols::arp;

/// Smallest queue handed to a listener.
pub const REPLY_QUEUE_CAPACITY: usize = 1024;

/// Replies budgeted per candidate address, repeated replies included.
const REPLIES_PER_CANDIDATE: usize = 2;

/// Pause after a read error that is not a plain read timeout.
const ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// The consumer side of a running listener.
pub struct ReplyStream {
    pub hosts: mpsc::Receiver<DiscoveredHost>,
    pub listener: ListenerHandle,
}

/// Cancellation handle of a running listener.
///
/// Dropping the handle cancels the listener as well.
pub struct ListenerHandle {
    stop: oneshot::Sender<()>,
    overflow: Arc<AtomicUsize>,
}

impl ListenerHandle {
    pub fn new(stop: oneshot::Sender<()>, overflow: Arc<AtomicUsize>) -> Self {
        Self { stop, overflow }
    }

    /// Signals the listener to stop and returns how many replies it had to
    /// drop because the queue was full.
    pub fn cancel(self) -> usize {
        let _ = self.stop.send(());
        self.overflow.load(Ordering::Relaxed)
    }
}

/// Queue size for a sweep over `candidates` addresses.
pub fn reply_queue_capacity(candidates: usize) -> usize {
    candidates
        .saturating_mul(REPLIES_PER_CANDIDATE)
        .max(REPLY_QUEUE_CAPACITY)
}

pub fn spawn(
    rx: Box<dyn DataLinkReceiver>,
    local_mac: MacAddr,
    capacity: usize,
) -> ReplyStream {
    let (queue_tx, queue_rx) = mpsc::channel(capacity);
    let (stop_tx, stop_rx) = oneshot::channel();
    let overflow = Arc::new(AtomicUsize::new(0));

    let overflow_ref = overflow.clone();
    thread::spawn(move || listen(rx, local_mac, queue_tx, stop_rx, overflow_ref));

    ReplyStream {
        hosts: queue_rx,
        listener: ListenerHandle::new(stop_tx, overflow),
    }
}

fn listen(
    mut rx: Box<dyn DataLinkReceiver>,
    local_mac: MacAddr,
    queue: mpsc::Sender<DiscoveredHost>,
    mut stop: oneshot::Receiver<()>,
    overflow: Arc<AtomicUsize>,
) {
    loop {
        match stop.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Closed) => break,
        }

        let frame: &[u8] = match rx.next() {
            Ok(frame) => frame,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => continue,
            Err(e) => {
                trace!("capture read failed: {e}");
                thread::sleep(ERROR_BACKOFF);
                continue;
            }
        };

        let Some(host) = arp::parse_reply(frame) else {
            continue;
        };
        // Our own traffic looped back by the capture.
        if host.mac == local_mac {
            continue;
        }

        match queue.try_send(host) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                overflow.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Closed(_)) => break,
        }
    }

    debug!("reply listener stopped");
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
