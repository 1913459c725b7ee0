use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use super::{ProbeError, Prober};

pub const PROBE_PAYLOAD: &[u8] = b"PING";
pub const PROBE_COUNT: usize = 3;
pub const PROBE_SPACING: Duration = Duration::from_secs(1);

/// Best-effort UDP probe.
///
/// Sends [`PROBE_COUNT`] datagrams on a connected socket and succeeds when
/// every send succeeds. No reply is awaited. The only thing that can fail a
/// send is an ICMP port-unreachable reported for an earlier datagram, so a
/// live host with the port closed is rejected while a silent or missing host
/// still passes.
#[derive(Debug, Clone, Copy)]
pub struct UdpProber {
    pub count: usize,
    /// Pause after every datagram, the last one included.
    pub spacing: Duration,
}

impl Default for UdpProber {
    fn default() -> Self {
        Self {
            count: PROBE_COUNT,
            spacing: PROBE_SPACING,
        }
    }
}

#[async_trait]
impl Prober for UdpProber {
    async fn probe(&self, addr: Ipv4Addr, port: u16) -> Result<(), ProbeError> {
        let socket_addr: SocketAddr = SocketAddr::from((addr, port));
        let send_error = |source| ProbeError::Send {
            addr: socket_addr,
            source,
        };

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(send_error)?;
        socket
            .connect(socket_addr)
            .await
            .map_err(|source| ProbeError::Connect {
                addr: socket_addr,
                source,
            })?;

        for _ in 0..self.count {
            socket.send(PROBE_PAYLOAD).await.map_err(send_error)?;
            tokio::time::sleep(self.spacing).await;
        }

        Ok(())
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
