use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{ProbeError, Prober};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Full three-way handshake; the stream is dropped as soon as it connects.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    pub connect_timeout: Duration,
}

impl Default for TcpProber {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: Ipv4Addr, port: u16) -> Result<(), ProbeError> {
        let socket_addr: SocketAddr = SocketAddr::from((addr, port));

        match timeout(self.connect_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(source)) => Err(ProbeError::Connect {
                addr: socket_addr,
                source,
            }),
            Err(_elapsed) => Err(ProbeError::Timeout {
                addr: socket_addr,
                after: self.connect_timeout,
            }),
        }
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
