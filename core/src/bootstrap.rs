//! Waits for the scanning interface to become usable.
//!
//! An interface that exists but has no IPv4 address yet is checked again
//! after a fixed delay. Every other [`InterfaceError`] ends the run at once.

use std::time::Duration;

use tracing::{debug, warn};

use sonar_common::network::interface::{self, InterfaceError, LocalLink};

/// Looks `name` up; a missing address is re-checked up to `retries` times
/// after the first check.
pub async fn wait_for_link(
    name: &str,
    retries: u32,
    delay: Duration,
) -> Result<LocalLink, InterfaceError> {
    resolve_with_retry(|| interface::lookup(name), retries, delay).await
}

pub async fn resolve_with_retry<F>(
    mut lookup: F,
    retries: u32,
    delay: Duration,
) -> Result<LocalLink, InterfaceError>
where
    F: FnMut() -> Result<LocalLink, InterfaceError>,
{
    let mut retry: u32 = 0;

    loop {
        match lookup() {
            Ok(link) => {
                debug!(
                    "using {} ({}) on {}/{}",
                    link.interface.name,
                    link.mac,
                    link.addr,
                    link.subnet.prefix()
                );
                return Ok(link);
            }
            Err(e) if e.is_retryable() && retry < retries => {
                retry += 1;
                warn!("{e}, retrying in {}s ({retry}/{retries})", delay.as_secs());
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
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
