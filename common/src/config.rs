//! # Run Configuration
//!
//! A single [`Config`] value is built once by the binary and handed to every
//! component that needs it. Nothing in the library crates reads flags or
//! environment variables on its own.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_INTERFACE: &str = "eth0";
pub const DEFAULT_PORT: u16 = 10039;
pub const DEFAULT_DIRNAME: &str = "/var/local/sonar";
pub const DEFAULT_DB_PATH: &str = "/var/lib/sonar/device.db";
pub const DEFAULT_DB_TABLE: &str = "device";
pub const DEFAULT_RETRY_COUNT: u32 = 15;
pub const RETRY_DELAY: Duration = Duration::from_secs(30);
pub const COLLECTION_WINDOW: Duration = Duration::from_secs(10);
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_IDLE_POLLS: u32 = 3;

pub struct Config {
    /// Name of the interface whose subnet gets swept.
    pub interface: String,
    /// Service port verified on every responder.
    pub port: u16,
    pub protocol: Protocol,
    pub output: Output,
    /// Directory holding one `<ip>.txt` file per live host.
    ///
    /// Cleared and recreated before every run regardless of the output mode.
    pub dirname: PathBuf,
    pub database: DatabaseConfig,
    /// How many times to re-check an interface that had no IPv4 address at
    /// the first check.
    pub retry_count: u32,
    pub retry_delay: Duration,
    pub discovery: DiscoveryConfig,
}

/// Timing knobs of the discovery loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// How long the listener keeps capturing after the last request went out.
    pub collection_window: Duration,
    /// Pause between two empty polls of the reply queue.
    pub idle_poll_interval: Duration,
    /// Consecutive empty polls after which the scan is considered complete.
    pub max_idle_polls: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            collection_window: COLLECTION_WINDOW,
            idle_poll_interval: IDLE_POLL_INTERVAL,
            max_idle_polls: MAX_IDLE_POLLS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            table: DEFAULT_DB_TABLE.to_string(),
        }
    }
}

/// Transport used to verify the service port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            _ => Err(format!("invalid scan type: {s} (expected tcp or udp)")),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// Where live hosts are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Database,
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Output::File),
            "database" | "db" | "sqlite" => Ok(Output::Database),
            _ => Err(format!("invalid output type: {s} (expected file or database)")),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::File => write!(f, "file"),
            Output::Database => write!(f, "database"),
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
