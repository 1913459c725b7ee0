pub mod discover;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sonar_common::config::{
    self, Config, DatabaseConfig, DiscoveryConfig, Output, Protocol, RETRY_DELAY,
};

#[derive(Parser, Debug)]
#[command(name = "sonar")]
#[command(version, about = "Finds the hosts on the local subnet that serve a given port.")]
pub struct CommandLine {
    /// Interface whose subnet is swept
    #[arg(short, long, env = "SONAR_INTERFACE", default_value = config::DEFAULT_INTERFACE)]
    pub interface: String,

    /// Service port verified on every host that answers ARP
    #[arg(short, long, env = "SONAR_PORT", default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Directory receiving one <ip>.txt file per live host
    #[arg(long, env = "SONAR_DIRNAME", default_value = config::DEFAULT_DIRNAME)]
    pub dirname: PathBuf,

    /// Extra checks of an interface without an IPv4 address, after the first one
    #[arg(short, long = "retrycnt", env = "SONAR_RETRY_COUNT", default_value_t = config::DEFAULT_RETRY_COUNT)]
    pub retry_count: u32,

    /// Transport used for the liveness probe: tcp or udp
    #[arg(short, long = "scantype", default_value = "tcp")]
    pub scan_type: Protocol,

    /// Where live hosts are recorded: file or database
    #[arg(short, long, default_value = "file")]
    pub output: Output,

    /// SQLite database used by the database output
    #[arg(long, env = "SONAR_DB_PATH", default_value = config::DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Table receiving the rows of the database output
    #[arg(long, env = "SONAR_DB_TABLE", default_value = config::DEFAULT_DB_TABLE)]
    pub db_table: String,

    /// Seconds to keep collecting ARP replies after the broadcast
    #[arg(short, long, default_value_t = config::COLLECTION_WINDOW.as_secs())]
    pub window: u64,

    /// Verbose output
    #[arg(short, long)]
    pub debug: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        Config {
            interface: self.interface,
            port: self.port,
            protocol: self.scan_type,
            output: self.output,
            dirname: self.dirname,
            database: DatabaseConfig {
                path: self.db_path,
                table: self.db_table,
            },
            retry_count: self.retry_count,
            retry_delay: RETRY_DELAY,
            discovery: DiscoveryConfig {
                collection_window: Duration::from_secs(self.window),
                ..DiscoveryConfig::default()
            },
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
