//! SQLite sink.
//!
//! Each run starts from an empty table: it is created when missing and
//! cleared otherwise, then receives one row per live host.
//!
//! `connectionStatus` is 0 for a live host and 1 for a dead one. Only hosts
//! that passed their probe reach a sink, so every row is written as live.

use anyhow::{Context, bail};
use rusqlite::{Connection, params};

use sonar_common::config::DatabaseConfig;
use sonar_common::network::host::HostRecord;

use super::HostSink;

pub const STATUS_ALIVE: i64 = 0;

pub struct DatabaseSink {
    conn: Connection,
    table: String,
}

impl DatabaseSink {
    /// Opens (or creates) the database file and prepares the table.
    pub fn open(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        if let Some(parent) = cfg.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
        let conn = Connection::open(&cfg.path).context("Failed to open database")?;
        Self::with_connection(conn, &cfg.table)
    }

    pub fn in_memory(table: &str) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn, table)
    }

    pub fn with_connection(conn: Connection, table: &str) -> anyhow::Result<Self> {
        validate_table_name(table)?;

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                macAddress TEXT NOT NULL,
                deviceIp TEXT NOT NULL,
                connectionStatus INTEGER NOT NULL
            );
            DELETE FROM {table};"
        ))
        .with_context(|| format!("preparing table {table}"))?;

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl HostSink for DatabaseSink {
    fn record(&mut self, record: &HostRecord) -> anyhow::Result<()> {
        let sql = format!(
            "INSERT INTO {} (macAddress, deviceIp, connectionStatus) VALUES (?1, ?2, ?3)",
            self.table
        );
        self.conn
            .execute(
                &sql,
                params![
                    record.mac.to_string(),
                    record.ip.to_string(),
                    STATUS_ALIVE
                ],
            )
            .with_context(|| format!("inserting {} into {}", record.ip, self.table))?;
        Ok(())
    }
}

/// Table names are spliced into SQL, so only identifiers are accepted.
fn validate_table_name(table: &str) -> anyhow::Result<()> {
    let valid = !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        bail!("invalid table name: {table:?}");
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
