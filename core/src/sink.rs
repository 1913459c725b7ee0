//! Output sinks for verified hosts.

use anyhow::Context;
use tracing::debug;

use sonar_common::config::{Config, Output};
use sonar_common::network::host::HostRecord;

pub mod database;
pub mod file;

pub use database::DatabaseSink;
pub use file::FileSink;

pub trait HostSink: Send {
    fn record(&mut self, record: &HostRecord) -> anyhow::Result<()>;
}

/// Opens the sink selected by `cfg.output`.
///
/// The file sink expects `cfg.dirname` to have been prepared with
/// [`file::prepare_dir`] already.
pub fn open(cfg: &Config) -> anyhow::Result<Box<dyn HostSink>> {
    match cfg.output {
        Output::File => {
            debug!("recording hosts under {}", cfg.dirname.display());
            Ok(Box::new(FileSink::new(&cfg.dirname)))
        }
        Output::Database => {
            let sink = DatabaseSink::open(&cfg.database)
                .with_context(|| format!("opening database {}", cfg.database.path.display()))?;
            debug!(
                "recording hosts into table {} of {}",
                cfg.database.table,
                cfg.database.path.display()
            );
            Ok(Box::new(sink))
        }
    }
}
