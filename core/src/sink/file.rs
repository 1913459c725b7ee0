use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::warn;

use sonar_common::network::host::HostRecord;

use super::HostSink;

/// Empties `dir` and makes sure it exists.
///
/// Entries that cannot be removed are logged and left behind.
pub fn prepare_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            bail!("{} exists and is not a directory", dir.display());
        }
        let entries =
            fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
        for entry in entries {
            let path: PathBuf = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("skipping unreadable entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = removed {
                warn!("failed to remove {}: {e}", path.display());
            }
        }
    }

    fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))
}

/// Writes one `<ip>.txt` file per live host.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, record: &HostRecord) -> PathBuf {
        self.dir.join(format!("{}.txt", record.ip))
    }
}

impl HostSink for FileSink {
    fn record(&mut self, record: &HostRecord) -> anyhow::Result<()> {
        let path: PathBuf = self.path_for(record);
        let mut file =
            fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        writeln!(file, "{}", record.to_line())
            .with_context(|| format!("writing {}", path.display()))?;
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
