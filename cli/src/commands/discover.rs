use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use sonar_common::config::{Config, Output};
use sonar_core::bootstrap;
use sonar_core::prober;
use sonar_core::scanner::{self, LocalScanner, ScanSummary};
use sonar_core::sink::{self, file};

pub async fn discover(cfg: &Config) -> anyhow::Result<()> {
    file::prepare_dir(&cfg.dirname)?;

    let link = bootstrap::wait_for_link(&cfg.interface, cfg.retry_count, cfg.retry_delay)
        .await
        .with_context(|| format!("interface {} is not usable", cfg.interface))?;
    info!(
        "sweeping {}/{} on {} ({} candidates)",
        link.subnet.network,
        link.subnet.prefix(),
        link.interface.name,
        link.subnet.len()
    );

    let mut sink = sink::open(cfg)?;
    let prober = prober::for_protocol(cfg.protocol);
    let mut transceiver = LocalScanner::new(link)?;

    let start_time: Instant = Instant::now();
    let summary: ScanSummary = scanner::perform_discovery(
        &mut transceiver,
        &cfg.discovery,
        cfg.port,
        prober.as_ref(),
        sink.as_mut(),
    )
    .await?;

    discovery_ends(&summary, start_time.elapsed(), cfg);
    Ok(())
}

fn discovery_ends(summary: &ScanSummary, total_time: Duration, cfg: &Config) {
    if summary.replies == 0 {
        warn!("no host answered the ARP sweep");
    }

    let destination: String = match cfg.output {
        Output::File => cfg.dirname.display().to_string(),
        Output::Database => format!("{}:{}", cfg.database.path.display(), cfg.database.table),
    };
    let hosts: ColoredString = format!("{} live hosts", summary.recorded).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    info!(
        "Discovery Complete: {hosts} on {}/{} recorded to {destination} in {total_time} ({} replies)",
        cfg.port, cfg.protocol, summary.replies
    );
}
