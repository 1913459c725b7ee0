mod commands;
mod terminal;

use tracing::{Instrument, info_span, warn};

use commands::{CommandLine, discover};
use sonar_common::config::Config;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.debug);

    if !is_root::is_root() {
        warn!("not running as root, opening the capture handle will likely fail");
    }

    let cfg: Config = commands.into_config();
    discover::discover(&cfg)
        .instrument(info_span!("discovery"))
        .await
}
