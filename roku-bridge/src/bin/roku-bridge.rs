use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use roku_bridge::config::default_config_path;
use roku_bridge::{
    init_logging, Capabilities, DeviceDescriptor, LoggingHost, LoggingMode, PlatformConfig,
    RokuPlatform,
};

/// Roku Bridge
///
/// Discovers Roku players on the local network, merges them with the
/// configured devices and prints the accessories that would be exposed.
#[derive(Parser, Debug)]
#[command(name = "roku-bridge")]
#[command(about = "Expose Roku players as home-automation accessories")]
#[command(version)]
struct Args {
    /// Platform configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra device address; may be repeated
    #[arg(long = "device", value_name = "IP")]
    devices: Vec<String>,

    /// Discovery window in milliseconds
    #[arg(short = 't', long)]
    timeout_ms: Option<u64>,

    /// Logging mode (silent, development, debug)
    #[arg(long, default_value = "development")]
    log_mode: LoggingMode,
}

impl Args {
    fn load_config(&self) -> Result<PlatformConfig> {
        let mut config = match &self.config {
            Some(path) => PlatformConfig::load(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => PlatformConfig::load(&path)
                    .with_context(|| format!("Loading {}", path.display()))?,
                None => PlatformConfig::default(),
            },
        };

        config
            .devices
            .extend(self.devices.iter().map(DeviceDescriptor::from_ip));

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms == 0 {
                anyhow::bail!("--timeout-ms must be positive");
            }
            config.settings.discovery_timeout_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_mode).context("Initializing logging")?;

    let config = args.load_config()?;
    info!(
        "Starting with {} configured device(s), discovery window {} ms",
        config.devices.len(),
        config.settings.discovery_timeout_ms
    );

    let platform = RokuPlatform::new(config, Capabilities::ecp(Arc::new(LoggingHost)));
    let Some(report) = platform.did_finish_launching().await else {
        return Ok(());
    };

    for failure in &report.failures {
        warn!("{}: {}", failure.ip, failure.error);
    }

    let accessories = platform.accessories();
    if accessories.is_empty() {
        println!("No accessories.");
        return Ok(());
    }

    for accessory in accessories {
        let model = accessory
            .information()
            .map(|info| info.model)
            .unwrap_or_default();
        println!("{} [{}] {}", accessory.display_name(), model, accessory.id());
        for switch in accessory.switches() {
            let marker = if switch.value() { "*" } else { " " };
            println!("  {} {:<24} {}", marker, switch.name(), switch.key());
        }
    }

    Ok(())
}
