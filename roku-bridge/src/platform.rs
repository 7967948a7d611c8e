//! Process-wide entry point the host talks to.
//!
//! Lifecycle, in the order the host drives it:
//!
//! 1. [`RokuPlatform::new`] with configuration and capabilities
//! 2. [`RokuPlatform::configure_accessory`] once per accessory the host
//!    persisted from a previous run
//! 3. [`RokuPlatform::did_finish_launching`], which performs the single
//!    discovery run of the process

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::accessory::Accessory;
use crate::cache::AccessoryCache;
use crate::config::PlatformConfig;
use crate::device::{DeviceConnector, Discoverer, EcpConnector, SsdpDiscoverer};
use crate::host::{AccessoryHost, PLATFORM_NAME, PLUGIN_NAME};
use crate::identity::AccessoryId;
use crate::orchestrator::{DiscoveryReport, Orchestrator};

/// External collaborators the platform is built from.
#[derive(Clone)]
pub struct Capabilities {
    pub discoverer: Arc<dyn Discoverer>,
    pub connector: Arc<dyn DeviceConnector>,
    pub host: Arc<dyn AccessoryHost>,
}

impl Capabilities {
    /// SSDP discovery and ECP sessions against real devices
    pub fn ecp(host: Arc<dyn AccessoryHost>) -> Self {
        Self {
            discoverer: Arc::new(SsdpDiscoverer),
            connector: Arc::new(EcpConnector),
            host,
        }
    }
}

pub struct RokuPlatform {
    config: PlatformConfig,
    capabilities: Capabilities,
    cache: AccessoryCache,
    launched: AtomicBool,
}

impl RokuPlatform {
    pub fn new(config: PlatformConfig, capabilities: Capabilities) -> Self {
        tracing::debug!(
            "Platform created with {} configured device(s)",
            config.devices.len()
        );
        Self {
            config,
            capabilities,
            cache: AccessoryCache::new(),
            launched: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Accept an accessory the host restored from its own storage.
    ///
    /// Accessories replayed after launch are still cached but will not be
    /// bound until the next process start.
    pub fn configure_accessory(&self, accessory: Arc<Accessory>) {
        if self.launched.load(Ordering::SeqCst) {
            tracing::warn!(
                "Cached accessory {} replayed after launch; it stays unbound",
                accessory.display_name()
            );
        }
        tracing::debug!("Restoring cached accessory {}", accessory.display_name());
        self.cache.configure(accessory);
    }

    /// Run discovery and register accessories.
    ///
    /// Only the first call does anything; later calls return `None`.
    pub async fn did_finish_launching(&self) -> Option<DiscoveryReport> {
        if self.launched.swap(true, Ordering::SeqCst) {
            tracing::debug!("Discovery already ran for this process");
            return None;
        }

        let orchestrator = Orchestrator {
            discoverer: self.capabilities.discoverer.as_ref(),
            connector: self.capabilities.connector.as_ref(),
            host: Arc::clone(&self.capabilities.host),
            cache: &self.cache,
            settings: &self.config.settings,
        };

        let report = orchestrator.run(&self.config.devices).await;
        tracing::info!(
            "Discovery finished: {} registered, {} reused, {} failed",
            report.registered.len(),
            report.reused.len(),
            report.failures.len()
        );
        Some(report)
    }

    pub fn accessories(&self) -> Vec<Arc<Accessory>> {
        self.cache.accessories()
    }

    pub fn accessory(&self, id: AccessoryId) -> Option<Arc<Accessory>> {
        self.cache.get(id)
    }

    /// Unregister an accessory from the host and forget it.
    ///
    /// Returns the removed accessory, or `None` if it was unknown.
    pub fn remove_accessory(&self, id: AccessoryId) -> Option<Arc<Accessory>> {
        let accessory = self.cache.remove(id)?;
        tracing::info!("Removing accessory {}", accessory.display_name());
        self.capabilities.host.unregister_accessories(
            PLUGIN_NAME,
            PLATFORM_NAME,
            std::slice::from_ref(&accessory),
        );
        Some(accessory)
    }
}
