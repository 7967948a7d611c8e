//! Discovery run: find devices, merge with configuration, register accessories.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::accessory::Accessory;
use crate::binder::{bind_controls, ControlSettings};
use crate::cache::AccessoryCache;
use crate::config::{BridgeSettings, DeviceDescriptor};
use crate::device::{DeviceConnector, Discoverer};
use crate::error::{BridgeError, Result};
use crate::filter::filter_apps;
use crate::host::{AccessoryHost, PLATFORM_NAME, PLUGIN_NAME};
use crate::identity::AccessoryId;
use crate::resolver::resolve_device;

/// Where a discovery run currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrchestratorState {
    #[default]
    Idle,
    Discovering,
    Merging,
    DiscoveryFailed,
}

/// A device whose pipeline failed during a run.
#[derive(Debug)]
pub struct DeviceFailure {
    pub ip: String,
    pub error: BridgeError,
}

/// Outcome of one discovery run
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Addresses returned by network discovery
    pub discovered: Vec<String>,
    /// `Merging` after a successful discovery, `DiscoveryFailed` otherwise
    pub state: OrchestratorState,
    /// Accessories registered with the host during this run
    pub registered: Vec<AccessoryId>,
    /// Accessories taken from the cache and re-bound
    pub reused: Vec<AccessoryId>,
    pub failures: Vec<DeviceFailure>,
}

impl DiscoveryReport {
    /// Discovery failed and only configured devices were processed
    pub fn fell_back(&self) -> bool {
        self.state == OrchestratorState::DiscoveryFailed
    }
}

enum PipelineOutcome {
    Registered(AccessoryId),
    Reused(AccessoryId),
}

/// Union of configured and discovered devices.
///
/// Configured entries come first and keep their options; a discovered address
/// that matches a configured one (or an earlier discovered one) is dropped.
pub fn merge_devices(configured: &[DeviceDescriptor], discovered: &[String]) -> Vec<DeviceDescriptor> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(configured.len() + discovered.len());

    for descriptor in configured {
        seen.insert(descriptor.ip_address.trim().to_string());
        merged.push(descriptor.clone());
    }

    for ip in discovered {
        let ip = ip.trim();
        if seen.insert(ip.to_string()) {
            merged.push(DeviceDescriptor::from_ip(ip));
        }
    }

    merged
}

/// Drives one discovery run against the injected collaborators.
pub struct Orchestrator<'a> {
    pub discoverer: &'a dyn Discoverer,
    pub connector: &'a dyn DeviceConnector,
    pub host: Arc<dyn AccessoryHost>,
    pub cache: &'a AccessoryCache,
    pub settings: &'a BridgeSettings,
}

impl<'a> Orchestrator<'a> {
    /// Discover, merge and run every device pipeline concurrently.
    ///
    /// Never fails: discovery errors fall back to the configured devices and
    /// per-device errors are collected in the report.
    pub async fn run(&self, configured: &[DeviceDescriptor]) -> DiscoveryReport {
        let mut report = DiscoveryReport {
            state: OrchestratorState::Discovering,
            ..DiscoveryReport::default()
        };
        tracing::debug!("Orchestrator {:?}", report.state);

        let timeout = self.settings.discovery_timeout();
        let devices = match self.discoverer.discover(timeout, true).await {
            Ok(found) => {
                report.state = OrchestratorState::Merging;
                tracing::info!("Discovered {} device(s)", found.len());
                let merged = merge_devices(configured, &found);
                report.discovered = found;
                merged
            }
            Err(e) => {
                report.state = OrchestratorState::DiscoveryFailed;
                let error = BridgeError::DiscoveryFailure(e.to_string());
                tracing::warn!("{}; using {} configured device(s)", error, configured.len());
                merge_devices(configured, &[])
            }
        };
        tracing::debug!("Orchestrator {:?} with {} device(s)", report.state, devices.len());

        let pipelines = devices.iter().map(|descriptor| async move {
            let outcome = self.add_device(descriptor).await;
            (descriptor.ip_address.clone(), outcome)
        });

        for (ip, outcome) in join_all(pipelines).await {
            match outcome {
                Ok(PipelineOutcome::Registered(id)) => report.registered.push(id),
                Ok(PipelineOutcome::Reused(id)) => report.reused.push(id),
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", ip, error);
                    report.failures.push(DeviceFailure { ip, error });
                }
            }
        }

        report
    }

    async fn add_device(&self, descriptor: &DeviceDescriptor) -> Result<PipelineOutcome> {
        let mut device = resolve_device(descriptor, self.connector).await?;
        device.apps = filter_apps(device.apps, descriptor.channels.as_deref());

        let serial = device.info.serial_number.clone();
        let _guard = self.cache.lock_serial(&serial).await;

        let (id, cached) = self.cache.resolve(&serial);
        let (accessory, is_new) = match cached {
            Some(accessory) => {
                tracing::debug!("Reusing cached accessory {} for {}", id, device.ip);
                (accessory, false)
            }
            None => {
                let accessory = Arc::new(Accessory::new(id, device.info.default_device_name.clone()));
                (accessory, true)
            }
        };

        bind_controls(
            &accessory,
            &device,
            Arc::clone(&self.host),
            ControlSettings::from(self.settings),
        )
        .await;

        let outcome = if is_new && self.cache.store(id, Arc::clone(&accessory)) {
            self.host
                .register_accessories(PLUGIN_NAME, PLATFORM_NAME, std::slice::from_ref(&accessory));
            accessory.mark_registered();
            PipelineOutcome::Registered(id)
        } else {
            PipelineOutcome::Reused(id)
        };

        tracing::info!(
            "Completed Add Accessory {} ({}) at {}",
            accessory.display_name(),
            serial,
            device.ip
        );
        Ok(outcome)
    }
}
