//! The home-automation host as seen from the bridge.

use std::sync::Arc;

use crate::accessory::{Accessory, ControlKey};
use crate::identity::AccessoryId;

/// Plugin identifier used when talking to the host registry
pub const PLUGIN_NAME: &str = "homebridge-roku2";

/// Platform identifier used when talking to the host registry
pub const PLATFORM_NAME: &str = "RokuHomebridge";

/// Narrow view of the host's accessory registry.
///
/// Persisted accessories flow the other way: the host replays them through
/// [`crate::RokuPlatform::configure_accessory`] before launch completes.
pub trait AccessoryHost: Send + Sync {
    /// Publish accessories the host has not seen before
    fn register_accessories(&self, plugin: &str, platform: &str, accessories: &[Arc<Accessory>]);

    /// Withdraw accessories from the host
    fn unregister_accessories(&self, plugin: &str, platform: &str, accessories: &[Arc<Accessory>]);

    /// Push a displayed value without going through the switch's write handler
    fn update_value(&self, accessory: AccessoryId, control: &ControlKey, value: bool);
}

/// Host that only logs what it is asked to do.
///
/// Used by the command-line binary, where no real registry is attached.
#[derive(Debug, Default)]
pub struct LoggingHost;

impl AccessoryHost for LoggingHost {
    fn register_accessories(&self, plugin: &str, platform: &str, accessories: &[Arc<Accessory>]) {
        for accessory in accessories {
            tracing::info!(
                "[{}/{}] registered {} ({}) with {} controls",
                plugin,
                platform,
                accessory.display_name(),
                accessory.id(),
                accessory.switches().len()
            );
        }
    }

    fn unregister_accessories(&self, plugin: &str, platform: &str, accessories: &[Arc<Accessory>]) {
        for accessory in accessories {
            tracing::info!(
                "[{}/{}] unregistered {} ({})",
                plugin,
                platform,
                accessory.display_name(),
                accessory.id()
            );
        }
    }

    fn update_value(&self, accessory: AccessoryId, control: &ControlKey, value: bool) {
        tracing::debug!("{} {} -> {}", accessory, control, value);
    }
}
