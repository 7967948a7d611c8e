use ecp_client::EcpError;
use thiserror::Error;

use crate::identity::AccessoryId;

/// Errors raised while discovering, resolving and controlling devices.
///
/// None of these are fatal to the bridge: the orchestrator logs resolution
/// failures and moves on, and control failures are reported back to the host
/// as a failed read or write.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Network discovery failed or found nothing; static config is used instead
    #[error("Device discovery failed: {0}")]
    DiscoveryFailure(String),

    /// The device did not answer the identity query (likely offline)
    #[error("Device info query failed for {ip}: {source}")]
    InfoUnavailable {
        ip: String,
        #[source]
        source: EcpError,
    },

    /// The device answered the identity query but not the application list
    #[error("Application list query failed for {ip}: {source}")]
    AppListUnavailable {
        ip: String,
        #[source]
        source: EcpError,
    },

    /// A key-press, batch or launch command was rejected or not delivered
    #[error("Command to {ip} failed: {source}")]
    CommandFailure {
        ip: String,
        #[source]
        source: EcpError,
    },

    /// The active application could not be read in time
    #[error("Active application query for {ip} failed: {reason}")]
    ActiveQueryError { ip: String, reason: String },

    /// The accessory has no device session yet (cached but not resolved)
    #[error("Accessory {0} is not bound to a device")]
    Unbound(AccessoryId),

    /// No control with this key exists on the accessory
    #[error("Unknown control: {0}")]
    UnknownControl(String),
}

impl BridgeError {
    /// Address of the device involved, when there is one
    pub fn ip(&self) -> Option<&str> {
        match self {
            BridgeError::InfoUnavailable { ip, .. }
            | BridgeError::AppListUnavailable { ip, .. }
            | BridgeError::CommandFailure { ip, .. }
            | BridgeError::ActiveQueryError { ip, .. } => Some(ip),
            _ => None,
        }
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
