//! Device connection resolution: address in, session + identity + apps out.

use std::fmt;
use std::sync::Arc;

use ecp_client::{Application, DeviceInfo};

use crate::config::DeviceDescriptor;
use crate::device::{DeviceConnector, DeviceSession};
use crate::error::{BridgeError, Result};

/// Everything needed to bind controls for one device.
#[derive(Clone)]
pub struct ResolvedDevice {
    pub session: Arc<dyn DeviceSession>,
    pub info: DeviceInfo,
    pub ip: String,
    pub apps: Vec<Application>,
    pub disable_navigation_buttons: bool,
}

impl fmt::Debug for ResolvedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedDevice")
            .field("ip", &self.ip)
            .field("info", &self.info)
            .field("apps", &self.apps)
            .field("disable_navigation_buttons", &self.disable_navigation_buttons)
            .finish()
    }
}

/// Open a session to the described device and fetch its identity and apps.
///
/// The returned application list is the device's full list; narrowing it to
/// the configured channels is the caller's job.
///
/// # Errors
///
/// `InfoUnavailable` if the session can't be opened or the identity query
/// fails, `AppListUnavailable` if the application query fails.
pub async fn resolve_device(
    descriptor: &DeviceDescriptor,
    connector: &dyn DeviceConnector,
) -> Result<ResolvedDevice> {
    let ip = descriptor.ip_address.trim().to_string();

    let session = connector
        .connect(&ip)
        .map_err(|source| BridgeError::InfoUnavailable {
            ip: ip.clone(),
            source,
        })?;

    let info = session
        .info()
        .await
        .map_err(|source| BridgeError::InfoUnavailable {
            ip: ip.clone(),
            source,
        })?;

    tracing::debug!(
        "{} identified as {} ({})",
        ip,
        info.serial_number,
        info.model_name
    );

    let apps = session
        .apps()
        .await
        .map_err(|source| BridgeError::AppListUnavailable {
            ip: ip.clone(),
            source,
        })?;

    Ok(ResolvedDevice {
        session,
        info,
        ip,
        apps,
        disable_navigation_buttons: descriptor.disable_navigation_buttons,
    })
}
