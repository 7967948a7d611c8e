//! Seams to the device wire protocol.
//!
//! The bridge never talks HTTP or SSDP directly. It goes through these traits
//! so the orchestrator and binder can run against real players (`EcpConnector`,
//! `SsdpDiscoverer`) or against in-memory fakes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ecp_client::{Application, CommandBatch, DeviceInfo, EcpClient, Key};
use roku_discovery::DiscoveryError;

/// A control session with one device.
#[async_trait]
pub trait DeviceSession: Send + Sync {
    async fn info(&self) -> ecp_client::Result<DeviceInfo>;

    async fn apps(&self) -> ecp_client::Result<Vec<Application>>;

    /// Foreground application, `None` on the home screen
    async fn active(&self) -> ecp_client::Result<Option<Application>>;

    async fn launch(&self, app_id: &str) -> ecp_client::Result<()>;

    async fn keypress(&self, key: Key) -> ecp_client::Result<()>;

    /// Send a batch in order; later keys wait for earlier ones
    async fn send(&self, batch: &CommandBatch) -> ecp_client::Result<()>;
}

/// Opens sessions to devices by address.
pub trait DeviceConnector: Send + Sync {
    fn connect(&self, ip: &str) -> ecp_client::Result<Arc<dyn DeviceSession>>;
}

/// Finds device addresses on the network.
#[async_trait]
pub trait Discoverer: Send + Sync {
    async fn discover(
        &self,
        timeout: Duration,
        want_all: bool,
    ) -> Result<Vec<String>, DiscoveryError>;
}

#[async_trait]
impl DeviceSession for EcpClient {
    async fn info(&self) -> ecp_client::Result<DeviceInfo> {
        EcpClient::info(self).await
    }

    async fn apps(&self) -> ecp_client::Result<Vec<Application>> {
        EcpClient::apps(self).await
    }

    async fn active(&self) -> ecp_client::Result<Option<Application>> {
        EcpClient::active(self).await
    }

    async fn launch(&self, app_id: &str) -> ecp_client::Result<()> {
        EcpClient::launch(self, app_id).await
    }

    async fn keypress(&self, key: Key) -> ecp_client::Result<()> {
        EcpClient::keypress(self, key).await
    }

    async fn send(&self, batch: &CommandBatch) -> ecp_client::Result<()> {
        EcpClient::send(self, batch).await
    }
}

/// Connects over ECP on the standard port.
#[derive(Debug, Clone, Default)]
pub struct EcpConnector;

impl DeviceConnector for EcpConnector {
    fn connect(&self, ip: &str) -> ecp_client::Result<Arc<dyn DeviceSession>> {
        Ok(Arc::new(EcpClient::new(ip)?))
    }
}

/// SSDP discovery, run on the blocking pool so the scheduler stays free.
#[derive(Debug, Clone, Default)]
pub struct SsdpDiscoverer;

#[async_trait]
impl Discoverer for SsdpDiscoverer {
    async fn discover(
        &self,
        timeout: Duration,
        want_all: bool,
    ) -> Result<Vec<String>, DiscoveryError> {
        tokio::task::spawn_blocking(move || roku_discovery::discover(timeout, want_all))
            .await
            .map_err(|e| DiscoveryError::NetworkError(format!("Discovery task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecp_connector_opens_session() {
        assert!(EcpConnector.connect("192.168.1.40").is_ok());
    }
}
