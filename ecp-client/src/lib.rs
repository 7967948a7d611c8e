//! Private External Control Protocol client for Roku device communication
//!
//! This crate provides a minimal async HTTP client for the ECP interface that
//! Roku players expose on port 8060: device and application queries, app
//! launches and remote key-presses.

mod command;
mod error;
mod keys;
mod model;

pub use command::CommandBatch;
pub use error::{EcpError, Result};
pub use keys::Key;
pub use model::{parse_active_app, parse_apps, Application, DeviceInfo};

use std::time::Duration;

/// Port the ECP service listens on.
pub const ECP_PORT: u16 = 8060;

/// A minimal ECP client bound to a single device.
#[derive(Debug, Clone)]
pub struct EcpClient {
    http: reqwest::Client,
    base_url: String,
}

impl EcpClient {
    /// Create a client for the device at `ip`.
    pub fn new(ip: &str) -> Result<Self> {
        Self::with_base_url(format!("http://{}:{}", ip, ECP_PORT))
    }

    /// Create a client against an explicit base URL (e.g. `http://10.0.0.5:8060`).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EcpError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch device identity (`GET /query/device-info`)
    pub async fn info(&self) -> Result<DeviceInfo> {
        let xml = self.query("device-info").await?;
        DeviceInfo::from_xml(&xml)
    }

    /// Fetch every installed application (`GET /query/apps`)
    pub async fn apps(&self) -> Result<Vec<Application>> {
        let xml = self.query("apps").await?;
        parse_apps(&xml)
    }

    /// Fetch the application in the foreground, `None` on the home screen
    pub async fn active(&self) -> Result<Option<Application>> {
        let xml = self.query("active-app").await?;
        parse_active_app(&xml)
    }

    /// Launch an application by id (`POST /launch/<id>`)
    pub async fn launch(&self, app_id: &str) -> Result<()> {
        self.post(&format!("launch/{}", app_id)).await
    }

    /// Press and release a single key (`POST /keypress/<key>`)
    pub async fn keypress(&self, key: Key) -> Result<()> {
        self.post(&format!("keypress/{}", key)).await
    }

    /// Send every key of `batch` in order.
    ///
    /// Stops at the first failed press and returns its error; presses before
    /// it have already reached the device.
    pub async fn send(&self, batch: &CommandBatch) -> Result<()> {
        for key in batch.keys() {
            self.keypress(*key).await?;
        }
        Ok(())
    }

    async fn query(&self, path: &str) -> Result<String> {
        let url = format!("{}/query/{}", self.base_url, path);
        tracing::trace!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| EcpError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EcpError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| EcpError::Network(e.to_string()))
    }

    async fn post(&self, path: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::trace!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .body("")
            .send()
            .await
            .map_err(|e| EcpError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EcpError::Status(status.as_u16()));
        }
        Ok(())
    }
}
