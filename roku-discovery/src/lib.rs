//! Roku device discovery library
//!
//! Finds Roku players on the local network using SSDP. Every player that
//! speaks the External Control Protocol answers an M-SEARCH for `roku:ecp`
//! with a `LOCATION` header pointing at its ECP endpoint.
//!
//! # Quick Start
//!
//! ```no_run
//! use roku_discovery::discover;
//! use std::time::Duration;
//!
//! match discover(Duration::from_millis(1000), true) {
//!     Ok(addresses) => println!("Found Roku devices at {:?}", addresses),
//!     Err(e) => eprintln!("Discovery failed: {}", e),
//! }
//! ```

mod discovery;
mod error;
mod ssdp;

pub use discovery::{extract_ip_from_url, DiscoveryIterator};
pub use error::{DiscoveryError, Result};

use std::time::Duration;

/// Information about a discovered Roku device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// IP address taken from the SSDP location URL
    pub ip_address: String,
    /// ECP base URL as advertised, e.g. "http://192.168.1.134:8060/"
    pub location: String,
    /// Serial number from the USN header, when advertised
    pub serial_number: Option<String>,
}

/// Events emitted during device discovery.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A Roku device answered the search
    Found(Device),
}

/// Get an iterator for discovering Roku devices within `timeout`.
///
/// Never fails: if the UDP socket can't be created the iterator is empty.
pub fn get_iter_with_timeout(timeout: Duration) -> DiscoveryIterator {
    DiscoveryIterator::new(timeout).unwrap_or_else(|e| {
        tracing::warn!("Failed to start SSDP discovery: {}", e);
        DiscoveryIterator::empty()
    })
}

/// Discover Roku devices and return their IP addresses.
///
/// With `want_all` the whole `timeout` window is spent collecting answers;
/// otherwise the first device found is returned immediately.
///
/// # Errors
///
/// Returns `DiscoveryError::NetworkError` if the search can't be sent and
/// `DiscoveryError::NoDevicesFound` if nobody answered in time.
pub fn discover(timeout: Duration, want_all: bool) -> Result<Vec<String>> {
    let iter = DiscoveryIterator::new(timeout)?;

    let mut addresses: Vec<String> = Vec::new();
    for DeviceEvent::Found(device) in iter {
        tracing::debug!("SSDP answer from {} ({:?})", device.ip_address, device.serial_number);
        if !addresses.contains(&device.ip_address) {
            addresses.push(device.ip_address);
        }
        if !want_all {
            break;
        }
    }

    if addresses.is_empty() {
        Err(DiscoveryError::NoDevicesFound(timeout))
    } else {
        Ok(addresses)
    }
}
