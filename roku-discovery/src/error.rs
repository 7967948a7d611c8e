//! Error types for the discovery system.

use std::fmt;
use std::time::Duration;

/// Error type for discovery operations.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Network-related errors (socket creation, send failures, etc.)
    NetworkError(String),
    /// No device answered within the discovery window
    NoDevicesFound(Duration),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::NoDevicesFound(timeout) => write!(
                f,
                "Could not find any Roku devices after {} ms",
                timeout.as_millis()
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
