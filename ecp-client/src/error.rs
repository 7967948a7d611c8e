//! Error types for the ECP client

use thiserror::Error;

/// Errors that can occur during ECP communication
#[derive(Debug, Error)]
pub enum EcpError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with a non-success HTTP status
    #[error("Device returned HTTP status {0}")]
    Status(u16),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    Parse(String),
}

/// Convenience Result type alias for ECP operations.
pub type Result<T> = std::result::Result<T, EcpError>;
