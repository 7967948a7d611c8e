//! # Roku Bridge
//!
//! Exposes Roku streaming players as home-automation accessories. Each
//! player becomes one accessory with switches for its installed
//! applications ("channels"), remote buttons, mute and volume.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roku_bridge::{Capabilities, LoggingHost, PlatformConfig, RokuPlatform};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlatformConfig::from_json_str(r#"{ "devices": [{ "ipAddress": "192.168.1.40" }] }"#)?;
//! let platform = RokuPlatform::new(config, Capabilities::ecp(Arc::new(LoggingHost)));
//!
//! if let Some(report) = platform.did_finish_launching().await {
//!     println!("{} accessories registered", report.registered.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Switch semantics
//!
//! - **Channels** are on while their application is in the foreground;
//!   turning one on launches it and turns the others off.
//! - **Buttons** and **Volume Up/Down** are momentary and settle off.
//! - **Mute** reflects the last mute state the bridge commanded.
//!
//! Handlers are [`read_control`] and [`write_control`].

pub mod accessory;
pub mod binder;
pub mod cache;
pub mod config;
pub mod device;
pub mod error;
pub mod filter;
pub mod host;
pub mod identity;
pub mod logging;
pub mod orchestrator;
pub mod platform;
pub mod resolver;

pub use accessory::{Accessory, AccessoryInformation, AccessoryState, ControlKey, ControlKind, Switch};
pub use binder::{bind_controls, read_control, write_control, ControlSettings, NAVIGATION_BUTTONS};
pub use cache::AccessoryCache;
pub use config::{BridgeSettings, ConfigError, DeviceDescriptor, PlatformConfig};
pub use device::{DeviceConnector, DeviceSession, Discoverer, EcpConnector, SsdpDiscoverer};
pub use error::{BridgeError, Result};
pub use filter::filter_apps;
pub use host::{AccessoryHost, LoggingHost, PLATFORM_NAME, PLUGIN_NAME};
pub use identity::AccessoryId;
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use orchestrator::{merge_devices, DeviceFailure, DiscoveryReport, Orchestrator, OrchestratorState};
pub use platform::{Capabilities, RokuPlatform};
pub use resolver::{resolve_device, ResolvedDevice};

// Device protocol types used in the public API
pub use ecp_client::{Application, CommandBatch, DeviceInfo, EcpError, Key};
pub use roku_discovery::DiscoveryError;
