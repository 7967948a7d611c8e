//! In-memory devices, discovery and host for integration tests.
//!
//! `MockDevice` keeps the foreground application in memory and records every
//! call it receives, so tests can assert on exact command sequences. Failure
//! modes are toggled with atomics at any point during a test.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use roku_bridge::{
    AccessoryHost, AccessoryId, Accessory, Application, CommandBatch, ControlKey, DeviceConnector,
    DeviceInfo, DeviceSession, Discoverer, DiscoveryError, EcpError, Key, ResolvedDevice,
};

/// A call received by a [`MockDevice`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Info,
    Apps,
    Active,
    Launch(String),
    Keypress(Key),
}

pub struct MockDevice {
    pub info: DeviceInfo,
    pub apps: Vec<Application>,
    active: Mutex<Option<String>>,
    calls: Mutex<Vec<Call>>,
    pub fail_info: AtomicBool,
    pub fail_apps: AtomicBool,
    pub fail_active: AtomicBool,
    pub fail_commands: AtomicBool,
    pub hang_active: AtomicBool,
}

impl MockDevice {
    pub fn new(serial: &str, name: &str, apps: &[(&str, &str)]) -> Self {
        Self {
            info: DeviceInfo {
                serial_number: serial.to_string(),
                vendor_name: "Roku".to_string(),
                model_name: "Roku Ultra".to_string(),
                default_device_name: format!("Roku Ultra - {}", serial),
                user_device_name: name.to_string(),
            },
            apps: apps
                .iter()
                .map(|(id, name)| Application::new(*id, *name))
                .collect(),
            active: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            fail_info: AtomicBool::new(false),
            fail_apps: AtomicBool::new(false),
            fail_active: AtomicBool::new(false),
            fail_commands: AtomicBool::new(false),
            hang_active: AtomicBool::new(false),
        }
    }

    /// Device with the usual three channels
    pub fn standard(serial: &str, name: &str) -> Arc<Self> {
        Arc::new(Self::new(
            serial,
            name,
            &[("12", "Netflix"), ("837", "YouTube"), ("2285", "Hulu")],
        ))
    }

    pub fn set_active(&self, app_id: Option<&str>) {
        *self.active.lock().unwrap() = app_id.map(str::to_string);
    }

    pub fn active_id(&self) -> Option<String> {
        self.active.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Return and clear the recorded calls
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn command_result(&self) -> Result<(), EcpError> {
        if self.fail_commands.load(Ordering::SeqCst) {
            Err(EcpError::Status(503))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DeviceSession for MockDevice {
    async fn info(&self) -> Result<DeviceInfo, EcpError> {
        self.record(Call::Info);
        if self.fail_info.load(Ordering::SeqCst) {
            return Err(EcpError::Network("connection refused".to_string()));
        }
        Ok(self.info.clone())
    }

    async fn apps(&self) -> Result<Vec<Application>, EcpError> {
        self.record(Call::Apps);
        if self.fail_apps.load(Ordering::SeqCst) {
            return Err(EcpError::Parse("truncated apps document".to_string()));
        }
        Ok(self.apps.clone())
    }

    async fn active(&self) -> Result<Option<Application>, EcpError> {
        self.record(Call::Active);
        if self.hang_active.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if self.fail_active.load(Ordering::SeqCst) {
            return Err(EcpError::Network("timed out".to_string()));
        }

        let active = self.active_id();
        Ok(active.map(|id| {
            self.apps
                .iter()
                .find(|app| app.id == id)
                .cloned()
                .unwrap_or_else(|| Application::new(id, "Unknown"))
        }))
    }

    async fn launch(&self, app_id: &str) -> Result<(), EcpError> {
        self.record(Call::Launch(app_id.to_string()));
        self.command_result()?;
        self.set_active(Some(app_id));
        Ok(())
    }

    async fn keypress(&self, key: Key) -> Result<(), EcpError> {
        self.record(Call::Keypress(key));
        self.command_result()
    }

    async fn send(&self, batch: &CommandBatch) -> Result<(), EcpError> {
        for key in batch.keys() {
            self.keypress(*key).await?;
        }
        Ok(())
    }
}

/// Connector over a fixed address book
#[derive(Default)]
pub struct MockConnector {
    devices: HashMap<String, Arc<MockDevice>>,
    pub connects: AtomicU32,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, ip: &str, device: Arc<MockDevice>) -> Self {
        self.devices.insert(ip.to_string(), device);
        self
    }
}

impl DeviceConnector for MockConnector {
    fn connect(&self, ip: &str) -> Result<Arc<dyn DeviceSession>, EcpError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.devices.get(ip) {
            Some(device) => Ok(Arc::clone(device) as Arc<dyn DeviceSession>),
            None => Err(EcpError::Network(format!("no route to {}", ip))),
        }
    }
}

/// Discoverer returning a canned result
pub struct MockDiscoverer {
    found: Option<Vec<String>>,
    requests: Mutex<Vec<(Duration, bool)>>,
}

impl MockDiscoverer {
    pub fn finding(ips: &[&str]) -> Self {
        Self {
            found: Some(ips.iter().map(|ip| ip.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            found: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Duration, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Discoverer for MockDiscoverer {
    async fn discover(&self, timeout: Duration, want_all: bool) -> Result<Vec<String>, DiscoveryError> {
        self.requests.lock().unwrap().push((timeout, want_all));
        match &self.found {
            Some(found) => Ok(found.clone()),
            None => Err(DiscoveryError::NoDevicesFound(timeout)),
        }
    }
}

/// Host that records everything it is asked to do
#[derive(Default)]
pub struct MockHost {
    registered: Mutex<Vec<AccessoryId>>,
    unregistered: Mutex<Vec<AccessoryId>>,
    updates: Mutex<Vec<(AccessoryId, ControlKey, bool)>>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn registered(&self) -> Vec<AccessoryId> {
        self.registered.lock().unwrap().clone()
    }

    pub fn unregistered(&self) -> Vec<AccessoryId> {
        self.unregistered.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(AccessoryId, ControlKey, bool)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn clear_updates(&self) {
        self.updates.lock().unwrap().clear();
    }
}

impl AccessoryHost for MockHost {
    fn register_accessories(&self, _plugin: &str, _platform: &str, accessories: &[Arc<Accessory>]) {
        self.registered
            .lock()
            .unwrap()
            .extend(accessories.iter().map(|a| a.id()));
    }

    fn unregister_accessories(&self, _plugin: &str, _platform: &str, accessories: &[Arc<Accessory>]) {
        self.unregistered
            .lock()
            .unwrap()
            .extend(accessories.iter().map(|a| a.id()));
    }

    fn update_value(&self, accessory: AccessoryId, control: &ControlKey, value: bool) {
        self.updates
            .lock()
            .unwrap()
            .push((accessory, control.clone(), value));
    }
}

/// Resolved view of a mock device, as the resolver would produce it
pub fn resolved(device: &Arc<MockDevice>, ip: &str) -> ResolvedDevice {
    ResolvedDevice {
        session: Arc::clone(device) as Arc<dyn DeviceSession>,
        info: device.info.clone(),
        ip: ip.to_string(),
        apps: device.apps.clone(),
        disable_navigation_buttons: false,
    }
}
