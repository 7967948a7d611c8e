//! The host-visible accessory record.
//!
//! An [`Accessory`] is plain data: identity metadata, a keyed list of
//! switches and the per-accessory state the handlers need. The behaviour of
//! each switch lives in [`crate::binder`], which reads and mutates this record
//! through its public methods.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ecp_client::Key;
use parking_lot::{Mutex, RwLock};

use crate::binder::DeviceBinding;
use crate::identity::AccessoryId;

/// Static identity fields shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub name: String,
    pub serial_number: String,
}

/// Stable key of a switch on an accessory.
///
/// Display names can collide (two buttons both named "Play", two apps with
/// the same name); keys cannot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlKey(String);

impl ControlKey {
    const CHANNEL_PREFIX: &'static str = "channel:";

    pub fn button(name: &str) -> Self {
        Self(format!("button:{}", name.to_ascii_lowercase().replace(' ', "-")))
    }

    pub fn mute() -> Self {
        Self("mute".to_string())
    }

    pub fn volume_up() -> Self {
        Self("volume:up".to_string())
    }

    pub fn volume_down() -> Self {
        Self("volume:down".to_string())
    }

    pub fn channel(app_id: &str) -> Self {
        Self(format!("{}{}", Self::CHANNEL_PREFIX, app_id))
    }

    pub fn is_channel(&self) -> bool {
        self.0.starts_with(Self::CHANNEL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a switch does when the host reads or writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Momentary remote key; always reads off
    Button(Key),
    /// Mute toggle backed by the local shadow state
    Mute,
    /// Momentary repeated volume key; always reads off
    Volume(Key),
    /// One installed application; on while it is in the foreground
    Channel { app_id: String },
}

/// A single boolean control exposed to the host.
#[derive(Debug)]
pub struct Switch {
    key: ControlKey,
    name: RwLock<String>,
    kind: ControlKind,
    value: AtomicBool,
}

impl Switch {
    pub fn new(key: ControlKey, name: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            key,
            name: RwLock::new(name.into()),
            kind,
            value: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &ControlKey {
        &self.key
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: &str) {
        let mut current = self.name.write();
        if *current != name {
            *current = name.to_string();
        }
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// Value currently displayed by the host
    pub fn value(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set_value(&self, value: bool) {
        self.value.store(value, Ordering::SeqCst);
    }
}

/// Mutable per-accessory state shared by the handlers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccessoryState {
    /// Last mute state we commanded; never read back from the device
    pub muted: bool,
}

/// A bundle of switches representing one physical device.
pub struct Accessory {
    id: AccessoryId,
    display_name: String,
    information: RwLock<Option<AccessoryInformation>>,
    switches: RwLock<Vec<Arc<Switch>>>,
    state: Mutex<AccessoryState>,
    binding: RwLock<Option<Arc<DeviceBinding>>>,
    registered: AtomicBool,
}

impl Accessory {
    pub fn new(id: AccessoryId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            information: RwLock::new(None),
            switches: RwLock::new(Vec::new()),
            state: Mutex::new(AccessoryState::default()),
            binding: RwLock::new(None),
            registered: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> AccessoryId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn information(&self) -> Option<AccessoryInformation> {
        self.information.read().clone()
    }

    /// Set identity metadata. Only the first call has an effect.
    pub fn set_information_once(&self, information: AccessoryInformation) -> bool {
        let mut current = self.information.write();
        if current.is_some() {
            return false;
        }
        *current = Some(information);
        true
    }

    /// Out-of-band "identify" request; succeeds without touching the device
    pub fn identify(&self) -> crate::Result<()> {
        tracing::debug!("Identify requested for {}", self.display_name);
        Ok(())
    }

    /// Add a switch, or return the existing one with the same key.
    ///
    /// An existing switch keeps its identity and value; only its display name
    /// is refreshed.
    pub fn add_or_get_switch(
        &self,
        key: ControlKey,
        name: &str,
        kind: ControlKind,
    ) -> Arc<Switch> {
        let mut switches = self.switches.write();
        if let Some(existing) = switches.iter().find(|s| s.key == key) {
            existing.set_name(name);
            return Arc::clone(existing);
        }

        let switch = Arc::new(Switch::new(key, name, kind));
        switches.push(Arc::clone(&switch));
        switch
    }

    pub fn remove_switch(&self, key: &ControlKey) -> Option<Arc<Switch>> {
        let mut switches = self.switches.write();
        let index = switches.iter().position(|s| &s.key == key)?;
        Some(switches.remove(index))
    }

    pub fn switch(&self, key: &ControlKey) -> Option<Arc<Switch>> {
        self.switches.read().iter().find(|s| &s.key == key).cloned()
    }

    /// All switches in registration order
    pub fn switches(&self) -> Vec<Arc<Switch>> {
        self.switches.read().clone()
    }

    pub fn channel_switches(&self) -> Vec<Arc<Switch>> {
        self.switches
            .read()
            .iter()
            .filter(|s| s.key.is_channel())
            .cloned()
            .collect()
    }

    pub fn muted(&self) -> bool {
        self.state.lock().muted
    }

    pub(crate) fn set_muted(&self, muted: bool) {
        self.state.lock().muted = muted;
    }

    pub fn is_bound(&self) -> bool {
        self.binding.read().is_some()
    }

    /// Whether the host knows this accessory, so value pushes reach it
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Record that the host has (or restored) this accessory
    pub fn mark_registered(&self) {
        self.registered.store(true, Ordering::SeqCst);
    }

    pub(crate) fn binding(&self) -> Option<Arc<DeviceBinding>> {
        self.binding.read().clone()
    }

    pub(crate) fn bind(&self, binding: DeviceBinding) {
        *self.binding.write() = Some(Arc::new(binding));
    }
}

impl fmt::Debug for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessory")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("switches", &self.switches.read().len())
            .field("bound", &self.is_bound())
            .field("registered", &self.is_registered())
            .finish()
    }
}
