//! Control binding: attaches switch behaviour to an accessory.
//!
//! [`bind_controls`] builds (or re-uses) the switch set for a resolved device.
//! [`read_control`] and [`write_control`] are the handlers the host invokes
//! when a switch is read or written. All handlers share the accessory's
//! [`DeviceBinding`] and [`AccessoryState`](crate::accessory::AccessoryState).
//!
//! Only the channel switches reflect live device state, and only as far as
//! the protocol allows: the foreground application can be queried, nothing
//! else can. Buttons and volume keys are momentary and always read off, and
//! mute is tracked locally.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ecp_client::{Application, CommandBatch, EcpError, Key};

use crate::accessory::{Accessory, AccessoryInformation, ControlKey, ControlKind};
use crate::config::BridgeSettings;
use crate::device::DeviceSession;
use crate::error::{BridgeError, Result};
use crate::host::AccessoryHost;
use crate::resolver::ResolvedDevice;

/// Remote buttons exposed unless navigation buttons are disabled.
///
/// "Pause" sends the play key: the device toggles play/pause on it.
pub const NAVIGATION_BUTTONS: [(Key, &str); 13] = [
    (Key::Power, "Power"),
    (Key::Home, "Home Screen"),
    (Key::Info, "Options"),
    (Key::Rev, "Rewind"),
    (Key::Play, "Pause"),
    (Key::Play, "Play"),
    (Key::Fwd, "Fast Forward"),
    (Key::Left, "Left"),
    (Key::Right, "Right"),
    (Key::Up, "Up"),
    (Key::Down, "Down"),
    (Key::Back, "Back"),
    (Key::Enter, "Enter"),
];

/// Handler tunables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSettings {
    /// Key-presses per volume up/down activation
    pub volume_repeat: usize,
    /// Upper bound on an active-application query
    pub active_query_timeout: Duration,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self::from(&BridgeSettings::default())
    }
}

impl From<&BridgeSettings> for ControlSettings {
    fn from(settings: &BridgeSettings) -> Self {
        Self {
            volume_repeat: settings.volume_repeat,
            active_query_timeout: settings.active_query_timeout(),
        }
    }
}

/// Connection between an accessory and the device it represents.
pub struct DeviceBinding {
    pub(crate) ip: String,
    pub(crate) session: Arc<dyn DeviceSession>,
    pub(crate) host: Arc<dyn AccessoryHost>,
    pub(crate) settings: ControlSettings,
}

impl fmt::Debug for DeviceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBinding")
            .field("ip", &self.ip)
            .field("settings", &self.settings)
            .finish()
    }
}

impl DeviceBinding {
    fn command_failure(&self, source: EcpError) -> BridgeError {
        BridgeError::CommandFailure {
            ip: self.ip.clone(),
            source,
        }
    }

    /// Query the foreground application, bounded by the configured timeout
    async fn active_app(&self) -> Result<Option<Application>> {
        let timeout = self.settings.active_query_timeout;
        match tokio::time::timeout(timeout, self.session.active()).await {
            Ok(Ok(active)) => Ok(active),
            Ok(Err(e)) => Err(BridgeError::ActiveQueryError {
                ip: self.ip.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BridgeError::ActiveQueryError {
                ip: self.ip.clone(),
                reason: format!("no answer within {} ms", timeout.as_millis()),
            }),
        }
    }
}

/// Keys of every non-channel control
fn remote_control_keys() -> Vec<ControlKey> {
    NAVIGATION_BUTTONS
        .iter()
        .map(|(_, name)| ControlKey::button(name))
        .chain([ControlKey::mute(), ControlKey::volume_up(), ControlKey::volume_down()])
        .collect()
}

/// Attach every control for `device` to `accessory`.
///
/// With navigation buttons disabled only the channel switches are exposed;
/// buttons, mute and volume are left out.
///
/// Safe to call again on an accessory that was bound before or replayed
/// from the host's cache: existing switches are reused by key, channels for
/// applications that are gone are removed, and remote controls are removed
/// when navigation buttons have since been disabled. Initial channel values
/// are pushed to the host only if it already knows the accessory; a new
/// accessory carries them in its registration.
pub async fn bind_controls(
    accessory: &Accessory,
    device: &ResolvedDevice,
    host: Arc<dyn AccessoryHost>,
    settings: ControlSettings,
) {
    accessory.set_information_once(AccessoryInformation {
        manufacturer: device.info.vendor_name.clone(),
        model: device.info.model_name.clone(),
        name: device.info.user_device_name.clone(),
        serial_number: device.info.serial_number.clone(),
    });

    accessory.bind(DeviceBinding {
        ip: device.ip.clone(),
        session: Arc::clone(&device.session),
        host,
        settings,
    });

    if device.disable_navigation_buttons {
        for key in remote_control_keys() {
            accessory.remove_switch(&key);
        }
    } else {
        for (key, name) in NAVIGATION_BUTTONS {
            accessory.add_or_get_switch(ControlKey::button(name), name, ControlKind::Button(key));
        }

        accessory.add_or_get_switch(ControlKey::mute(), "Mute", ControlKind::Mute);
        accessory.add_or_get_switch(
            ControlKey::volume_up(),
            "Volume Up",
            ControlKind::Volume(Key::VolumeUp),
        );
        accessory.add_or_get_switch(
            ControlKey::volume_down(),
            "Volume Down",
            ControlKind::Volume(Key::VolumeDown),
        );
    }

    bind_channels(accessory, &device.apps).await;
}

async fn bind_channels(accessory: &Accessory, apps: &[Application]) {
    let wanted: HashSet<ControlKey> = apps.iter().map(|app| ControlKey::channel(&app.id)).collect();
    for stale in accessory.channel_switches() {
        if !wanted.contains(stale.key()) {
            tracing::debug!("Removing channel {} from {}", stale.name(), accessory.display_name());
            accessory.remove_switch(stale.key());
        }
    }

    let channels: Vec<_> = apps
        .iter()
        .map(|app| {
            accessory.add_or_get_switch(
                ControlKey::channel(&app.id),
                &app.name,
                ControlKind::Channel {
                    app_id: app.id.clone(),
                },
            )
        })
        .collect();

    let Some(binding) = accessory.binding() else {
        return;
    };

    // One query seeds every channel's initial position
    let active = match binding.active_app().await {
        Ok(active) => active,
        Err(e) => {
            tracing::debug!("Initial channel state unknown: {}", e);
            None
        }
    };

    let registered = accessory.is_registered();
    for (switch, app) in channels.iter().zip(apps) {
        let on = active.as_ref().map_or(false, |a| a.id == app.id);
        switch.set_value(on);
        if registered {
            binding.host.update_value(accessory.id(), switch.key(), on);
        }
    }
}

/// Show every channel except `keep` as off, without touching the device
fn turn_off_other_channels(accessory: &Accessory, binding: &DeviceBinding, keep: &ControlKey) {
    for other in accessory.channel_switches() {
        if other.key() != keep {
            other.set_value(false);
            binding.host.update_value(accessory.id(), other.key(), false);
        }
    }
}

fn require_binding(accessory: &Accessory) -> Result<Arc<DeviceBinding>> {
    accessory
        .binding()
        .ok_or_else(|| BridgeError::Unbound(accessory.id()))
}

/// Handle a host read of the switch `key`.
pub async fn read_control(accessory: &Accessory, key: &ControlKey) -> Result<bool> {
    let switch = accessory
        .switch(key)
        .ok_or_else(|| BridgeError::UnknownControl(key.to_string()))?;

    match switch.kind() {
        ControlKind::Button(_) | ControlKind::Volume(_) => Ok(false),
        ControlKind::Mute => Ok(accessory.muted()),
        ControlKind::Channel { app_id } => {
            let binding = require_binding(accessory)?;
            let active = binding.active_app().await.map_err(|e| {
                tracing::warn!("Reading {} failed: {}", switch.name(), e);
                e
            })?;

            let on = active.map_or(false, |a| &a.id == app_id);
            switch.set_value(on);
            if on {
                turn_off_other_channels(accessory, &binding, key);
            }
            Ok(on)
        }
    }
}

/// Handle a host write of `value` to the switch `key`.
///
/// Returns the value the switch should settle on. On error nothing local
/// has changed.
pub async fn write_control(accessory: &Accessory, key: &ControlKey, value: bool) -> Result<bool> {
    let switch = accessory
        .switch(key)
        .ok_or_else(|| BridgeError::UnknownControl(key.to_string()))?;

    match switch.kind().clone() {
        ControlKind::Button(button) => {
            if value {
                let binding = require_binding(accessory)?;
                binding
                    .session
                    .keypress(button)
                    .await
                    .map_err(|e| binding.command_failure(e))?;
                tracing::debug!("{}: pressed {}", binding.ip, button);
            }
            switch.set_value(false);
            Ok(false)
        }
        ControlKind::Mute => {
            let binding = require_binding(accessory)?;

            // Down then up clears an unknown mute state
            let mut batch = CommandBatch::new().volume_down().volume_up();
            if value {
                batch = batch.volume_mute();
            }

            binding
                .session
                .send(&batch)
                .await
                .map_err(|e| binding.command_failure(e))?;

            accessory.set_muted(value);
            switch.set_value(value);
            Ok(value)
        }
        ControlKind::Volume(volume_key) => {
            let binding = require_binding(accessory)?;
            let batch = CommandBatch::new().keypress(volume_key, binding.settings.volume_repeat);

            binding
                .session
                .send(&batch)
                .await
                .map_err(|e| binding.command_failure(e))?;

            switch.set_value(false);
            Ok(false)
        }
        ControlKind::Channel { app_id } => {
            if !value {
                // Apps can't be closed remotely; the switch just reports off
                switch.set_value(false);
                return Ok(false);
            }

            let binding = require_binding(accessory)?;
            binding
                .session
                .launch(&app_id)
                .await
                .map_err(|e| binding.command_failure(e))?;

            tracing::info!("{}: launched {}", binding.ip, switch.name());
            switch.set_value(true);

            turn_off_other_channels(accessory, &binding, key);
            Ok(true)
        }
    }
}
