//! Accessory identity type

use std::fmt;
use uuid::Uuid;

/// Namespace for serial-number derived accessory ids.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_4c2e_93a7_4d0b_8e55_2f1a_c0de_7a11);

/// Stable identifier of an accessory.
///
/// Derived from the device serial number with a name-based (v5) UUID, so the
/// same device maps to the same id across process restarts and the host can
/// match it against accessories it persisted earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Derive the id for a device serial number
    pub fn from_serial(serial_number: &str) -> Self {
        Self(Uuid::new_v5(&ACCESSORY_NAMESPACE, serial_number.as_bytes()))
    }

    /// Wrap an id the host persisted earlier
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
