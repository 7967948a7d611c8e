//! Ordered key-press batches.

use crate::Key;

/// An ordered sequence of key-presses sent to one device as a unit.
///
/// Batches are plain data: building one performs no I/O. Hand it to
/// [`EcpClient::send`](crate::EcpClient::send) to execute the presses in
/// order, each request completing before the next one starts.
///
/// ```
/// use ecp_client::{CommandBatch, Key};
///
/// let batch = CommandBatch::new().volume_down().volume_up().volume_mute();
/// assert_eq!(batch.keys(), &[Key::VolumeDown, Key::VolumeUp, Key::VolumeMute]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBatch {
    keys: Vec<Key>,
}

impl CommandBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `times` presses of `key`
    pub fn keypress(mut self, key: Key, times: usize) -> Self {
        self.keys.extend(std::iter::repeat(key).take(times));
        self
    }

    pub fn volume_up(self) -> Self {
        self.keypress(Key::VolumeUp, 1)
    }

    pub fn volume_down(self) -> Self {
        self.keypress(Key::VolumeDown, 1)
    }

    pub fn volume_mute(self) -> Self {
        self.keypress(Key::VolumeMute, 1)
    }

    /// Keys in send order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
