//! Remote key names understood by `POST /keypress/<key>`.

use std::fmt;

/// A key on the virtual remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Power,
    PowerOn,
    PowerOff,
    Home,
    Info,
    Rev,
    Fwd,
    Play,
    Select,
    Left,
    Right,
    Up,
    Down,
    Back,
    InstantReplay,
    Backspace,
    Search,
    Enter,
    VolumeUp,
    VolumeDown,
    VolumeMute,
}

impl Key {
    /// The key name as it appears in the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Power => "Power",
            Key::PowerOn => "PowerOn",
            Key::PowerOff => "PowerOff",
            Key::Home => "Home",
            Key::Info => "Info",
            Key::Rev => "Rev",
            Key::Fwd => "Fwd",
            Key::Play => "Play",
            Key::Select => "Select",
            Key::Left => "Left",
            Key::Right => "Right",
            Key::Up => "Up",
            Key::Down => "Down",
            Key::Back => "Back",
            Key::InstantReplay => "InstantReplay",
            Key::Backspace => "Backspace",
            Key::Search => "Search",
            Key::Enter => "Enter",
            Key::VolumeUp => "VolumeUp",
            Key::VolumeDown => "VolumeDown",
            Key::VolumeMute => "VolumeMute",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
