// Data model for one poll of the switch.
//
// A snapshot and its port records are value objects: rebuilt in full on
// every poll, never patched in place. The previous snapshot is simply
// dropped by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything one poll cycle learned about the device.
///
/// String fields stay empty and numeric fields stay zero when the page that
/// carries them was unreachable or unparseable; a snapshot is always
/// produced, even if every page failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub model: String,
    pub mac_address: String,
    pub ip_address: String,
    pub firmware_version: String,
    pub hardware_version: String,
    /// Total PoE budget currently drawn, in watts.
    pub poe_total_watts: f64,
    /// One entry per row the port-statistics page returned, keyed by the
    /// device's 1-indexed port number.
    pub ports: BTreeMap<u32, PortRecord>,
}

impl DeviceSnapshot {
    /// Stable device identity: MAC address lower-cased with colons stripped.
    ///
    /// Empty when the info page never parsed.
    pub fn device_id(&self) -> String {
        self.mac_address.to_lowercase().replace(':', "")
    }
}

/// State of a single physical port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortRecord {
    /// 1-indexed port number as displayed by the device UI. The CGI forms
    /// are 0-indexed; the client translates when posting.
    pub id: u32,
    /// Administrative state as free text from the device ("Enable"/"Disable").
    pub state: String,
    /// Link state as free text: "Down", "Up", or a speed string like "1000M".
    pub link: String,
    pub tx_good: u64,
    pub tx_bad: u64,
    pub rx_good: u64,
    pub rx_bad: u64,
    pub poe: PoeState,
    pub speed_duplex: SpeedDuplex,
    pub flow_control: FlowControl,
    /// MAC addresses currently forwarding through this port, deduplicated
    /// in first-seen order.
    pub mac_addresses: Vec<String>,
}

impl PortRecord {
    /// Whether the port is administratively enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.eq_ignore_ascii_case("enable")
    }

    /// Whether the link is up: any non-empty link text other than "down".
    pub fn is_link_up(&self) -> bool {
        !self.link.is_empty() && !self.link.eq_ignore_ascii_case("down")
    }
}

/// Per-port PoE power state.
///
/// Derived from an unscoped substring scan of the PoE settings page, so a
/// layout shift can leave a port without either marker. That case is
/// reported as `Unknown` rather than silently claimed as disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoeState {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

impl PoeState {
    /// Whether power is known to be on.
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// Speed/duplex setting, device codes 0-5.
///
/// The port form requires resubmitting this code on every state change, or
/// the firmware resets the port to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedDuplex {
    #[default]
    #[serde(rename = "Auto")]
    Auto,
    #[serde(rename = "10M Half")]
    Half10,
    #[serde(rename = "10M Full")]
    Full10,
    #[serde(rename = "100M Half")]
    Half100,
    #[serde(rename = "100M Full")]
    Full100,
    #[serde(rename = "1000M Full")]
    Full1000,
}

impl SpeedDuplex {
    /// The numeric code the CGI forms use.
    pub fn code(self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::Half10 => 1,
            Self::Full10 => 2,
            Self::Half100 => 3,
            Self::Full100 => 4,
            Self::Full1000 => 5,
        }
    }

    /// Parse a device code. Unknown codes return `None` and leave the
    /// caller's default untouched.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Auto),
            1 => Some(Self::Half10),
            2 => Some(Self::Full10),
            3 => Some(Self::Half100),
            4 => Some(Self::Full100),
            5 => Some(Self::Full1000),
            _ => None,
        }
    }
}

/// Flow-control setting, device codes 0/1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    #[default]
    Off,
    On,
}

impl FlowControl {
    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_strips_colons_and_lowercases() {
        let snapshot = DeviceSnapshot {
            mac_address: "1C:2A:A3:00:11:22".into(),
            ..DeviceSnapshot::default()
        };
        assert_eq!(snapshot.device_id(), "1c2aa3001122");
    }

    #[test]
    fn link_up_predicate() {
        let mut port = PortRecord {
            link: "1000M".into(),
            ..PortRecord::default()
        };
        assert!(port.is_link_up());

        port.link = "Down".into();
        assert!(!port.is_link_up());

        port.link = "Up".into();
        assert!(port.is_link_up());

        port.link = String::new();
        assert!(!port.is_link_up());
    }

    #[test]
    fn admin_state_compares_case_insensitively() {
        let port = PortRecord {
            state: "ENABLE".into(),
            ..PortRecord::default()
        };
        assert!(port.is_enabled());
    }

    #[test]
    fn speed_duplex_codes_round_trip() {
        for code in 0..=5 {
            let speed = SpeedDuplex::from_code(code).expect("valid code");
            assert_eq!(speed.code(), code);
        }
        assert_eq!(SpeedDuplex::from_code(6), None);
    }

    #[test]
    fn poe_state_defaults_to_unknown() {
        assert_eq!(PoeState::default(), PoeState::Unknown);
        assert!(!PoeState::Unknown.is_enabled());
    }
}
