// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Active output device resolution.
//!
//! Turns a snapshot of the platform's Bluetooth state into the label the
//! application displays for the current audio output.

use serde::{Deserialize, Serialize};

/// Label returned when audio is not routed over A2DP.
pub const NOT_USING_BLUETOOTH: &str = "Not using Bluetooth";

/// Label returned when audio is routed over A2DP but no device name is known.
pub const FALLBACK_DEVICE_LABEL: &str = "Bluetooth device";

/// A device the OS holds a pairing for. Being paired does not imply being
/// connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedDevice {
    /// Opaque identifier (the device address under BlueZ).
    pub id: String,
    /// Display name, if the OS knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PairedDevice {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Point-in-time view of the platform state the resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    /// Whether audio output is currently routed over the A2DP profile.
    #[serde(default)]
    pub a2dp_routed: bool,
    /// Paired devices, in the order the OS reported them.
    #[serde(default)]
    pub paired_devices: Vec<PairedDevice>,
}

impl PlatformSnapshot {
    /// Snapshot with routing active over the given devices.
    pub fn routed(paired_devices: Vec<PairedDevice>) -> Self {
        Self {
            a2dp_routed: true,
            paired_devices,
        }
    }

    /// Snapshot with audio on a local output.
    pub fn unrouted() -> Self {
        Self::default()
    }
}

/// Resolve the label for the active audio output.
///
/// The first paired device with a name is taken to be the active one.
/// Nothing here checks connection state, so with several paired devices
/// the label can name a device that is not the one playing.
pub fn resolve_active_output_label(snapshot: &PlatformSnapshot) -> String {
    if !snapshot.a2dp_routed {
        return NOT_USING_BLUETOOTH.to_string();
    }

    snapshot
        .paired_devices
        .iter()
        .find_map(|device| device.name.clone())
        .unwrap_or_else(|| FALLBACK_DEVICE_LABEL.to_string())
}
