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

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::channel::AUDIO_OUTPUT_CHANNEL;
use crate::resolver::{PairedDevice, PlatformSnapshot};

const APP_DIR: &str = "audio-output-bridge";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel settings.
    pub channel: ChannelConfig,

    /// Bluetooth settings.
    pub bluetooth: BluetoothConfig,

    /// Snapshot served by the fixed backend.
    pub fixed: FixedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Channel name the audio output handler registers on.
    pub name: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: AUDIO_OUTPUT_CHANNEL.to_string(),
        }
    }
}

/// Where platform state is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Bluez,
    Fixed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BluetoothConfig {
    /// Platform backend.
    pub backend: Backend,

    /// Adapter to read, e.g. "hci0". Unset uses the default adapter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedConfig {
    /// Whether audio is reported as routed over A2DP.
    pub a2dp_routed: bool,

    /// Paired devices, in reporting order.
    pub paired_devices: Vec<PairedDevice>,
}

impl FixedConfig {
    pub fn snapshot(&self) -> PlatformSnapshot {
        PlatformSnapshot {
            a2dp_routed: self.a2dp_routed,
            paired_devices: self.paired_devices.clone(),
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load configuration from the default location or create it.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, writing defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.channel.name, "audio_output");
        assert_eq!(config.bluetooth.backend, Backend::Bluez);
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.bluetooth.backend = Backend::Fixed;
        config.bluetooth.adapter = Some("hci1".to_string());
        config.fixed.a2dp_routed = true;
        config.fixed.paired_devices = vec![
            PairedDevice::new("00:11"),
            PairedDevice::new("00:22").with_name("Car Speakers"),
        ];
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[bluetooth]
backend = "fixed"

[fixed]
a2dp_routed = true

[[fixed.paired_devices]]
id = "AA:BB:CC:DD:EE:FF"
name = "Headphones"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.channel.name, "audio_output");
        assert_eq!(config.bluetooth.backend, Backend::Fixed);
        assert_eq!(config.bluetooth.adapter, None);

        let snapshot = config.fixed.snapshot();
        assert!(snapshot.a2dp_routed);
        assert_eq!(snapshot.paired_devices[0].name.as_deref(), Some("Headphones"));
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bluetooth]\nbackend = \"coreaudio\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
