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

//! Bluetooth audio output bridge.
//!
//! Answers the application layer's `audio_output` channel with a label for
//! the active Bluetooth audio device.

pub mod bluetooth;
pub mod channel;
pub mod config;
pub mod resolver;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use bluetooth::{BluezProbe, FixedProbe, PlatformProbe};
use channel::{AudioOutputHandler, ChannelRegistry};
use config::{Backend, Config};

/// Build the probe selected by the configuration.
///
/// A BlueZ session that cannot be opened degrades to an unrouted fixed
/// probe, so callers always get a label.
pub async fn create_probe(config: &Config) -> Box<dyn PlatformProbe> {
    match config.bluetooth.backend {
        Backend::Bluez => {
            or_unrouted(BluezProbe::connect(config.bluetooth.adapter.clone()).await)
        }
        Backend::Fixed => Box::new(FixedProbe::new(config.fixed.snapshot())),
    }
}

fn or_unrouted<P: PlatformProbe + 'static>(probe: Result<P>) -> Box<dyn PlatformProbe> {
    match probe {
        Ok(probe) => Box::new(probe),
        Err(e) => {
            warn!("BlueZ unavailable, reporting no Bluetooth output: {}", e);
            Box::new(FixedProbe::default())
        }
    }
}

/// Create a registry with the audio output handler on the configured channel.
pub fn create_registry(config: &Config, probe: Box<dyn PlatformProbe>) -> Result<Arc<ChannelRegistry>> {
    if config.channel.name.is_empty() {
        anyhow::bail!("Channel name must not be empty");
    }

    info!(
        "Audio output handler on '{}' using {} backend",
        config.channel.name,
        probe.backend_name()
    );

    let registry = ChannelRegistry::new();
    registry.register(
        config.channel.name.clone(),
        Arc::new(AudioOutputHandler::new(probe)),
    );
    Ok(registry)
}
