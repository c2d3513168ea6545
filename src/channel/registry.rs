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

//! Channel registration and dispatch.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::handler::MethodCallHandler;
use super::protocol::{MethodCall, MethodResult};

/// Maps channel names to their handlers.
#[derive(Default)]
pub struct ChannelRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn MethodCallHandler>>>,
}

impl ChannelRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a handler, replacing any handler already on `channel`.
    pub fn register(&self, channel: impl Into<String>, handler: Arc<dyn MethodCallHandler>) {
        let channel = channel.into();
        if self.handlers.write().insert(channel.clone(), handler).is_some() {
            info!("Replaced handler on channel '{}'", channel);
        } else {
            info!("Registered handler on channel '{}'", channel);
        }
    }

    /// Remove the handler on `channel`. Returns whether one was registered.
    pub fn unregister(&self, channel: &str) -> bool {
        let removed = self.handlers.write().remove(channel).is_some();
        if removed {
            info!("Unregistered handler on channel '{}'", channel);
        }
        removed
    }

    /// Names of all registered channels, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.handlers.read().keys().cloned().collect();
        channels.sort();
        channels
    }

    /// Route a call to the handler on its channel.
    pub async fn dispatch(&self, call: &MethodCall) -> MethodResult {
        let handler = self.handlers.read().get(&call.channel).cloned();

        match handler {
            Some(handler) => {
                debug!("Dispatching {}.{} (id {})", call.channel, call.method, call.id);
                handler.on_method_call(call).await
            }
            None => {
                warn!("No handler registered on channel '{}'", call.channel);
                MethodResult::NotImplemented
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::FixedProbe;
    use crate::channel::handler::AudioOutputHandler;
    use crate::channel::protocol::{AUDIO_OUTPUT_CHANNEL, GET_BLUETOOTH_DEVICE_NAME};
    use crate::resolver::{PairedDevice, PlatformSnapshot};

    fn audio_handler(name: &str) -> Arc<dyn MethodCallHandler> {
        let snapshot = PlatformSnapshot::routed(vec![PairedDevice::new("00:11").with_name(name)]);
        Arc::new(AudioOutputHandler::new(FixedProbe::new(snapshot)))
    }

    #[tokio::test]
    async fn test_dispatch_to_registered_channel() {
        let registry = ChannelRegistry::new();
        registry.register(AUDIO_OUTPUT_CHANNEL, audio_handler("Buds"));

        let result = registry
            .dispatch(&MethodCall::new(GET_BLUETOOTH_DEVICE_NAME))
            .await;
        assert_eq!(result.as_str(), Some("Buds"));
    }

    #[tokio::test]
    async fn test_unknown_channel_not_implemented() {
        let registry = ChannelRegistry::new();
        registry.register(AUDIO_OUTPUT_CHANNEL, audio_handler("Buds"));

        let call = MethodCall::new(GET_BLUETOOTH_DEVICE_NAME).on_channel("video_output");
        assert!(registry.dispatch(&call).await.is_not_implemented());
    }

    #[tokio::test]
    async fn test_register_replaces_handler() {
        let registry = ChannelRegistry::new();
        registry.register(AUDIO_OUTPUT_CHANNEL, audio_handler("Old"));
        registry.register(AUDIO_OUTPUT_CHANNEL, audio_handler("New"));

        assert_eq!(registry.channels(), vec![AUDIO_OUTPUT_CHANNEL.to_string()]);
        let result = registry
            .dispatch(&MethodCall::new(GET_BLUETOOTH_DEVICE_NAME))
            .await;
        assert_eq!(result.as_str(), Some("New"));
    }

    #[tokio::test]
    async fn test_unregister() {
        let registry = ChannelRegistry::new();
        registry.register(AUDIO_OUTPUT_CHANNEL, audio_handler("Buds"));

        assert!(registry.unregister(AUDIO_OUTPUT_CHANNEL));
        assert!(!registry.unregister(AUDIO_OUTPUT_CHANNEL));
        assert!(registry.channels().is_empty());

        let result = registry
            .dispatch(&MethodCall::new(GET_BLUETOOTH_DEVICE_NAME))
            .await;
        assert!(result.is_not_implemented());
    }
}
