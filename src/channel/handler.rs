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

//! Method call handlers.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use super::protocol::{MethodCall, MethodResult, GET_BLUETOOTH_DEVICE_NAME};
use crate::bluetooth::PlatformProbe;
use crate::resolver::resolve_active_output_label;

/// Callback invoked for every call on the channel it is registered on.
pub trait MethodCallHandler: Send + Sync {
    /// Handle a call and produce exactly one result.
    fn on_method_call<'a>(&'a self, call: &'a MethodCall) -> BoxFuture<'a, MethodResult>;
}

/// Handler for the `audio_output` channel.
pub struct AudioOutputHandler<P> {
    probe: P,
}

impl<P: PlatformProbe> AudioOutputHandler<P> {
    /// Create a handler reading platform state through `probe`.
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Capture a fresh snapshot and resolve the output label.
    pub async fn bluetooth_device_name(&self) -> String {
        let snapshot = self.probe.snapshot().await;
        let label = resolve_active_output_label(&snapshot);
        debug!(
            "Resolved '{}' via {} ({} paired devices)",
            label,
            self.probe.backend_name(),
            snapshot.paired_devices.len()
        );
        label
    }
}

impl<P: PlatformProbe> MethodCallHandler for AudioOutputHandler<P> {
    fn on_method_call<'a>(&'a self, call: &'a MethodCall) -> BoxFuture<'a, MethodResult> {
        async move {
            match call.method.as_str() {
                GET_BLUETOOTH_DEVICE_NAME => {
                    MethodResult::success(self.bluetooth_device_name().await)
                }
                other => {
                    warn!("Method not implemented: {}", other);
                    MethodResult::NotImplemented
                }
            }
        }
        .boxed()
    }
}
