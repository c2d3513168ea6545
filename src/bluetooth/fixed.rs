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

//! Probe that serves a configured snapshot.

use futures::future::{self, BoxFuture, FutureExt};

use super::PlatformProbe;
use crate::resolver::PlatformSnapshot;

/// Probe returning the same snapshot on every call.
///
/// Used on hosts without BlueZ and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    snapshot: PlatformSnapshot,
}

impl FixedProbe {
    pub fn new(snapshot: PlatformSnapshot) -> Self {
        Self { snapshot }
    }
}

impl PlatformProbe for FixedProbe {
    fn snapshot(&self) -> BoxFuture<'_, PlatformSnapshot> {
        future::ready(self.snapshot.clone()).boxed()
    }

    fn backend_name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PairedDevice;

    #[tokio::test]
    async fn test_returns_configured_snapshot() {
        let snapshot = PlatformSnapshot::routed(vec![PairedDevice::new("00:11").with_name("Buds")]);
        let probe = FixedProbe::new(snapshot.clone());

        assert_eq!(probe.snapshot().await, snapshot);
        assert_eq!(probe.snapshot().await, snapshot);
        assert_eq!(probe.backend_name(), "fixed");
    }

    #[tokio::test]
    async fn test_default_is_unrouted() {
        let probe = FixedProbe::default();
        let snapshot = probe.snapshot().await;
        assert!(!snapshot.a2dp_routed);
        assert!(snapshot.paired_devices.is_empty());
    }
}
