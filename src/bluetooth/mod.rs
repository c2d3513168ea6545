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

//! Bluetooth platform access.
//!
//! Probes capture a [`PlatformSnapshot`] from the host at call time. The
//! resolver only ever sees the snapshot.

mod bluez;
mod fixed;

use futures::future::BoxFuture;

use crate::resolver::PlatformSnapshot;

pub use bluez::{BluezProbe, A2DP_SINK_UUID};
pub use fixed::FixedProbe;

/// Source of platform snapshots.
///
/// `snapshot` never fails. Implementations map an unavailable adapter or
/// a failed read onto a snapshot that resolves to one of the fallback
/// labels.
pub trait PlatformProbe: Send + Sync {
    /// Capture the current routing flag and paired device set.
    fn snapshot(&self) -> BoxFuture<'_, PlatformSnapshot>;

    /// Short name of the backend, for logging.
    fn backend_name(&self) -> &'static str;
}

impl PlatformProbe for Box<dyn PlatformProbe> {
    fn snapshot(&self) -> BoxFuture<'_, PlatformSnapshot> {
        (**self).snapshot()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
