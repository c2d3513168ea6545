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

//! BlueZ backed probe.

use anyhow::Result;
use bluer::{Adapter, Address, Session};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::PlatformProbe;
use crate::resolver::{PairedDevice, PlatformSnapshot};

/// Advanced Audio Distribution Profile, audio sink role.
pub const A2DP_SINK_UUID: Uuid = Uuid::from_u128(0x0000110B_0000_1000_8000_00805F9B34FB);

/// Reads paired devices and A2DP routing from the BlueZ daemon.
///
/// BlueZ has no global "audio is on Bluetooth" switch. Routing is taken
/// to be active when a paired device is connected and offers the A2DP
/// sink service.
pub struct BluezProbe {
    session: Session,
    adapter_name: Option<String>,
}

impl BluezProbe {
    /// Open a BlueZ session.
    ///
    /// `adapter_name` selects an adapter such as `hci1`; `None` uses the
    /// default adapter.
    pub async fn connect(adapter_name: Option<String>) -> Result<Self> {
        let session = Session::new().await?;
        info!("BlueZ session created");

        Ok(Self {
            session,
            adapter_name,
        })
    }

    async fn adapter(&self) -> Result<Adapter> {
        let adapter = match &self.adapter_name {
            Some(name) => self.session.adapter(name)?,
            None => self.session.default_adapter().await?,
        };
        Ok(adapter)
    }

    /// Capture a snapshot, failing if the adapter cannot be read.
    async fn capture(&self) -> Result<PlatformSnapshot> {
        let adapter = self.adapter().await?;

        let powered = adapter.is_powered().await?;
        let mut reads = Vec::new();
        if powered {
            for addr in adapter.device_addresses().await? {
                reads.push((addr, Self::read_device(&adapter, addr).await));
            }
        } else {
            debug!("Adapter {} is powered off", adapter.name());
        }

        let snapshot = fold_devices(powered, reads);
        debug!(
            "Captured {} paired devices, a2dp_routed={}",
            snapshot.paired_devices.len(),
            snapshot.a2dp_routed
        );
        Ok(snapshot)
    }

    async fn read_device(adapter: &Adapter, addr: Address) -> Result<DeviceRead> {
        let device = adapter.device(addr)?;
        if !device.is_paired().await? {
            return Ok(DeviceRead::default());
        }

        let name = device.name().await?;
        let connected = device.is_connected().await?;
        let uuids = if connected {
            device.uuids().await?.unwrap_or_default()
        } else {
            HashSet::new()
        };

        Ok(DeviceRead {
            paired: true,
            name,
            connected,
            uuids,
        })
    }
}

/// Properties read from one BlueZ device.
#[derive(Debug, Clone, Default)]
struct DeviceRead {
    paired: bool,
    name: Option<String>,
    connected: bool,
    /// Service UUIDs; only read for connected devices.
    uuids: HashSet<Uuid>,
}

impl DeviceRead {
    fn a2dp_connected(&self) -> bool {
        self.connected && self.uuids.contains(&A2DP_SINK_UUID)
    }
}

/// Build a snapshot from per-device reads, in adapter order.
///
/// Unpaired devices are left out and failed reads are skipped. An adapter
/// that is powered off yields the unrouted, empty snapshot.
fn fold_devices(powered: bool, reads: Vec<(Address, Result<DeviceRead>)>) -> PlatformSnapshot {
    let mut snapshot = PlatformSnapshot::unrouted();
    if !powered {
        return snapshot;
    }

    for (addr, read) in reads {
        match read {
            Ok(read) if read.paired => {
                snapshot.a2dp_routed |= read.a2dp_connected();
                snapshot.paired_devices.push(PairedDevice {
                    id: addr.to_string(),
                    name: read.name,
                });
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping device {}: {}", addr, e);
            }
        }
    }

    snapshot
}

impl PlatformProbe for BluezProbe {
    fn snapshot(&self) -> BoxFuture<'_, PlatformSnapshot> {
        async move {
            match self.capture().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Bluetooth adapter unavailable: {}", e);
                    PlatformSnapshot::unrouted()
                }
            }
        }
        .boxed()
    }

    fn backend_name(&self) -> &'static str {
        "bluez"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const AUDIO_SOURCE_UUID: Uuid = Uuid::from_u128(0x0000110A_0000_1000_8000_00805F9B34FB);

    fn addr(last: u8) -> Address {
        Address::new([0x00, 0x11, 0x22, 0x33, 0x44, last])
    }

    fn paired(name: Option<&str>) -> DeviceRead {
        DeviceRead {
            paired: true,
            name: name.map(str::to_string),
            ..DeviceRead::default()
        }
    }

    fn connected(name: Option<&str>, uuids: &[Uuid]) -> DeviceRead {
        DeviceRead {
            connected: true,
            uuids: uuids.iter().copied().collect(),
            ..paired(name)
        }
    }

    #[test]
    fn test_a2dp_sink_uuid() {
        assert_eq!(
            A2DP_SINK_UUID.to_string(),
            "0000110b-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_powered_off_is_unrouted() {
        let reads = vec![(addr(1), Ok(connected(Some("Buds"), &[A2DP_SINK_UUID])))];

        assert_eq!(fold_devices(false, reads), PlatformSnapshot::unrouted());
    }

    #[test]
    fn test_unpaired_devices_left_out() {
        let reads = vec![
            (addr(1), Ok(DeviceRead::default())),
            (addr(2), Ok(paired(Some("Speaker")))),
        ];

        let snapshot = fold_devices(true, reads);
        assert_eq!(
            snapshot.paired_devices,
            vec![PairedDevice::new(addr(2).to_string()).with_name("Speaker")]
        );
        assert!(!snapshot.a2dp_routed);
    }

    #[test]
    fn test_failed_reads_skipped() {
        let reads = vec![
            (addr(1), Err(anyhow!("org.bluez.Error.Failed"))),
            (addr(2), Ok(paired(None))),
            (addr(3), Ok(connected(Some("Car Speakers"), &[A2DP_SINK_UUID]))),
        ];

        let snapshot = fold_devices(true, reads);
        let ids: Vec<String> = snapshot.paired_devices.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![addr(2).to_string(), addr(3).to_string()]);
        assert!(snapshot.a2dp_routed);
    }

    #[test]
    fn test_routed_needs_connected_a2dp_sink() {
        // Paired but disconnected sinks do not count.
        let idle = DeviceRead {
            uuids: [A2DP_SINK_UUID].into_iter().collect(),
            ..paired(Some("Headphones"))
        };
        let snapshot = fold_devices(true, vec![(addr(1), Ok(idle))]);
        assert!(!snapshot.a2dp_routed);

        // Connected without the sink service, e.g. a phone.
        let phone = connected(Some("Phone"), &[AUDIO_SOURCE_UUID]);
        let snapshot = fold_devices(true, vec![(addr(2), Ok(phone))]);
        assert!(!snapshot.a2dp_routed);

        let sink = connected(Some("Headphones"), &[AUDIO_SOURCE_UUID, A2DP_SINK_UUID]);
        let phone = connected(Some("Phone"), &[AUDIO_SOURCE_UUID]);
        let snapshot = fold_devices(true, vec![(addr(2), Ok(phone)), (addr(1), Ok(sink))]);
        assert!(snapshot.a2dp_routed);
        assert_eq!(snapshot.paired_devices.len(), 2);
    }

    #[test]
    fn test_no_devices() {
        let snapshot = fold_devices(true, Vec::new());
        assert!(!snapshot.a2dp_routed);
        assert!(snapshot.paired_devices.is_empty());
    }
}
