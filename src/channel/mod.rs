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

//! Method channel between the application layer and native code.
//!
//! The host sends named calls; each call gets exactly one result back.

mod handler;
pub mod protocol;
mod registry;
mod server;

pub use handler::{AudioOutputHandler, MethodCallHandler};
pub use protocol::{
    MethodCall, MethodResponse, MethodResult, AUDIO_OUTPUT_CHANNEL, BAD_REQUEST,
    GET_BLUETOOTH_DEVICE_NAME,
};
pub use registry::ChannelRegistry;
pub use server::{ChannelServer, ServeStats};
