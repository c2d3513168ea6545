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

//! Method channel wire types and serialization.
//!
//! Calls and responses travel as one JSON object per line.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel the audio output handler is registered on.
pub const AUDIO_OUTPUT_CHANNEL: &str = "audio_output";

/// Method returning the active output device label.
pub const GET_BLUETOOTH_DEVICE_NAME: &str = "getBluetoothDeviceName";

/// Error code for request lines that cannot be parsed.
pub const BAD_REQUEST: &str = "bad_request";

fn default_channel() -> String {
    AUDIO_OUTPUT_CHANNEL.to_string()
}

/// A named request sent by the application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Correlation id, echoed in the response.
    #[serde(default)]
    pub id: u64,

    /// Channel the call is addressed to.
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Method name.
    pub method: String,

    /// Method arguments, `null` when there are none.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub arguments: Value,
}

impl MethodCall {
    /// Create a call without arguments on the audio output channel.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: 0,
            channel: default_channel(),
            method: method.into(),
            arguments: Value::Null,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn on_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = arguments;
        self
    }

    /// Serialize to JSON string with newline delimiter.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }

    /// Parse from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let call: Self = serde_json::from_str(json.trim())?;
        Ok(call)
    }
}

/// Outcome of a method call.
///
/// `NotImplemented` is distinct from both success and error: the receiving
/// side has no handler for the method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    Success {
        value: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResult {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }

    /// The success value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Success { value } => value.as_str(),
            _ => None,
        }
    }
}

/// Response to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse {
    pub id: u64,

    #[serde(flatten)]
    pub result: MethodResult,
}

impl MethodResponse {
    pub fn new(id: u64, result: MethodResult) -> Self {
        Self { id, result }
    }

    /// Serialize to JSON string with newline delimiter.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }

    /// Parse from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let response: Self = serde_json::from_str(json.trim())?;
        Ok(response)
    }
}
