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

//! Line-oriented channel server.
//!
//! Reads one [`MethodCall`] per line and writes one [`MethodResponse`] per
//! call, in order.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::protocol::{MethodCall, MethodResponse, MethodResult, BAD_REQUEST};
use super::registry::ChannelRegistry;

/// Counters reported when a stream closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Calls answered, including rejected ones.
    pub calls: u64,
    /// Lines that could not be parsed.
    pub rejected: u64,
}

/// Default cap on a single request line, in bytes.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Serves a [`ChannelRegistry`] over a byte stream.
pub struct ChannelServer {
    registry: Arc<ChannelRegistry>,
    max_line_len: usize,
}

impl ChannelServer {
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self {
            registry,
            max_line_len: MAX_LINE_LEN,
        }
    }

    /// Set the longest request line accepted. Longer lines are rejected.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len.max(1);
        self
    }

    /// Answer a single request line.
    pub async fn handle_line(&self, line: &str) -> MethodResponse {
        match MethodCall::from_json(line) {
            Ok(call) => {
                let result = self.registry.dispatch(&call).await;
                MethodResponse::new(call.id, result)
            }
            Err(e) => {
                warn!("Rejected request: {}", e);
                MethodResponse::new(0, MethodResult::error(BAD_REQUEST, e.to_string()))
            }
        }
    }

    /// Answer a raw request line. Returns `None` for blank lines.
    async fn handle_bytes(&self, bytes: &[u8]) -> Option<MethodResponse> {
        match std::str::from_utf8(bytes) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                debug!("Received: {}", line);
                Some(self.handle_line(line).await)
            }
            Err(e) => {
                warn!("Rejected request: {}", e);
                Some(MethodResponse::new(
                    0,
                    MethodResult::error(BAD_REQUEST, format!("request is not valid UTF-8: {}", e)),
                ))
            }
        }
    }

    /// Serve requests until the reader reaches EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<ServeStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Channel server started");

        let mut stats = ServeStats::default();
        let mut line_buf = Vec::new();
        // Set while skipping the remainder of an oversized line.
        let mut discarding = false;

        loop {
            line_buf.clear();

            let read = (&mut reader)
                .take(self.max_line_len as u64)
                .read_until(b'\n', &mut line_buf)
                .await?;
            if read == 0 {
                info!("Channel closed by host");
                break;
            }

            let complete = line_buf.ends_with(b"\n");
            if discarding {
                discarding = !complete;
                continue;
            }

            let response = if !complete && line_buf.len() >= self.max_line_len {
                warn!("Rejected request longer than {} bytes", self.max_line_len);
                discarding = true;
                MethodResponse::new(
                    0,
                    MethodResult::error(
                        BAD_REQUEST,
                        format!("request line exceeds {} bytes", self.max_line_len),
                    ),
                )
            } else {
                match self.handle_bytes(&line_buf).await {
                    Some(response) => response,
                    None => continue,
                }
            };

            if matches!(&response.result, MethodResult::Error { code, .. } if code == BAD_REQUEST) {
                stats.rejected += 1;
            }
            stats.calls += 1;

            let response_json = response.to_json()?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.flush().await?;
        }

        info!(
            "Channel server stopped ({} calls, {} rejected)",
            stats.calls, stats.rejected
        );
        Ok(stats)
    }
}
