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

//! Audio output bridge entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audio_output_bridge::bluetooth::PlatformProbe;
use audio_output_bridge::channel::{ChannelServer, MethodCall, MethodResponse};
use audio_output_bridge::config::Config;
use audio_output_bridge::resolver::resolve_active_output_label;
use audio_output_bridge::{create_probe, create_registry};

#[derive(Parser)]
#[command(name = "audio-output-bridge")]
#[command(about = "Reports the active Bluetooth audio output over a method channel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the method channel over stdin/stdout
    Serve,
    /// Print the active output label
    Query,
    /// Print the captured platform snapshot as JSON
    Snapshot,
    /// Dispatch a single method call and print the response
    Call {
        /// Method name
        method: String,
        /// Channel to address (defaults to the configured channel)
        #[arg(long)]
        channel: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the channel, so logs go to stderr
    let directive = if cli.debug {
        "audio_output_bridge=debug"
    } else {
        "audio_output_bridge=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    info!(
        "Starting audio-output-bridge v{}...",
        env!("CARGO_PKG_VERSION")
    );

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!("Configuration loaded");

    let probe = create_probe(&config).await;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let registry = create_registry(&config, probe)?;
            let server = ChannelServer::new(registry);
            let stats = server
                .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
            info!("Served {} calls", stats.calls);
        }
        Commands::Query => {
            let snapshot = probe.snapshot().await;
            println!("{}", resolve_active_output_label(&snapshot));
        }
        Commands::Snapshot => {
            let snapshot = probe.snapshot().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Call { method, channel } => {
            let channel = channel.unwrap_or_else(|| config.channel.name.clone());
            let registry = create_registry(&config, probe)?;
            let call = MethodCall::new(method).on_channel(channel);
            let response = MethodResponse::new(call.id, registry.dispatch(&call).await);

            let mut stdout = tokio::io::stdout();
            stdout.write_all(response.to_json()?.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}
