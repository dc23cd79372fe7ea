// SPDX-License-Identifier: MIT OR Apache-2.0
//! Gooey node editor demo.
//!
//! Opens a window with a node editor filling the central panel and a small
//! sample graph. Set `GOOEY_NODE_EDITOR_CONFIG` to a RON file to override
//! the editor layout, and `RUST_LOG` to tune logging.

mod app;

use app::DemoApp;
use gooey_node_editor::EditorConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "GOOEY_NODE_EDITOR_CONFIG";

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gooey_node_editor=debug,gooey_node_editor_demo=debug,wgpu=warn,naga=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gooey node editor demo v{}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => match EditorConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load {}: {e}", path.to_string_lossy());
                std::process::exit(1);
            }
        },
        None => EditorConfig::default(),
    };

    if let Err(e) = DemoApp::run(config) {
        tracing::error!("Demo crashed: {e}");
        std::process::exit(1);
    }
}
