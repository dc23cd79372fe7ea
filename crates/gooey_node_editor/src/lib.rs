// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node-graph editor widget for the Gooey toolkit.
//!
//! The widget lets users place titled nodes carrying typed input/output
//! sockets on a canvas, wire outputs to inputs, drag nodes and pan the view.
//!
//! ## Architecture
//!
//! - [`Graph`]: node and connection store with socket layout
//! - [`hit_test`]: spatial queries over editor-local coordinates
//! - [`Gesture`]: pointer state machine (press, drag, release, hover)
//! - [`render`]: translation of editor state into [`Backend`] draw calls
//! - [`NodeEditor`] / [`EditorHost`]: widget envelope and window dispatch
//!
//! Layout constants come from [`EditorConfig`], which can be loaded from RON.

#![deny(missing_docs)]

pub mod config;
pub mod connection;
pub mod editor;
pub mod egui_backend;
pub mod error;
pub mod gesture;
pub mod graph;
pub mod host;
pub mod node;
pub mod path;
pub mod render;
pub mod socket;

pub use config::{ConnectionStyle, EditorConfig};
pub use connection::{Connection, ConnectionId};
pub use editor::{EditorCallback, NodeEditor, WidgetCore};
pub use egui_backend::{feed_input, EguiBackend};
pub use error::{ConfigError, GraphError};
pub use gesture::{EditorEvent, Gesture};
pub use graph::Graph;
pub use host::EditorHost;
pub use node::{Node, NodeId};
pub use render::{Backend, CursorShape, Palette};
pub use socket::{DataKind, Socket, SocketDirection, SocketRef};
