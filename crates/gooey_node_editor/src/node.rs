// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph.

use crate::socket::{Socket, SocketDirection};
use egui::{Pos2, Rect, Vec2};
use std::fmt;

/// Unique identifier for a node.
///
/// Issued by the owning [`Graph`](crate::Graph) from a monotonic counter and
/// never reused within that graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub(crate) id: NodeId,
    /// Title drawn in the header band
    pub title: String,
    /// Origin in editor-local coordinates
    pub position: Pos2,
    pub(crate) size: Vec2,
    pub(crate) sockets: Vec<Socket>,
    pub(crate) selected: bool,
}

impl Node {
    pub(crate) fn new(id: NodeId, title: impl Into<String>, position: Pos2, size: Vec2) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            size,
            sockets: Vec::new(),
            selected: false,
        }
    }

    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Bounding box in editor-local coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Whether the node is selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Get a socket by index
    pub fn socket(&self, index: usize) -> Option<&Socket> {
        self.sockets.get(index)
    }

    /// All sockets in creation order
    pub fn sockets(&self) -> &[Socket] {
        &self.sockets
    }

    /// Number of sockets
    pub fn socket_count(&self) -> usize {
        self.sockets.len()
    }

    /// Input sockets
    pub fn inputs(&self) -> impl Iterator<Item = &Socket> {
        self.sockets
            .iter()
            .filter(|s| s.direction == SocketDirection::Input)
    }

    /// Output sockets
    pub fn outputs(&self) -> impl Iterator<Item = &Socket> {
        self.sockets
            .iter()
            .filter(|s| s.direction == SocketDirection::Output)
    }

    /// Editor-local position of a socket
    pub fn socket_position(&self, index: usize) -> Option<Pos2> {
        self.sockets.get(index).map(|s| self.position + s.offset)
    }
}
