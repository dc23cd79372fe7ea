// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use crate::node::NodeId;
use egui::Vec2;
use std::fmt;

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketDirection {
    /// Input socket (drawn on the left edge)
    Input,
    /// Output socket (drawn on the right edge)
    Output,
}

/// Data kind carried by a socket.
///
/// Only used for display; connections are validated by direction alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Floating point value
    Float,
    /// Integer value
    Int,
    /// Boolean value
    Bool,
    /// String value
    String,
    /// Anything else
    Custom,
}

impl DataKind {
    /// Type tag drawn next to the socket name
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bool => "<Bool>",
            Self::Int => "<Int>",
            Self::Float => "<Float>",
            Self::String => "<String>",
            Self::Custom => "<Undefined>",
        }
    }
}

/// Address of a socket: owning node plus index in that node's socket list.
///
/// Sockets are never removed individually, so the index is stable for the
/// lifetime of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketRef {
    /// Owning node
    pub node: NodeId,
    /// Index within the node
    pub index: usize,
}

impl SocketRef {
    /// Create a new socket reference
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/socket_{}", self.node, self.index)
    }
}

/// A socket on a node
#[derive(Debug, Clone)]
pub struct Socket {
    /// Index within the owning node
    pub(crate) index: usize,
    /// Display name
    pub name: String,
    pub(crate) direction: SocketDirection,
    /// Data kind
    pub kind: DataKind,
    /// Position relative to the owning node's origin
    pub(crate) offset: Vec2,
    /// Cached "referenced by a connection" flag
    pub(crate) connected: bool,
    pub(crate) owner: NodeId,
}

impl Socket {
    pub(crate) fn new(
        owner: NodeId,
        index: usize,
        name: impl Into<String>,
        direction: SocketDirection,
        kind: DataKind,
        offset: Vec2,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            direction,
            kind,
            offset,
            connected: false,
            owner,
        }
    }

    /// Identifier, stable within the owning node
    pub fn id(&self) -> String {
        format!("socket_{}", self.index)
    }

    /// Reference to this socket
    pub fn socket_ref(&self) -> SocketRef {
        SocketRef::new(self.owner, self.index)
    }

    /// Socket direction, fixed at creation
    pub fn direction(&self) -> SocketDirection {
        self.direction
    }

    /// Position relative to the owning node, fixed at creation
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Whether any connection references this socket
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Owning node
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Check if a connection from this socket to `other` has valid directions
    pub fn can_connect_to(&self, other: &Socket) -> bool {
        self.direction == SocketDirection::Output && other.direction == SocketDirection::Input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(DataKind::Bool.tag(), "<Bool>");
        assert_eq!(DataKind::Int.tag(), "<Int>");
        assert_eq!(DataKind::Float.tag(), "<Float>");
        assert_eq!(DataKind::String.tag(), "<String>");
        assert_eq!(DataKind::Custom.tag(), "<Undefined>");
    }

    #[test]
    fn test_direction_check() {
        let node = NodeId(0);
        let out = Socket::new(node, 0, "out", SocketDirection::Output, DataKind::Float, Vec2::ZERO);
        let inp = Socket::new(node, 1, "in", SocketDirection::Input, DataKind::Int, Vec2::ZERO);
        assert!(out.can_connect_to(&inp));
        assert!(!inp.can_connect_to(&out));
        assert!(!out.can_connect_to(&out));
    }

    #[test]
    fn test_ids() {
        let socket = Socket::new(NodeId(3), 2, "x", SocketDirection::Input, DataKind::Bool, Vec2::ZERO);
        assert_eq!(socket.id(), "socket_2");
        assert_eq!(socket.socket_ref().to_string(), "node_3/socket_2");
    }
}
