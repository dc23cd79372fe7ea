// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use crate::socket::SocketRef;
use std::fmt;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection_{}", self.0)
    }
}

/// A directed edge from an output socket to an input socket
#[derive(Debug, Clone)]
pub struct Connection {
    /// Unique connection ID
    pub(crate) id: ConnectionId,
    /// Output endpoint
    pub(crate) from: SocketRef,
    /// Input endpoint
    pub(crate) to: SocketRef,
    pub(crate) selected: bool,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, from: SocketRef, to: SocketRef) -> Self {
        Self {
            id,
            from,
            to,
            selected: false,
        }
    }

    /// Connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Output endpoint
    pub fn from(&self) -> SocketRef {
        self.from
    }

    /// Input endpoint
    pub fn to(&self) -> SocketRef {
        self.to
    }

    /// Whether the connection is selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }

    /// Check if this connection involves a specific socket
    pub fn involves_socket(&self, socket: SocketRef) -> bool {
        self.from == socket || self.to == socket
    }
}
