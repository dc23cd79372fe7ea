// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer gesture state machine.
//!
//! An editor has exactly one active [`Gesture`]. Presses pick a target via
//! the spatial queries in [`hit_test`](crate::hit_test) and enter a gesture;
//! drags update it; releases finish it.
//!
//! All positions here are editor-local.

use crate::connection::ConnectionId;
use crate::graph::Graph;
use crate::hit_test::{find_connection_at, find_input_socket_at, find_node_at, find_socket_at};
use crate::node::NodeId;
use crate::render::CursorShape;
use crate::socket::{SocketDirection, SocketRef};
use egui::{Pos2, Vec2};

/// Active interaction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// Nothing in progress
    #[default]
    Idle,
    /// A node follows the pointer
    DraggingNode {
        /// Node being dragged
        node: NodeId,
        /// Pointer minus node origin at press time
        offset: Vec2,
    },
    /// The view is being panned
    Panning {
        /// Press position
        anchor: Pos2,
    },
    /// One socket picked, waiting for the second
    ConnectingFrom(SocketRef),
}

/// Structural interaction reported to the editor callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// A node was pressed and selected
    NodeSelected(NodeId),
    /// A connection was pressed and selected
    ConnectionSelected(ConnectionId),
    /// A gesture created (or re-confirmed) a connection
    Connected(ConnectionId),
}

/// Outcome of feeding one pointer event to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Whether the event was consumed
    pub consumed: bool,
    /// Event to report to the callback
    pub event: Option<EditorEvent>,
}

impl Transition {
    const IGNORED: Self = Self {
        consumed: false,
        event: None,
    };

    const CONSUMED: Self = Self {
        consumed: true,
        event: None,
    };

    fn with_event(event: EditorEvent) -> Self {
        Self {
            consumed: true,
            event: Some(event),
        }
    }
}

impl Gesture {
    /// Whether drag/release events belong to this editor regardless of
    /// where the pointer is
    pub fn captures_pointer(&self) -> bool {
        matches!(self, Self::DraggingNode { .. } | Self::Panning { .. })
    }

    /// Pending socket of a connect gesture
    pub fn pending_socket(&self) -> Option<SocketRef> {
        match self {
            Self::ConnectingFrom(socket) => Some(*socket),
            _ => None,
        }
    }

    /// Node being dragged
    pub fn dragged_node(&self) -> Option<NodeId> {
        match self {
            Self::DraggingNode { node, .. } => Some(*node),
            _ => None,
        }
    }

    /// Drop any reference to `node_id` before the node goes away
    pub(crate) fn forget_node(&mut self, node_id: NodeId) {
        let stale = match self {
            Self::DraggingNode { node, .. } => *node == node_id,
            Self::ConnectingFrom(socket) => socket.node == node_id,
            _ => false,
        };
        if stale {
            *self = Self::Idle;
        }
    }

    /// Pointer pressed at `point`.
    ///
    /// Sockets are tested before node bodies: sockets sit on the node edge,
    /// inside the node's box, and would otherwise be unreachable.
    pub fn press(&mut self, graph: &mut Graph, point: Pos2) -> Transition {
        if let Some(hit) = find_socket_at(graph, point) {
            return self.press_socket(graph, hit);
        }

        if let Some(node_id) = find_node_at(graph, point) {
            let Some(origin) = graph.node(node_id).map(|n| n.position) else {
                return Transition::IGNORED;
            };
            graph.select_node(node_id);
            *self = Self::DraggingNode {
                node: node_id,
                offset: point - origin,
            };
            tracing::debug!("Dragging {}", node_id);
            return Transition::with_event(EditorEvent::NodeSelected(node_id));
        }

        if let Some(connection_id) = find_connection_at(graph, point) {
            graph.select_connection(connection_id);
            *self = Self::Idle;
            return Transition::with_event(EditorEvent::ConnectionSelected(connection_id));
        }

        graph.deselect_all();
        *self = Self::Panning { anchor: point };
        Transition::CONSUMED
    }

    fn press_socket(&mut self, graph: &mut Graph, hit: SocketRef) -> Transition {
        let Some(pending) = self.pending_socket() else {
            *self = Self::ConnectingFrom(hit);
            tracing::debug!("Picked {} as connection start", hit);
            return Transition::CONSUMED;
        };

        // The first pick must be the output and the second the input.
        *self = Self::Idle;
        if direction_of(graph, pending) == Some(SocketDirection::Output)
            && direction_of(graph, hit) == Some(SocketDirection::Input)
        {
            if let Ok(id) = graph.connect(pending, hit) {
                return Transition::with_event(EditorEvent::Connected(id));
            }
        }
        Transition::CONSUMED
    }

    /// Pointer moved to `point` by `delta` with the button held
    pub fn drag(&mut self, graph: &mut Graph, point: Pos2, delta: Vec2, pan: &mut Vec2) -> Transition {
        match *self {
            Self::DraggingNode { node, offset } => match graph.node_mut(node) {
                Some(n) => {
                    n.position = point - offset;
                    Transition::CONSUMED
                }
                None => {
                    *self = Self::Idle;
                    Transition::IGNORED
                }
            },
            Self::Panning { .. } => {
                *pan += delta;
                Transition::CONSUMED
            }
            Self::Idle | Self::ConnectingFrom(_) => Transition::IGNORED,
        }
    }

    /// Pointer released at `point`.
    ///
    /// Releasing a pending output over another node's input completes the
    /// connection; releasing anywhere else keeps the socket pending so a
    /// second press can finish it.
    pub fn release(&mut self, graph: &mut Graph, point: Pos2) -> Transition {
        match *self {
            Self::DraggingNode { node, .. } => {
                tracing::debug!("Dropped {}", node);
                *self = Self::Idle;
                Transition::CONSUMED
            }
            Self::Panning { .. } => {
                *self = Self::Idle;
                Transition::CONSUMED
            }
            Self::ConnectingFrom(pending) => {
                let Some(target) = find_input_socket_at(graph, point) else {
                    return Transition::IGNORED;
                };
                if target.node == pending.node
                    || direction_of(graph, pending) != Some(SocketDirection::Output)
                {
                    return Transition::IGNORED;
                }
                *self = Self::Idle;
                match graph.connect(pending, target) {
                    Ok(id) => Transition::with_event(EditorEvent::Connected(id)),
                    Err(_) => Transition::CONSUMED,
                }
            }
            Self::Idle => Transition::IGNORED,
        }
    }

    /// Cursor for a pointer hovering at `point`
    pub fn cursor(&self, graph: &Graph, point: Pos2) -> CursorShape {
        if self.pending_socket().is_some()
            || find_socket_at(graph, point).is_some()
            || find_node_at(graph, point).is_some()
        {
            CursorShape::Crosshair
        } else if find_connection_at(graph, point).is_some() {
            CursorShape::Hand
        } else {
            CursorShape::Arrow
        }
    }
}

fn direction_of(graph: &Graph, socket: SocketRef) -> Option<SocketDirection> {
    graph.socket(socket).map(|s| s.direction())
}
