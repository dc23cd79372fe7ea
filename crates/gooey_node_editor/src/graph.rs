// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph store containing nodes and connections.
//!
//! Nodes and connections live in insertion-ordered maps. Storage order is the
//! draw order and the tie-break order for hit-testing, so every removal uses
//! `shift_remove` to keep the survivors in their relative order.

use crate::config::EditorConfig;
use crate::connection::{Connection, ConnectionId};
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId};
use crate::socket::{DataKind, Socket, SocketDirection, SocketRef};
use egui::{Pos2, Vec2};
use indexmap::IndexMap;

/// A node graph
#[derive(Debug, Clone)]
pub struct Graph {
    config: EditorConfig,
    nodes: IndexMap<NodeId, Node>,
    connections: IndexMap<ConnectionId, Connection>,
    next_node_id: u64,
    next_connection_id: u64,
}

impl Graph {
    /// Create a new empty graph laid out with `config`
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            next_node_id: 0,
            next_connection_id: 0,
        }
    }

    /// Layout configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Add a node, clamping its size to the configured minimum
    pub fn add_node(&mut self, title: &str, x: f32, y: f32, width: f32, height: f32) -> Result<NodeId> {
        if title.is_empty() {
            tracing::warn!("Refusing to add node without a title");
            return Err(GraphError::InvalidArgument("node title is empty"));
        }
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            tracing::warn!("Refusing to add node '{}' with non-finite geometry", title);
            return Err(GraphError::InvalidArgument("node geometry is not finite"));
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let size = Vec2::new(
            width.max(self.config.min_node_width),
            height.max(self.config.min_node_height),
        );
        self.nodes.insert(id, Node::new(id, title, Pos2::new(x, y), size));
        tracing::debug!("Added {} '{}' at ({}, {}) size {:?}", id, title, x, y, size);
        Ok(id)
    }

    /// Append a socket to a node, growing the node to fit
    pub fn add_socket(
        &mut self,
        node_id: NodeId,
        name: &str,
        direction: SocketDirection,
        kind: DataKind,
    ) -> Result<SocketRef> {
        if name.is_empty() {
            tracing::warn!("Refusing to add unnamed socket to {}", node_id);
            return Err(GraphError::InvalidArgument("socket name is empty"));
        }
        let config = &self.config;
        let Some(node) = self.nodes.get_mut(&node_id) else {
            tracing::warn!("Cannot add socket '{}': {} does not exist", name, node_id);
            return Err(GraphError::NodeNotFound(node_id));
        };

        let index = node.sockets.len();
        let required = config.header_height
            + (index + 1) as f32 * config.socket_spacing
            + config.socket_margin;
        if node.size.y < required {
            node.size.y = required;
        }

        let x = match direction {
            SocketDirection::Input => 0.0,
            SocketDirection::Output => node.size.x,
        };
        let y = config.header_height + index as f32 * config.socket_spacing + config.socket_offset;
        node.sockets
            .push(Socket::new(node_id, index, name, direction, kind, Vec2::new(x, y)));

        tracing::debug!("Added {:?} socket '{}' to {}", direction, name, node_id);
        Ok(SocketRef::new(node_id, index))
    }

    /// Remove a node and every connection touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(&node_id) {
            return None;
        }

        let mut touched = Vec::new();
        self.connections.retain(|_, c| {
            if c.involves_node(node_id) {
                touched.push(c.from);
                touched.push(c.to);
                false
            } else {
                true
            }
        });

        let node = self.nodes.shift_remove(&node_id)?;
        for socket in touched.into_iter().filter(|s| s.node != node_id) {
            self.refresh_connected(socket);
        }

        tracing::debug!("Removed {} '{}'", node_id, node.title);
        Some(node)
    }

    /// Explicitly resize a node, clamped to the configured minimum.
    ///
    /// Socket positions are fixed at creation and are not moved.
    pub fn resize_node(&mut self, node_id: NodeId, width: f32, height: f32) -> Result<()> {
        if !(width.is_finite() && height.is_finite()) {
            return Err(GraphError::InvalidArgument("node size is not finite"));
        }
        let (min_w, min_h) = (self.config.min_node_width, self.config.min_node_height);
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        node.size = Vec2::new(width.max(min_w), height.max(min_h));
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in storage order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in storage order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve a socket reference
    pub fn socket(&self, socket: SocketRef) -> Option<&Socket> {
        self.nodes.get(&socket.node)?.socket(socket.index)
    }

    /// Editor-local position of a socket
    pub fn socket_position(&self, socket: SocketRef) -> Option<Pos2> {
        self.nodes.get(&socket.node)?.socket_position(socket.index)
    }

    /// Connect an output socket to an input socket.
    ///
    /// Returns the existing connection if the pair is already connected. An
    /// input that is already fed keeps its connection, re-pointed at `from`.
    pub fn connect(&mut self, from: SocketRef, to: SocketRef) -> Result<ConnectionId> {
        let source = self.socket(from).ok_or(GraphError::SocketNotFound(from))?;
        let target = self.socket(to).ok_or(GraphError::SocketNotFound(to))?;

        if !source.can_connect_to(target) {
            tracing::warn!("Rejected connection {} -> {}: wrong direction", from, to);
            return Err(GraphError::WrongDirection);
        }
        if from.node == to.node {
            tracing::warn!("Rejected connection {} -> {}: self-loop", from, to);
            return Err(GraphError::SelfLoop(from.node));
        }

        if let Some(existing) = self
            .connections
            .values()
            .find(|c| c.from == from && c.to == to)
        {
            return Ok(existing.id);
        }

        // An input takes a single connection: re-point the one feeding it.
        if let Some(existing) = self.connections.values_mut().find(|c| c.to == to) {
            let (id, previous) = (existing.id, existing.from);
            existing.from = from;
            self.refresh_connected(previous);
            self.set_connected(from, true);
            tracing::debug!("Rewired {} from {} to {}", id, previous, from);
            return Ok(id);
        }

        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;
        self.connections.insert(id, Connection::new(id, from, to));
        self.set_connected(from, true);
        self.set_connected(to, true);

        tracing::debug!("Connected {} -> {} as {}", from, to, id);
        Ok(id)
    }

    /// Connect two sockets in whichever order makes an output-to-input edge
    pub fn try_connect(&mut self, a: SocketRef, b: SocketRef) -> Result<ConnectionId> {
        let a_is_output = self
            .socket(a)
            .ok_or(GraphError::SocketNotFound(a))?
            .direction()
            == SocketDirection::Output;
        if a_is_output {
            self.connect(a, b)
        } else {
            self.connect(b, a)
        }
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.shift_remove(&connection_id)?;
        self.refresh_connected(connection.from);
        self.refresh_connected(connection.to);
        tracing::debug!("Removed {}", connection_id);
        Some(connection)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections in storage order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Remove every node and connection
    pub fn clear(&mut self) {
        let (nodes, connections) = (self.nodes.len(), self.connections.len());
        self.connections.clear();
        self.nodes.clear();
        tracing::debug!("Cleared {} nodes and {} connections", nodes, connections);
    }

    /// Select exactly one node
    pub fn select_node(&mut self, node_id: NodeId) {
        self.deselect_all();
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.selected = true;
        }
    }

    /// Select exactly one connection
    pub fn select_connection(&mut self, connection_id: ConnectionId) {
        self.deselect_all();
        if let Some(connection) = self.connections.get_mut(&connection_id) {
            connection.selected = true;
        }
    }

    /// Clear node and connection selection
    pub fn deselect_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        for connection in self.connections.values_mut() {
            connection.selected = false;
        }
    }

    /// Currently selected node, if any
    pub fn selected_node(&self) -> Option<NodeId> {
        self.nodes.values().find(|n| n.selected).map(|n| n.id)
    }

    /// Currently selected connection, if any
    pub fn selected_connection(&self) -> Option<ConnectionId> {
        self.connections.values().find(|c| c.selected).map(|c| c.id)
    }

    fn set_connected(&mut self, socket: SocketRef, connected: bool) {
        if let Some(s) = self
            .nodes
            .get_mut(&socket.node)
            .and_then(|n| n.sockets.get_mut(socket.index))
        {
            s.connected = connected;
        }
    }

    fn refresh_connected(&mut self, socket: SocketRef) {
        let connected = self.connections.values().any(|c| c.involves_socket(socket));
        self.set_connected(socket, connected);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(graph: &mut Graph) -> (SocketRef, SocketRef) {
        let a = graph.add_node("A", 50.0, 50.0, 150.0, 80.0).unwrap();
        let b = graph.add_node("B", 300.0, 50.0, 150.0, 80.0).unwrap();
        let out = graph.add_socket(a, "out", SocketDirection::Output, DataKind::Float).unwrap();
        let inp = graph.add_socket(b, "in", SocketDirection::Input, DataKind::Float).unwrap();
        (out, inp)
    }

    #[test]
    fn test_add_node_assigns_increasing_ids() {
        let mut graph = Graph::default();
        let a = graph.add_node("A", 0.0, 0.0, 100.0, 100.0).unwrap();
        let b = graph.add_node("B", 0.0, 0.0, 100.0, 100.0).unwrap();
        assert!(b > a);
        assert_eq!(a.to_string(), "node_0");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_add_node_clamps_size() {
        let mut graph = Graph::default();
        let id = graph.add_node("tiny", 0.0, 0.0, -5.0, 1.0).unwrap();
        let size = graph.node(id).unwrap().size();
        assert_eq!(size.x, graph.config().min_node_width);
        assert_eq!(size.y, graph.config().min_node_height);
    }

    #[test]
    fn test_add_node_rejects_bad_input() {
        let mut graph = Graph::default();
        assert_eq!(
            graph.add_node("", 0.0, 0.0, 100.0, 100.0),
            Err(GraphError::InvalidArgument("node title is empty"))
        );
        assert!(graph.add_node("nan", f32::NAN, 0.0, 100.0, 100.0).is_err());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_socket_layout() {
        let mut graph = Graph::default();
        let id = graph.add_node("A", 10.0, 10.0, 150.0, 40.0).unwrap();
        let input = graph.add_socket(id, "in", SocketDirection::Input, DataKind::Int).unwrap();
        let output = graph.add_socket(id, "out", SocketDirection::Output, DataKind::Int).unwrap();

        let node = graph.node(id).unwrap();
        assert_eq!(node.socket(input.index).unwrap().offset(), Vec2::new(0.0, 45.0));
        assert_eq!(node.socket(output.index).unwrap().offset(), Vec2::new(150.0, 65.0));
        assert_eq!(node.socket(1).unwrap().id(), "socket_1");
        // 25 + 2 * 20 + 10
        assert_eq!(node.size().y, 75.0);
    }

    #[test]
    fn test_socket_growth_never_shrinks() {
        let mut graph = Graph::default();
        let id = graph.add_node("tall", 0.0, 0.0, 100.0, 300.0).unwrap();
        graph.add_socket(id, "a", SocketDirection::Input, DataKind::Bool).unwrap();
        assert_eq!(graph.node(id).unwrap().size().y, 300.0);
    }

    #[test]
    fn test_add_socket_failures_leave_node_untouched() {
        let mut graph = Graph::default();
        let id = graph.add_node("A", 0.0, 0.0, 100.0, 100.0).unwrap();
        assert!(graph.add_socket(id, "", SocketDirection::Input, DataKind::Int).is_err());
        assert_eq!(
            graph.add_socket(NodeId(99), "x", SocketDirection::Input, DataKind::Int),
            Err(GraphError::NodeNotFound(NodeId(99)))
        );
        assert_eq!(graph.node(id).unwrap().socket_count(), 0);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        let first = graph.connect(out, inp).unwrap();
        let second = graph.connect(out, inp).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.socket(out).unwrap().is_connected());
        assert!(graph.socket(inp).unwrap().is_connected());
    }

    #[test]
    fn test_connect_rejects_wrong_direction() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        assert_eq!(graph.connect(inp, out), Err(GraphError::WrongDirection));
        assert_eq!(graph.connect(out, out), Err(GraphError::WrongDirection));
        assert_eq!(graph.connection_count(), 0);
        assert!(!graph.socket(out).unwrap().is_connected());
    }

    #[test]
    fn test_connect_rejects_self_loop() {
        let mut graph = Graph::default();
        let id = graph.add_node("A", 0.0, 0.0, 100.0, 100.0).unwrap();
        let out = graph.add_socket(id, "out", SocketDirection::Output, DataKind::Int).unwrap();
        let inp = graph.add_socket(id, "in", SocketDirection::Input, DataKind::Int).unwrap();
        assert_eq!(graph.connect(out, inp), Err(GraphError::SelfLoop(id)));
    }

    #[test]
    fn test_connect_missing_socket() {
        let mut graph = Graph::default();
        let (out, _) = pair(&mut graph);
        let ghost = SocketRef::new(NodeId(42), 0);
        assert_eq!(graph.connect(out, ghost), Err(GraphError::SocketNotFound(ghost)));
    }

    #[test]
    fn test_try_connect_accepts_either_order() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        let id = graph.try_connect(inp, out).unwrap();
        let connection = graph.connection(id).unwrap();
        assert_eq!(connection.from(), out);
        assert_eq!(connection.to(), inp);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        let c = graph.add_node("C", 600.0, 50.0, 150.0, 80.0).unwrap();
        let c_in = graph.add_socket(c, "in", SocketDirection::Input, DataKind::Float).unwrap();
        graph.connect(out, inp).unwrap();
        graph.connect(out, c_in).unwrap();
        assert_eq!(graph.connection_count(), 2);

        let removed = graph.remove_node(out.node).unwrap();
        assert_eq!(removed.title, "A");
        assert_eq!(graph.connection_count(), 0);
        assert!(!graph.socket(inp).unwrap().is_connected());
        assert!(!graph.socket(c_in).unwrap().is_connected());
    }

    #[test]
    fn test_remove_node_keeps_other_connections_flagged() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        let c = graph.add_node("C", 600.0, 50.0, 150.0, 80.0).unwrap();
        let c_in = graph.add_socket(c, "in", SocketDirection::Input, DataKind::Float).unwrap();
        graph.connect(out, inp).unwrap();
        graph.connect(out, c_in).unwrap();

        graph.remove_node(inp.node);
        assert_eq!(graph.connection_count(), 1);
        // still feeding C
        assert!(graph.socket(out).unwrap().is_connected());
    }

    #[test]
    fn test_connect_rewires_fed_input() {
        let mut graph = Graph::default();
        let (a_out, inp) = pair(&mut graph);
        let c = graph.add_node("C", 50.0, 300.0, 150.0, 80.0).unwrap();
        let c_out = graph.add_socket(c, "out", SocketDirection::Output, DataKind::Float).unwrap();

        let first = graph.connect(a_out, inp).unwrap();
        let second = graph.connect(c_out, inp).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.connection_count(), 1);
        assert_eq!(graph.connection(first).unwrap().from(), c_out);
        assert!(!graph.socket(a_out).unwrap().is_connected());
        assert!(graph.socket(c_out).unwrap().is_connected());
        assert!(graph.socket(inp).unwrap().is_connected());
    }

    #[test]
    fn test_rewire_keeps_other_fan_out_flagged() {
        let mut graph = Graph::default();
        let (a_out, inp) = pair(&mut graph);
        let d = graph.add_node("D", 600.0, 50.0, 150.0, 80.0).unwrap();
        let d_in = graph.add_socket(d, "in", SocketDirection::Input, DataKind::Float).unwrap();
        let c = graph.add_node("C", 50.0, 300.0, 150.0, 80.0).unwrap();
        let c_out = graph.add_socket(c, "out", SocketDirection::Output, DataKind::Float).unwrap();

        graph.connect(a_out, inp).unwrap();
        graph.connect(a_out, d_in).unwrap();
        graph.connect(c_out, inp).unwrap();
        assert_eq!(graph.connection_count(), 2);
        // still feeding D
        assert!(graph.socket(a_out).unwrap().is_connected());
    }

    #[test]
    fn test_remove_node_preserves_order() {
        let mut graph = Graph::default();
        let ids: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| graph.add_node(t, 0.0, 0.0, 100.0, 100.0).unwrap())
            .collect();
        graph.remove_node(ids[1]);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![ids[0], ids[2], ids[3]]);
        assert!(graph.remove_node(ids[1]).is_none());
    }

    #[test]
    fn test_remove_connection_clears_flags() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        let id = graph.connect(out, inp).unwrap();
        assert!(graph.remove_connection(id).is_some());
        assert!(graph.remove_connection(id).is_none());
        assert!(!graph.socket(out).unwrap().is_connected());
        assert!(!graph.socket(inp).unwrap().is_connected());
    }

    #[test]
    fn test_clear() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        graph.connect(out, inp).unwrap();
        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.connection_count(), 0);
        // ids keep increasing after a clear
        let id = graph.add_node("again", 0.0, 0.0, 100.0, 100.0).unwrap();
        assert_eq!(id, NodeId(2));
    }

    #[test]
    fn test_resize_then_sockets_keep_explicit_height() {
        let mut graph = Graph::default();
        let id = graph.add_node("A", 0.0, 0.0, 100.0, 80.0).unwrap();
        graph.resize_node(id, 100.0, 300.0).unwrap();

        // required height is 25 + n * 20 + 10, which passes 300 at the 14th socket
        for n in 1..=13 {
            graph.add_socket(id, "s", SocketDirection::Input, DataKind::Int).unwrap();
            assert_eq!(graph.node(id).unwrap().size().y, 300.0, "after {n} sockets");
        }
        graph.add_socket(id, "s", SocketDirection::Input, DataKind::Int).unwrap();
        assert_eq!(graph.node(id).unwrap().size().y, 315.0);
    }

    #[test]
    fn test_resize_node() {
        let mut graph = Graph::default();
        let id = graph.add_node("A", 0.0, 0.0, 100.0, 100.0).unwrap();
        graph.resize_node(id, 200.0, 10.0).unwrap();
        assert_eq!(graph.node(id).unwrap().size(), Vec2::new(200.0, 40.0));
        assert_eq!(
            graph.resize_node(NodeId(7), 1.0, 1.0),
            Err(GraphError::NodeNotFound(NodeId(7)))
        );
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut graph = Graph::default();
        let (out, inp) = pair(&mut graph);
        let conn = graph.connect(out, inp).unwrap();

        graph.select_node(out.node);
        graph.select_node(inp.node);
        assert_eq!(graph.selected_node(), Some(inp.node));
        assert!(!graph.node(out.node).unwrap().is_selected());

        graph.select_connection(conn);
        assert_eq!(graph.selected_node(), None);
        assert_eq!(graph.selected_connection(), Some(conn));
    }
}
