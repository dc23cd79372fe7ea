// SPDX-License-Identifier: MIT OR Apache-2.0
//! The node editor widget.
//!
//! [`NodeEditor`] owns a [`Graph`] and a [`Gesture`] and translates window
//! pointer events into editor-local operations on them.

use crate::config::{EditorConfig, MIN_GRID_SIZE};
use crate::connection::{Connection, ConnectionId};
use crate::error::{GraphError, Result};
use crate::gesture::{EditorEvent, Gesture, Transition};
use crate::graph::Graph;
use crate::node::{Node, NodeId};
use crate::render::{draw_editor, Backend, CursorShape, Palette};
use crate::socket::{DataKind, SocketDirection, SocketRef};
use egui::{Pos2, Rect, Vec2};
use std::fmt;

/// Position, size and input flags shared by every widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetCore {
    /// Left edge in window coordinates
    pub x: f32,
    /// Top edge in window coordinates
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Hidden widgets neither draw nor take input
    pub visible: bool,
    /// Disabled widgets still draw but ignore pointer events
    pub input_enabled: bool,
}

impl WidgetCore {
    /// Create a visible, input-enabled envelope
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            visible: true,
            input_enabled: true,
        }
    }

    /// Top-left corner in window coordinates
    pub fn origin(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    /// Bounds in window coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.origin(), Vec2::new(self.width, self.height))
    }

    /// Whether `point` lies inside the bounds grown by `margin` on every side
    pub fn contains(&self, point: Pos2, margin: f32) -> bool {
        point.x >= self.x - margin
            && point.x <= self.x + self.width + margin
            && point.y >= self.y - margin
            && point.y <= self.y + self.height + margin
    }
}

/// Callback fired on structural interactions
pub type EditorCallback = Box<dyn FnMut(&EditorEvent)>;

/// Interactive node-graph editor
pub struct NodeEditor {
    /// Widget envelope
    pub core: WidgetCore,
    graph: Graph,
    gesture: Gesture,
    grid_size: f32,
    show_grid: bool,
    zoom_level: f32,
    pan: Vec2,
    pointer: Option<Pos2>,
    hovered: bool,
    cursor: CursorShape,
    palette: Palette,
    callback: Option<EditorCallback>,
}

impl fmt::Debug for NodeEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEditor")
            .field("core", &self.core)
            .field("nodes", &self.graph.node_count())
            .field("connections", &self.graph.connection_count())
            .field("gesture", &self.gesture)
            .field("pan", &self.pan)
            .field("zoom_level", &self.zoom_level)
            .finish_non_exhaustive()
    }
}

impl NodeEditor {
    /// Create an editor with the default configuration
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::with_config(x, y, width, height, EditorConfig::default())
    }

    /// Create an editor with a custom configuration
    pub fn with_config(x: f32, y: f32, width: f32, height: f32, config: EditorConfig) -> Self {
        tracing::info!("Created node editor at ({x}, {y}) size {width}x{height}");
        Self {
            core: WidgetCore::new(x, y, width, height),
            grid_size: config.grid_size.max(MIN_GRID_SIZE),
            show_grid: config.show_grid,
            graph: Graph::new(config),
            gesture: Gesture::Idle,
            zoom_level: 1.0,
            pan: Vec2::ZERO,
            pointer: None,
            hovered: false,
            cursor: CursorShape::Arrow,
            palette: Palette::default(),
            callback: None,
        }
    }

    /// Builder form of [`set_callback`](Self::set_callback)
    #[must_use]
    pub fn with_callback(mut self, callback: impl FnMut(&EditorEvent) + 'static) -> Self {
        self.set_callback(callback);
        self
    }

    /// Set the callback fired on selections and new connections
    pub fn set_callback(&mut self, callback: impl FnMut(&EditorEvent) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Remove the callback
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    // Graph operations

    /// Add a node, see [`Graph::add_node`]
    pub fn add_node(&mut self, title: &str, x: f32, y: f32, width: f32, height: f32) -> Result<NodeId> {
        self.graph.add_node(title, x, y, width, height)
    }

    /// Append a socket to a node, see [`Graph::add_socket`]
    pub fn add_socket(
        &mut self,
        node_id: NodeId,
        name: &str,
        direction: SocketDirection,
        kind: DataKind,
    ) -> Result<SocketRef> {
        self.graph.add_socket(node_id, name, direction, kind)
    }

    /// Remove a node with its connections, ending any gesture that targets it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.gesture.forget_node(node_id);
        self.graph.remove_node(node_id)
    }

    /// Resize a node, clamped to the configured minimum
    pub fn resize_node(&mut self, node_id: NodeId, width: f32, height: f32) -> Result<()> {
        self.graph.resize_node(node_id, width, height)
    }

    /// Connect an output socket to an input socket
    pub fn connect(&mut self, from: SocketRef, to: SocketRef) -> Result<ConnectionId> {
        self.graph.connect(from, to)
    }

    /// Connect two sockets in either order
    pub fn try_connect(&mut self, a: SocketRef, b: SocketRef) -> Result<ConnectionId> {
        self.graph.try_connect(a, b)
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.graph.remove_connection(connection_id)
    }

    /// Remove every node and connection
    pub fn clear(&mut self) {
        self.gesture = Gesture::Idle;
        self.graph.clear();
    }

    // Accessors

    /// Underlying graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Active gesture
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of connections
    pub fn connection_count(&self) -> usize {
        self.graph.connection_count()
    }

    /// Whether `node_id` is being dragged
    pub fn is_dragging(&self, node_id: NodeId) -> bool {
        self.gesture.dragged_node() == Some(node_id)
    }

    /// Node being dragged, if any
    pub fn dragging_node(&self) -> Option<NodeId> {
        self.gesture.dragged_node()
    }

    /// Whether the view is being panned
    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Press position of the current pan
    pub fn pan_anchor(&self) -> Option<Pos2> {
        match self.gesture {
            Gesture::Panning { anchor } => Some(anchor),
            _ => None,
        }
    }

    /// Socket waiting for the second click of a connect gesture
    pub fn dragging_socket(&self) -> Option<SocketRef> {
        self.gesture.pending_socket()
    }

    /// Accumulated pan offset. Not applied to drawing or hit-testing.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Stored zoom factor
    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    /// Set the zoom factor, rejecting non-positive values
    pub fn set_zoom_level(&mut self, zoom_level: f32) -> Result<()> {
        if !zoom_level.is_finite() || zoom_level <= 0.0 {
            tracing::warn!("Rejected zoom level {}", zoom_level);
            return Err(GraphError::InvalidArgument("zoom level must be positive"));
        }
        self.zoom_level = zoom_level;
        Ok(())
    }

    /// Grid spacing in pixels
    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Set the grid spacing, rejecting anything below one pixel
    pub fn set_grid_size(&mut self, grid_size: f32) -> Result<()> {
        if !grid_size.is_finite() || grid_size < MIN_GRID_SIZE {
            tracing::warn!("Rejected grid size {}", grid_size);
            return Err(GraphError::InvalidArgument("grid size must be at least one pixel"));
        }
        self.grid_size = grid_size;
        Ok(())
    }

    /// Whether the grid is drawn
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Show or hide the grid
    pub fn set_show_grid(&mut self, show_grid: bool) {
        self.show_grid = show_grid;
    }

    /// Last pointer position seen by the editor, editor-local
    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    /// Whether the pointer was inside the editor on the last hover
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Cursor chosen by the last hover
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Colors used for drawing
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Replace the drawing colors
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    // Input

    fn accepts_input(&self) -> bool {
        self.core.visible && self.core.input_enabled
    }

    fn local(&self, x: f32, y: f32) -> Pos2 {
        Pos2::new(x - self.core.x, y - self.core.y)
    }

    fn in_bounds(&self, x: f32, y: f32) -> bool {
        self.core.contains(Pos2::new(x, y), self.graph.config().editor_margin)
    }

    fn finish(&mut self, transition: Transition) -> bool {
        if let (Some(event), Some(callback)) = (transition.event, self.callback.as_mut()) {
            callback(&event);
        }
        transition.consumed
    }

    /// Pointer pressed at window coordinates
    pub fn handle_click(&mut self, x: f32, y: f32) -> bool {
        if !self.accepts_input() || !self.in_bounds(x, y) {
            return false;
        }
        let point = self.local(x, y);
        self.pointer = Some(point);
        let transition = self.gesture.press(&mut self.graph, point);
        self.finish(transition)
    }

    /// Pointer moved by `(dx, dy)` to window coordinates with the button held
    pub fn handle_drag(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> bool {
        if !self.accepts_input() || !(self.gesture.captures_pointer() || self.in_bounds(x, y)) {
            return false;
        }
        let point = self.local(x, y);
        self.pointer = Some(point);
        let transition = self
            .gesture
            .drag(&mut self.graph, point, Vec2::new(dx, dy), &mut self.pan);
        self.finish(transition)
    }

    /// Pointer released at window coordinates
    pub fn handle_release(&mut self, x: f32, y: f32) -> bool {
        if !self.accepts_input() || !(self.gesture.captures_pointer() || self.in_bounds(x, y)) {
            return false;
        }
        let point = self.local(x, y);
        self.pointer = Some(point);
        let transition = self.gesture.release(&mut self.graph, point);
        self.finish(transition)
    }

    /// Pointer moved to window coordinates with no button held.
    ///
    /// Only updates the cursor and the preview pointer.
    pub fn handle_hover(&mut self, x: f32, y: f32) -> bool {
        if !self.accepts_input() || !self.in_bounds(x, y) {
            self.hovered = false;
            return false;
        }
        let point = self.local(x, y);
        self.pointer = Some(point);
        self.hovered = true;
        self.cursor = self.gesture.cursor(&self.graph, point);
        true
    }

    /// Forget hover state once the pointer has left the window
    pub fn clear_hover(&mut self) {
        self.hovered = false;
        self.cursor = CursorShape::Arrow;
    }

    /// Emit draw calls for the editor
    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        draw_editor(self, backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Scene {
        editor: NodeEditor,
        a: NodeId,
        out: SocketRef,
        inp: SocketRef,
    }

    fn scene() -> Scene {
        let mut editor = NodeEditor::new(0.0, 0.0, 800.0, 600.0);
        let a = editor.add_node("A", 50.0, 50.0, 150.0, 80.0).unwrap();
        let out = editor.add_socket(a, "out", SocketDirection::Output, DataKind::Float).unwrap();
        let b = editor.add_node("B", 300.0, 50.0, 150.0, 80.0).unwrap();
        let inp = editor.add_socket(b, "in", SocketDirection::Input, DataKind::Float).unwrap();
        Scene { editor, a, out, inp }
    }

    fn absolute(editor: &NodeEditor, socket: SocketRef) -> Pos2 {
        editor.graph().socket_position(socket).unwrap() + editor.core.origin().to_vec2()
    }

    #[test]
    fn test_click_output_then_input_connects() {
        let Scene { mut editor, out, inp, .. } = scene();

        let p = absolute(&editor, out);
        assert!(editor.handle_click(p.x, p.y));
        assert_eq!(editor.gesture(), Gesture::ConnectingFrom(out));
        assert_eq!(editor.dragging_socket(), Some(out));

        let p = absolute(&editor, inp);
        assert!(editor.handle_click(p.x, p.y));
        assert_eq!(editor.dragging_socket(), None);
        assert_eq!(editor.connection_count(), 1);
        let connection = editor.graph().connections().next().unwrap();
        assert_eq!((connection.from(), connection.to()), (out, inp));
    }

    #[test]
    fn test_press_drag_release_node() {
        let Scene { mut editor, a, .. } = scene();

        assert!(editor.handle_click(100.0, 60.0));
        assert!(editor.graph().node(a).unwrap().is_selected());
        assert!(editor.is_dragging(a));

        assert!(editor.handle_drag(110.0, 65.0, 10.0, 5.0));
        assert_eq!(editor.graph().node(a).unwrap().position, Pos2::new(60.0, 55.0));

        assert!(editor.handle_release(110.0, 65.0));
        assert!(!editor.is_dragging(a));
        assert_eq!(editor.dragging_node(), None);
    }

    #[test]
    fn test_empty_press_pans() {
        let Scene { mut editor, .. } = scene();

        assert!(editor.handle_click(600.0, 400.0));
        assert!(editor.is_panning());
        assert_eq!(editor.pan_anchor(), Some(Pos2::new(600.0, 400.0)));

        assert!(editor.handle_drag(612.0, 393.0, 12.0, -7.0));
        assert_eq!(editor.pan(), Vec2::new(12.0, -7.0));

        assert!(editor.handle_release(612.0, 393.0));
        assert!(!editor.is_panning());
        assert_eq!(editor.pan_anchor(), None);
    }

    #[test]
    fn test_offset_editor_uses_local_coordinates() {
        let mut editor = NodeEditor::new(100.0, 200.0, 400.0, 300.0);
        let a = editor.add_node("A", 10.0, 10.0, 100.0, 60.0).unwrap();
        assert!(editor.handle_click(150.0, 250.0));
        assert_eq!(editor.dragging_node(), Some(a));
        assert!(editor.handle_drag(160.0, 260.0, 10.0, 10.0));
        assert_eq!(editor.graph().node(a).unwrap().position, Pos2::new(20.0, 20.0));
    }

    #[test]
    fn test_rejects_out_of_bounds_and_disabled() {
        let Scene { mut editor, .. } = scene();

        // within the margin still counts
        assert!(editor.handle_click(805.0, 300.0));
        editor.handle_release(805.0, 300.0);
        assert!(!editor.handle_click(900.0, 300.0));

        editor.core.input_enabled = false;
        assert!(!editor.handle_click(400.0, 300.0));
        assert!(!editor.handle_hover(400.0, 300.0));

        editor.core.input_enabled = true;
        editor.core.visible = false;
        assert!(!editor.handle_click(400.0, 300.0));
    }

    #[test]
    fn test_drag_outside_bounds_keeps_capture() {
        let Scene { mut editor, a, .. } = scene();
        editor.handle_click(100.0, 60.0);
        assert!(editor.handle_drag(1000.0, 60.0, 900.0, 0.0));
        assert_eq!(editor.graph().node(a).unwrap().position.x, 950.0);
        assert!(editor.handle_release(1000.0, 60.0));
        assert!(!editor.handle_drag(1000.0, 60.0, 1.0, 0.0));
    }

    #[test]
    fn test_callback_receives_events() {
        let Scene { mut editor, a, out, inp } = scene();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.set_callback(move |event| sink.borrow_mut().push(*event));

        editor.handle_click(100.0, 60.0);
        editor.handle_release(100.0, 60.0);
        let p = absolute(&editor, out);
        editor.handle_click(p.x, p.y);
        let p = absolute(&editor, inp);
        editor.handle_click(p.x, p.y);

        let events = seen.borrow();
        assert_eq!(events[0], EditorEvent::NodeSelected(a));
        assert!(matches!(events[1], EditorEvent::Connected(_)));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_remove_dragged_node_ends_gesture() {
        let Scene { mut editor, a, .. } = scene();
        editor.handle_click(100.0, 60.0);
        assert!(editor.remove_node(a).is_some());
        assert_eq!(editor.gesture(), Gesture::Idle);
        assert!(!editor.handle_drag(110.0, 65.0, 10.0, 5.0));
    }

    #[test]
    fn test_hover_sets_cursor() {
        let Scene { mut editor, .. } = scene();
        assert!(editor.handle_hover(100.0, 100.0));
        assert_eq!(editor.cursor(), CursorShape::Crosshair);
        assert!(editor.handle_hover(700.0, 500.0));
        assert_eq!(editor.cursor(), CursorShape::Arrow);
        assert!(editor.is_hovered());
        assert!(!editor.handle_hover(2000.0, 500.0));
        assert!(!editor.is_hovered());
    }

    #[test]
    fn test_grid_settings() {
        let mut editor = NodeEditor::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(editor.grid_size(), 20.0);
        assert!(editor.set_grid_size(0.0).is_err());
        assert!(editor.set_grid_size(1e-5).is_err());
        assert!(editor.set_grid_size(32.0).is_ok());
        assert_eq!(editor.grid_size(), 32.0);
        editor.set_show_grid(false);
        assert!(!editor.show_grid());
        assert!(editor.set_zoom_level(-1.0).is_err());
        assert_eq!(editor.zoom_level(), 1.0);
    }

    #[test]
    fn test_clear_resets_gesture() {
        let Scene { mut editor, out, .. } = scene();
        let p = absolute(&editor, out);
        editor.handle_click(p.x, p.y);
        editor.clear();
        assert_eq!(editor.gesture(), Gesture::Idle);
        assert_eq!(editor.node_count(), 0);
        assert_eq!(editor.connection_count(), 0);
    }

    #[test]
    fn test_config_grid_size_is_clamped() {
        let config = EditorConfig {
            grid_size: 1e-5,
            ..EditorConfig::default()
        };
        let editor = NodeEditor::with_config(1000.0, 0.0, 100.0, 100.0, config);
        assert_eq!(editor.grid_size(), MIN_GRID_SIZE);
    }

    #[test]
    fn test_clear_hover() {
        let Scene { mut editor, .. } = scene();
        editor.handle_hover(100.0, 100.0);
        assert!(editor.is_hovered());
        editor.clear_hover();
        assert!(!editor.is_hovered());
        assert_eq!(editor.cursor(), CursorShape::Arrow);
    }
}
