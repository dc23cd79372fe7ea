// SPDX-License-Identifier: MIT OR Apache-2.0
//! Translation of editor state into backend draw calls.
//!
//! Drawing order per editor:
//! - Background and grid
//! - Connections (below nodes)
//! - Pending connection preview
//! - Nodes with header, title and sockets
//!
//! Everything here is a pure read of the editor.

use crate::config::MIN_GRID_SIZE;
use crate::editor::NodeEditor;
use crate::graph::Graph;
use crate::hit_test::find_input_socket_at;
use crate::node::Node;
use crate::path::connection_points;
use crate::socket::SocketDirection;
use egui::{Color32, Pos2, Rect, Vec2};

/// Cursor shapes the editor asks the backend for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Default pointer
    #[default]
    Arrow,
    /// Over sockets and nodes
    Crosshair,
    /// Over connections
    Hand,
}

/// Drawing primitives provided by the host toolkit.
///
/// All coordinates are absolute window pixels.
pub trait Backend {
    /// Fill a rectangle, optionally with rounded corners
    fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color32);
    /// Fill a circle
    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);
    /// Draw a line segment
    fn draw_line(&mut self, from: Pos2, to: Pos2, color: Color32);
    /// Draw text with its left edge at `pos.x`, vertically centered on `pos.y`
    fn draw_text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32);
    /// Width of `text` at `size`
    fn text_width(&self, text: &str, size: f32) -> f32;
    /// Change the pointer cursor
    fn set_cursor(&mut self, cursor: CursorShape);
}

/// Resolved theme colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Editor background
    pub base: Color32,
    /// Node body
    pub widget_base: Color32,
    /// Node header and unconnected sockets
    pub primary: Color32,
    /// Text and grid lines
    pub neutral: Color32,
    /// Connections and connected sockets
    pub success: Color32,
    /// Selection and invalid previews
    pub danger: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Color32::from_rgb(30, 30, 32),
            widget_base: Color32::from_rgb(45, 45, 48),
            primary: Color32::from_rgb(70, 100, 130),
            neutral: Color32::from_gray(200),
            success: Color32::from_rgb(80, 200, 80),
            danger: Color32::from_rgb(220, 80, 80),
        }
    }
}

/// Draw one editor
pub fn draw_editor<B: Backend + ?Sized>(editor: &NodeEditor, backend: &mut B) {
    if !editor.core.visible {
        return;
    }

    let palette = editor.palette();
    let bounds = editor.core.rect();
    backend.fill_rect(bounds, 0.0, palette.base);

    if editor.show_grid() {
        draw_grid(backend, bounds, editor.grid_size(), palette.neutral);
    }

    let origin = bounds.min.to_vec2();
    draw_connections(backend, editor.graph(), origin, palette);
    draw_pending_connection(backend, editor, origin);

    for node in editor.graph().nodes() {
        draw_node(backend, editor.graph(), node, origin, palette);
    }

    if editor.is_hovered() {
        backend.set_cursor(editor.cursor());
    }
}

fn draw_grid<B: Backend + ?Sized>(backend: &mut B, bounds: Rect, spacing: f32, color: Color32) {
    if !spacing.is_finite() {
        return;
    }
    let spacing = spacing.max(MIN_GRID_SIZE);

    let columns = (bounds.width() / spacing).ceil().max(0.0) as usize;
    for i in 0..columns {
        let x = bounds.left() + i as f32 * spacing;
        backend.draw_line(Pos2::new(x, bounds.top()), Pos2::new(x, bounds.bottom()), color);
    }

    let rows = (bounds.height() / spacing).ceil().max(0.0) as usize;
    for i in 0..rows {
        let y = bounds.top() + i as f32 * spacing;
        backend.draw_line(Pos2::new(bounds.left(), y), Pos2::new(bounds.right(), y), color);
    }
}

fn draw_polyline<B: Backend + ?Sized>(backend: &mut B, points: &[Pos2], color: Color32) {
    for pair in points.windows(2) {
        backend.draw_line(pair[0], pair[1], color);
    }
}

fn draw_connections<B: Backend + ?Sized>(backend: &mut B, graph: &Graph, origin: Vec2, palette: Palette) {
    for connection in graph.connections() {
        let (Some(from), Some(to)) = (
            graph.socket_position(connection.from()),
            graph.socket_position(connection.to()),
        ) else {
            continue;
        };

        let color = if connection.is_selected() {
            palette.danger
        } else {
            palette.success
        };
        let points = connection_points(graph.config(), from + origin, to + origin);
        draw_polyline(backend, &points, color);
    }
}

fn draw_pending_connection<B: Backend + ?Sized>(backend: &mut B, editor: &NodeEditor, origin: Vec2) {
    let graph = editor.graph();
    let (Some(pending), Some(pointer)) = (editor.dragging_socket(), editor.pointer()) else {
        return;
    };
    let (Some(socket), Some(start)) = (graph.socket(pending), graph.socket_position(pending)) else {
        return;
    };

    let palette = editor.palette();
    let target = find_input_socket_at(graph, pointer)
        .filter(|t| t.node != pending.node && socket.direction() == SocketDirection::Output)
        .and_then(|t| graph.socket_position(t));

    let (end, color) = match target {
        Some(snapped) => (snapped, palette.success),
        None => (pointer, palette.danger),
    };
    let points = connection_points(graph.config(), start + origin, end + origin);
    draw_polyline(backend, &points, color);
}

fn draw_node<B: Backend + ?Sized>(backend: &mut B, graph: &Graph, node: &Node, origin: Vec2, palette: Palette) {
    let config = graph.config();
    let body = node.rect().translate(origin);
    let body_color = if node.is_selected() {
        palette.danger
    } else {
        palette.widget_base
    };
    backend.fill_rect(body, config.node_rounding, body_color);

    let header = Rect::from_min_size(body.min, Vec2::new(body.width(), config.header_height));
    backend.fill_rect(header, config.node_rounding, palette.primary);
    backend.draw_text(
        Pos2::new(header.left() + 10.0, header.center().y),
        &node.title,
        config.font_size,
        palette.neutral,
    );

    for socket in node.sockets() {
        let center = body.min + socket.offset();
        let color = if socket.is_connected() {
            palette.success
        } else {
            palette.primary
        };
        backend.fill_circle(center, config.socket_radius, color);

        let tag = socket.kind.tag();
        let size = config.font_size;
        match socket.direction() {
            SocketDirection::Input => {
                let name_width = backend.text_width(&socket.name, size);
                backend.draw_text(Pos2::new(center.x + 10.0, center.y), &socket.name, size, palette.neutral);
                backend.draw_text(Pos2::new(center.x + name_width + 15.0, center.y), tag, size, palette.neutral);
            }
            SocketDirection::Output => {
                let tag_width = backend.text_width(tag, size);
                let name_width = backend.text_width(&socket.name, size);
                backend.draw_text(Pos2::new(center.x - tag_width - 15.0, center.y), tag, size, palette.neutral);
                backend.draw_text(
                    Pos2::new(center.x - name_width - tag_width - 25.0, center.y),
                    &socket.name,
                    size,
                    palette.neutral,
                );
            }
        }
    }
}
