// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`Backend`] implementation on top of an egui [`Painter`], plus the glue
//! that turns one frame of egui pointer input into editor entry points.

use crate::host::EditorHost;
use crate::render::{Backend, CursorShape};
use egui::{Align2, Color32, CursorIcon, FontId, Painter, PointerButton, Pos2, Rect, Stroke};

const LINE_WIDTH: f32 = 1.5;

/// Draws through an egui painter
pub struct EguiBackend<'a> {
    painter: &'a Painter,
}

impl<'a> EguiBackend<'a> {
    /// Draw through `painter`
    pub fn new(painter: &'a Painter) -> Self {
        Self { painter }
    }
}

impl Backend for EguiBackend<'_> {
    fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.painter.rect_filled(rect, rounding, color);
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter.circle_filled(center, radius, color);
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, color: Color32) {
        self.painter.line_segment([from, to], Stroke::new(LINE_WIDTH, color));
    }

    fn draw_text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32) {
        self.painter
            .text(pos, Align2::LEFT_CENTER, text, FontId::proportional(size), color);
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE)
            .size()
            .x
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        let icon = match cursor {
            CursorShape::Arrow => CursorIcon::Default,
            CursorShape::Crosshair => CursorIcon::Crosshair,
            CursorShape::Hand => CursorIcon::PointingHand,
        };
        self.painter.ctx().set_cursor_icon(icon);
    }
}

/// Feed this frame's primary-button pointer input to `host`.
///
/// Returns whether any editor consumed an event. Without a pointer position
/// (the pointer left the window) every editor's hover state is cleared.
pub fn feed_input(ctx: &egui::Context, host: &mut EditorHost) -> bool {
    let (pos, delta, pressed, released, down) = ctx.input(|i| {
        (
            i.pointer.interact_pos().or_else(|| i.pointer.hover_pos()),
            i.pointer.delta(),
            i.pointer.button_pressed(PointerButton::Primary),
            i.pointer.button_released(PointerButton::Primary),
            i.pointer.button_down(PointerButton::Primary),
        )
    });
    let Some(pos) = pos else {
        host.clear_hover();
        return false;
    };

    let mut consumed = false;
    if pressed {
        consumed |= host.handle_click(pos.x, pos.y);
    }
    if down && !pressed && delta != egui::Vec2::ZERO {
        consumed |= host.handle_drag(pos.x, pos.y, delta.x, delta.y);
    }
    if released {
        consumed |= host.handle_release(pos.x, pos.y);
    }
    consumed |= host.handle_hover(pos.x, pos.y);
    consumed
}
