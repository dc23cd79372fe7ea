// SPDX-License-Identifier: MIT OR Apache-2.0
//! Window-level dispatch over several editors.

use crate::editor::NodeEditor;
use crate::render::Backend;

/// Owns the editors of one window and routes pointer events to them.
///
/// Editors are tried in insertion order and the first one that consumes an
/// event stops the dispatch.
#[derive(Debug, Default)]
pub struct EditorHost {
    editors: Vec<NodeEditor>,
}

impl EditorHost {
    /// Create a host without editors
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an editor and return its index
    pub fn push(&mut self, editor: NodeEditor) -> usize {
        self.editors.push(editor);
        self.editors.len() - 1
    }

    /// Editor at `index`
    pub fn editor(&self, index: usize) -> Option<&NodeEditor> {
        self.editors.get(index)
    }

    /// Mutable editor at `index`
    pub fn editor_mut(&mut self, index: usize) -> Option<&mut NodeEditor> {
        self.editors.get_mut(index)
    }

    /// All editors in insertion order
    pub fn editors(&self) -> &[NodeEditor] {
        &self.editors
    }

    /// Number of editors
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Whether the host has no editors
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Route a press to the first editor that consumes it
    pub fn handle_click(&mut self, x: f32, y: f32) -> bool {
        self.editors.iter_mut().any(|e| e.handle_click(x, y))
    }

    /// Route a drag to the first editor that consumes it
    pub fn handle_drag(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> bool {
        self.editors.iter_mut().any(|e| e.handle_drag(x, y, dx, dy))
    }

    /// Route a release to the first editor that consumes it
    pub fn handle_release(&mut self, x: f32, y: f32) -> bool {
        self.editors.iter_mut().any(|e| e.handle_release(x, y))
    }

    /// Every editor sees hovers so stale hover state gets cleared
    pub fn handle_hover(&mut self, x: f32, y: f32) -> bool {
        self.editors
            .iter_mut()
            .fold(false, |consumed, e| e.handle_hover(x, y) || consumed)
    }

    /// Clear hover state on every editor
    pub fn clear_hover(&mut self) {
        for editor in &mut self.editors {
            editor.clear_hover();
        }
    }

    /// Draw every editor in insertion order
    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        for editor in &self.editors {
            editor.draw(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::RecordingBackend;

    fn two_editors() -> EditorHost {
        let mut host = EditorHost::new();
        host.push(NodeEditor::new(0.0, 0.0, 300.0, 300.0));
        host.push(NodeEditor::new(400.0, 0.0, 300.0, 300.0));
        host
    }

    #[test]
    fn test_click_routes_to_editor_under_pointer() {
        let mut host = two_editors();
        assert!(host.handle_click(500.0, 100.0));
        assert!(!host.editor(0).unwrap().is_panning());
        assert!(host.editor(1).unwrap().is_panning());
        assert!(!host.handle_click(2000.0, 100.0));
    }

    #[test]
    fn test_drag_stays_with_capturing_editor() {
        let mut host = two_editors();
        host.handle_click(100.0, 100.0);
        // the pointer crosses into the second editor while panning the first
        assert!(host.handle_drag(500.0, 100.0, 400.0, 0.0));
        assert_eq!(host.editor(0).unwrap().pan().x, 400.0);
        assert_eq!(host.editor(1).unwrap().pan().x, 0.0);
        assert!(host.handle_release(500.0, 100.0));
        assert!(!host.editor(0).unwrap().is_panning());
    }

    #[test]
    fn test_hover_clears_other_editors() {
        let mut host = two_editors();
        assert!(host.handle_hover(100.0, 100.0));
        assert!(host.editor(0).unwrap().is_hovered());
        assert!(host.handle_hover(500.0, 100.0));
        assert!(!host.editor(0).unwrap().is_hovered());
        assert!(host.editor(1).unwrap().is_hovered());
    }

    #[test]
    fn test_draw_all() {
        let mut host = two_editors();
        host.editor_mut(1).unwrap().core.visible = false;
        let mut backend = RecordingBackend::default();
        host.draw(&mut backend);
        assert_eq!(backend.rects.len(), 1);
        assert_eq!(host.len(), 2);
    }

    #[test]
    fn test_clear_hover_drops_cursor() {
        let mut host = two_editors();
        host.handle_hover(100.0, 100.0);
        host.clear_hover();
        assert!(host.editors().iter().all(|e| !e.is_hovered()));

        let mut backend = RecordingBackend::default();
        host.draw(&mut backend);
        assert_eq!(backend.cursor, None);
    }
}
