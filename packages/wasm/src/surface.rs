//! A `TextSurface` backed by a DOM node living on the JS side.
//!
//! Rust cannot touch the node directly, so every mutation is recorded as a
//! `SurfaceCommand`. The bridge hands the batch back to JS after each event,
//! and JS applies it to the element in order.

use serde::Serialize;
use storefront_editor::{Rect, TextSurface};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SurfaceCommand {
    Focus,
    SetEditable { editable: bool },
    CaretAt { x: f64, y: f64 },
    CaretToEnd,
    SetValue { value: String },
}

#[derive(Debug, Clone)]
pub struct JsSurface {
    content: String,
    editable: bool,
    bounds: Rect,
    selection: Option<Rect>,

    /// Browser supports resolving a caret from a point
    point_caret: bool,

    commands: Vec<SurfaceCommand>,
}

impl JsSurface {
    pub fn new(content: impl Into<String>, bounds: Rect, point_caret: bool) -> Self {
        Self {
            content: content.into(),
            editable: false,
            bounds,
            selection: None,
            point_caret,
            commands: Vec::new(),
        }
    }

    /// Mirror what the user typed into the node, without echoing it back
    pub fn sync_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn set_selection(&mut self, selection: Option<Rect>) {
        self.selection = selection;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl TextSurface for JsSurface {
    fn focus(&mut self) {
        self.commands.push(SurfaceCommand::Focus);
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        self.commands.push(SurfaceCommand::SetEditable { editable });
    }

    fn set_cursor_at(&mut self, x: f64, y: f64) -> bool {
        if !self.point_caret {
            return false;
        }
        self.commands.push(SurfaceCommand::CaretAt { x, y });
        true
    }

    fn set_cursor_to_end(&mut self) {
        self.commands.push(SurfaceCommand::CaretToEnd);
    }

    fn value(&self) -> String {
        self.content.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.content = value.to_string();
        self.commands.push(SurfaceCommand::SetValue {
            value: value.to_string(),
        });
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn selection_rect(&self) -> Option<Rect> {
        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_caret_falls_back_when_unsupported() {
        let mut surface = JsSurface::new("Hi", Rect::default(), false);
        assert!(!surface.set_cursor_at(4.0, 2.0));
        assert!(surface.take_commands().is_empty());

        let mut surface = JsSurface::new("Hi", Rect::default(), true);
        assert!(surface.set_cursor_at(4.0, 2.0));
        assert_eq!(surface.take_commands(), vec![SurfaceCommand::CaretAt { x: 4.0, y: 2.0 }]);
    }

    #[test]
    fn test_synced_content_is_not_echoed() {
        let mut surface = JsSurface::new("Hi", Rect::default(), true);
        surface.sync_content("Hello");
        assert_eq!(surface.value(), "Hello");
        assert!(surface.take_commands().is_empty());
    }

    #[test]
    fn test_commands_serialize_for_js() {
        let json = serde_json::to_string(&SurfaceCommand::SetEditable { editable: true }).unwrap();
        assert_eq!(json, r#"{"op":"setEditable","editable":true}"#);
    }
}
