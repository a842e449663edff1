//! Text surfaces.
//!
//! A `TextSurface` is the rendered node a field controller edits in place.
//! Browsers back it with a contentEditable element; `FakeSurface` records
//! what the controller asked for.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub trait TextSurface {
    fn focus(&mut self);

    /// Toggle in-place editing of the node
    fn set_editable(&mut self, editable: bool);

    /// Put the caret at viewport coordinates.
    ///
    /// Returns `false` when the platform cannot resolve a point to a text offset.
    fn set_cursor_at(&mut self, x: f64, y: f64) -> bool;

    fn set_cursor_to_end(&mut self);

    /// Current content (plain text, or HTML for rich text)
    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    fn bounds(&self) -> Rect;

    /// Bounding rectangle of the current text selection
    fn selection_rect(&self) -> Option<Rect> {
        None
    }
}

/// Where the fake caret ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Caret {
    None,
    Point { x: f64, y: f64 },
    End,
}

/// Recording surface for tests and headless rendering
#[derive(Debug, Clone)]
pub struct FakeSurface {
    pub content: String,
    pub editable: bool,
    pub focused: bool,
    pub caret: Caret,
    pub resolves_points: bool,
    pub rect: Rect,
    pub selection: Option<Rect>,
}

impl FakeSurface {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            editable: false,
            focused: false,
            caret: Caret::None,
            resolves_points: true,
            rect: Rect::default(),
            selection: None,
        }
    }

    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Platform without point-to-offset resolution
    pub fn without_point_caret(mut self) -> Self {
        self.resolves_points = false;
        self
    }

    pub fn with_selection(mut self, selection: Rect) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Simulate the user replacing the content
    pub fn type_text(&mut self, text: &str) {
        self.content = text.to_string();
    }
}

impl TextSurface for FakeSurface {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable {
            self.focused = false;
        }
    }

    fn set_cursor_at(&mut self, x: f64, y: f64) -> bool {
        if !self.resolves_points {
            return false;
        }
        self.caret = Caret::Point { x, y };
        true
    }

    fn set_cursor_to_end(&mut self) {
        self.caret = Caret::End;
    }

    fn value(&self) -> String {
        self.content.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.content = value.to_string();
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn selection_rect(&self) -> Option<Rect> {
        self.selection
    }
}
