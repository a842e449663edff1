//! Floating formatting toolbar placement.
//!
//! The toolbar sits centred above the selection. When there is not enough
//! room above it flips below, and it is always clamped inside the viewport
//! with a fixed padding on every edge.

use crate::surface::{Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarSide {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolbarPlacement {
    pub top: f64,
    pub left: f64,
    pub side: ToolbarSide,
}

pub fn position_toolbar(
    selection: Rect,
    toolbar: Size,
    viewport: Size,
    padding: f64,
    gap: f64,
) -> ToolbarPlacement {
    let max_left = (viewport.width - toolbar.width - padding).max(padding);
    let left = (selection.center_x() - toolbar.width / 2.0).clamp(padding, max_left);

    let above = selection.top - toolbar.height - gap;
    let (top, side) = if above >= padding {
        (above, ToolbarSide::Above)
    } else {
        (selection.bottom() + gap, ToolbarSide::Below)
    };

    let max_top = (viewport.height - toolbar.height - padding).max(padding);
    ToolbarPlacement {
        top: top.clamp(padding, max_top),
        left,
        side,
    }
}
